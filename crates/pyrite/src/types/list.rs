use serde::{Deserialize, Serialize};

use crate::{
    args::{ArgVec, check_zero_args, one_arg, two_args},
    exception::{ExcType, RunResult, SimpleException},
    heap::{HeapData, HeapId},
    intern::StaticStrings,
    runtime::Runtime,
    value::{Value, py_eq},
};

/// A mutable sequence of values.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct List(Vec<Value>);

impl List {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    /// Builds a list from stack-popped items: the input is in reverse order
    /// (last item first), the list presents source order.
    #[must_use]
    pub fn from_reverse(mut items: Vec<Value>) -> Self {
        items.reverse();
        Self(items)
    }

    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, v: Value) {
        self.0.push(v);
    }

    pub fn extend_from(&mut self, items: &[Value]) {
        self.0.extend_from_slice(items);
    }

    /// Resolves a possibly-negative index, or the `IndexError` for `verb`.
    fn resolve_index(&self, index: i64, verb: &str) -> RunResult<usize> {
        let len = self.0.len() as i64;
        let idx = if index < 0 { index + len } else { index };
        if (0..len).contains(&idx) {
            Ok(idx as usize)
        } else {
            Err(SimpleException::new_msg(
                ExcType::IndexError,
                format!("list {verb} out of range"),
            ))
        }
    }

    pub fn get_item(&self, index: i64) -> RunResult<Value> {
        Ok(self.0[self.resolve_index(index, "index")?])
    }

    pub fn set_item(&mut self, index: i64, value: Value) -> RunResult<()> {
        let idx = self.resolve_index(index, "assignment index")?;
        self.0[idx] = value;
        Ok(())
    }
}

/// Dispatches a call to one of the list method-table entries.
///
/// `self_val` is the leading argument bound by `load_method` (or passed
/// explicitly for unbound calls).
pub(crate) fn call_method(
    rt: &mut Runtime,
    self_val: Value,
    name: StaticStrings,
    args: ArgVec,
) -> RunResult<Value> {
    let Value::Ref(id) = self_val else {
        return Err(descriptor_error(rt, name, self_val));
    };
    if !matches!(rt.heap.get(id), HeapData::List(_)) {
        return Err(descriptor_error(rt, name, self_val));
    }

    match name {
        StaticStrings::Append => {
            let item = one_arg("append", args)?;
            list_mut(rt, id).push(item);
            Ok(Value::None)
        }
        StaticStrings::Extend => {
            let other = one_arg("extend", args)?;
            let items = rt.collect_iterable(other)?;
            list_mut(rt, id).0.extend(items);
            Ok(Value::None)
        }
        StaticStrings::Insert => {
            let (index, item) = two_args("insert", args)?;
            let Some(index) = index.as_small_int() else {
                return Err(ExcType::type_error("list indices must be integers"));
            };
            let list = list_mut(rt, id);
            let len = list.0.len() as i64;
            // Python clamps insert positions instead of raising.
            let at = index.clamp(-len, len);
            let at = if at < 0 { at + len } else { at };
            list.0.insert(at as usize, item);
            Ok(Value::None)
        }
        StaticStrings::Pop => {
            let index = match args.len() {
                0 => None,
                _ => Some(one_arg("pop", args)?),
            };
            let list = list_mut(rt, id);
            if list.0.is_empty() {
                return Err(SimpleException::new_msg(ExcType::IndexError, "pop from empty list"));
            }
            match index {
                None => Ok(list.0.pop().expect("list is non-empty")),
                Some(index) => {
                    let Some(index) = index.as_small_int() else {
                        return Err(ExcType::type_error("list indices must be integers"));
                    };
                    let idx = list.resolve_index(index, "index")?;
                    Ok(list.0.remove(idx))
                }
            }
        }
        StaticStrings::Remove => {
            let target = one_arg("remove", args)?;
            let items = list_items(rt, id);
            let pos = items
                .iter()
                .position(|&v| py_eq(&rt.heap, &rt.interns, v, target));
            match pos {
                Some(pos) => {
                    list_mut(rt, id).0.remove(pos);
                    Ok(Value::None)
                }
                None => Err(ExcType::value_error("list.remove(x): x not in list")),
            }
        }
        StaticStrings::Reverse => {
            check_zero_args("reverse", &args)?;
            list_mut(rt, id).0.reverse();
            Ok(Value::None)
        }
        StaticStrings::Clear => {
            check_zero_args("clear", &args)?;
            list_mut(rt, id).0.clear();
            Ok(Value::None)
        }
        StaticStrings::Copy => {
            check_zero_args("copy", &args)?;
            let items = list_items(rt, id);
            Ok(rt.heap.alloc_value(HeapData::List(List::new(items))))
        }
        StaticStrings::Count => {
            let target = one_arg("count", args)?;
            let items = list_items(rt, id);
            let count = items
                .iter()
                .filter(|&&v| py_eq(&rt.heap, &rt.interns, v, target))
                .count();
            Ok(Value::Int(count as i64))
        }
        StaticStrings::Index => {
            let target = one_arg("index", args)?;
            let items = list_items(rt, id);
            let pos = items
                .iter()
                .position(|&v| py_eq(&rt.heap, &rt.interns, v, target));
            match pos {
                Some(pos) => Ok(Value::Int(pos as i64)),
                None => Err(ExcType::value_error("value not in list")),
            }
        }
        _ => Err(descriptor_error(rt, name, self_val)),
    }
}

fn list_mut(rt: &mut Runtime, id: HeapId) -> &mut List {
    match rt.heap.get_mut(id) {
        HeapData::List(list) => list,
        _ => unreachable!("checked to be a list above"),
    }
}

fn list_items(rt: &Runtime, id: HeapId) -> Vec<Value> {
    match rt.heap.get(id) {
        HeapData::List(list) => list.0.clone(),
        _ => unreachable!("checked to be a list above"),
    }
}

fn descriptor_error(rt: &Runtime, name: StaticStrings, self_val: Value) -> SimpleException {
    ExcType::type_error(format!(
        "descriptor '{}' requires a 'list' object but received a '{}'",
        <&'static str>::from(name),
        rt.type_name(self_val),
    ))
}
