use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{
    args::{ArgVec, check_zero_args, one_arg},
    exception::{ExcType, RunResult, SimpleException},
    heap::{HeapData, HeapId},
    intern::StaticStrings,
    runtime::Runtime,
    types::dict::DictKey,
    value::Value,
};

/// An insertion-ordered set of hashable values.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Set {
    entries: IndexSet<DictKey>,
}

impl Set {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: DictKey) {
        self.entries.insert(key);
    }

    #[must_use]
    pub fn contains(&self, key: &DictKey) -> bool {
        self.entries.contains(key)
    }

    pub fn remove(&mut self, key: &DictKey) -> bool {
        self.entries.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DictKey> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&DictKey> {
        self.entries.get_index(index)
    }
}

/// Dispatches a call to one of the set method-table entries.
pub(crate) fn call_method(
    rt: &mut Runtime,
    self_val: Value,
    name: StaticStrings,
    args: ArgVec,
) -> RunResult<Value> {
    let Value::Ref(id) = self_val else {
        return Err(descriptor_error(rt, name, self_val));
    };
    if !matches!(rt.heap.get(id), HeapData::Set(_)) {
        return Err(descriptor_error(rt, name, self_val));
    }

    match name {
        StaticStrings::Add => {
            let item = one_arg("add", args)?;
            let key = DictKey::from_value(&rt.heap, &rt.interns, item)?;
            set_mut(rt, id).insert(key);
            Ok(Value::None)
        }
        StaticStrings::Remove => {
            let item = one_arg("remove", args)?;
            let key = DictKey::from_value(&rt.heap, &rt.interns, item)?;
            if set_mut(rt, id).remove(&key) {
                Ok(Value::None)
            } else {
                Err(SimpleException::new_msg(ExcType::KeyError, "element not in set"))
            }
        }
        StaticStrings::Discard => {
            let item = one_arg("discard", args)?;
            let key = DictKey::from_value(&rt.heap, &rt.interns, item)?;
            set_mut(rt, id).remove(&key);
            Ok(Value::None)
        }
        StaticStrings::Pop => {
            check_zero_args("pop", &args)?;
            let set = set_mut(rt, id);
            match set.entries.shift_remove_index(0) {
                Some(key) => Ok(key.to_value(&mut rt.heap)),
                None => Err(SimpleException::new_msg(ExcType::KeyError, "pop from an empty set")),
            }
        }
        StaticStrings::Clear => {
            check_zero_args("clear", &args)?;
            set_mut(rt, id).entries.clear();
            Ok(Value::None)
        }
        StaticStrings::Copy => {
            check_zero_args("copy", &args)?;
            let entries = set(rt, id).entries.clone();
            Ok(rt.heap.alloc_value(HeapData::Set(Set { entries })))
        }
        StaticStrings::Union | StaticStrings::Intersection | StaticStrings::Difference => {
            let other = one_arg(<&'static str>::from(name), args)?;
            let other_entries = other_set(rt, other, name)?;
            let own = set(rt, id).entries.clone();
            let entries: IndexSet<DictKey> = match name {
                StaticStrings::Union => own.union(&other_entries).cloned().collect(),
                StaticStrings::Intersection => own.intersection(&other_entries).cloned().collect(),
                _ => own.difference(&other_entries).cloned().collect(),
            };
            Ok(rt.heap.alloc_value(HeapData::Set(Set { entries })))
        }
        StaticStrings::Update => {
            let other = one_arg("update", args)?;
            let items = rt.collect_iterable(other)?;
            for item in items {
                let key = DictKey::from_value(&rt.heap, &rt.interns, item)?;
                set_mut(rt, id).insert(key);
            }
            Ok(Value::None)
        }
        _ => Err(descriptor_error(rt, name, self_val)),
    }
}

fn other_set(rt: &Runtime, other: Value, method: StaticStrings) -> RunResult<IndexSet<DictKey>> {
    if let Value::Ref(id) = other {
        if let HeapData::Set(s) = rt.heap.get(id) {
            return Ok(s.entries.clone());
        }
    }
    Err(ExcType::type_error(format!(
        "set.{}() argument must be a set",
        <&'static str>::from(method)
    )))
}

fn set(rt: &Runtime, id: HeapId) -> &Set {
    match rt.heap.get(id) {
        HeapData::Set(s) => s,
        _ => unreachable!("checked to be a set above"),
    }
}

fn set_mut(rt: &mut Runtime, id: HeapId) -> &mut Set {
    match rt.heap.get_mut(id) {
        HeapData::Set(s) => s,
        _ => unreachable!("checked to be a set above"),
    }
}

fn descriptor_error(rt: &Runtime, name: StaticStrings, self_val: Value) -> SimpleException {
    ExcType::type_error(format!(
        "descriptor '{}' requires a 'set' object but received a '{}'",
        <&'static str>::from(name),
        rt.type_name(self_val),
    ))
}
