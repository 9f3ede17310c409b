use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{
    args::{ArgVec, check_zero_args, one_arg, one_two_args},
    exception::{ExcType, RunResult, SimpleException},
    heap::{Heap, HeapData, HeapId},
    intern::{Interns, StaticStrings},
    runtime::Runtime,
    types::{List, Tuple},
    value::Value,
};

/// A hashable key in a dict or set.
///
/// Keys are extracted from values once at insertion so lookups never need
/// the heap. Numeric keys are normalized (bools to ints, integral floats to
/// ints, small-fitting big ints to ints) so `d[True]`, `d[1]`, and `d[1.0]`
/// address the same slot, matching the cross-type hash invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DictKey {
    None,
    Int(i64),
    Big(BigInt),
    Str(String),
    Tuple(Vec<DictKey>),
    /// Non-integral float, stored by bit pattern.
    #[cfg(feature = "float")]
    Float(u64),
}

impl DictKey {
    /// Extracts a key from a value, or `TypeError: unhashable type`.
    pub(crate) fn from_value(heap: &Heap, interns: &Interns, v: Value) -> RunResult<Self> {
        match v {
            Value::None => Ok(Self::None),
            Value::Bool(b) => Ok(Self::Int(i64::from(b))),
            Value::Int(n) => Ok(Self::Int(n)),
            #[cfg(feature = "float")]
            Value::Float(f) => {
                let truncated = f.trunc();
                if f == truncated && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
                    Ok(Self::Int(truncated as i64))
                } else {
                    Ok(Self::Float(f.to_bits()))
                }
            }
            Value::InternStr(q) => Ok(Self::Str(interns.get(q).to_owned())),
            Value::Ref(id) => match heap.get(id) {
                HeapData::Str(s) => Ok(Self::Str(s.clone())),
                HeapData::BigInt(b) => Ok(b.to_i64().map_or_else(|| Self::Big(b.clone()), Self::Int)),
                HeapData::Tuple(t) => {
                    let keys = t
                        .items()
                        .iter()
                        .map(|&item| Self::from_value(heap, interns, item))
                        .collect::<RunResult<Vec<_>>>()?;
                    Ok(Self::Tuple(keys))
                }
                other => Err(ExcType::type_error(format!("unhashable type: '{}'", other.py_type()))),
            },
            other => Err(ExcType::type_error(format!(
                "unhashable type: '{}'",
                other.py_type(heap)
            ))),
        }
    }

    /// Rebuilds a value from a key, for `keys()` / set iteration output.
    pub(crate) fn to_value(&self, heap: &mut Heap) -> Value {
        match self {
            Self::None => Value::None,
            Self::Int(n) => Value::Int(*n),
            Self::Big(b) => heap.alloc_value(HeapData::BigInt(b.clone())),
            Self::Str(s) => heap.alloc_value(HeapData::Str(s.clone())),
            Self::Tuple(keys) => {
                let items = keys.iter().map(|k| k.to_value(heap)).collect();
                heap.alloc_value(HeapData::Tuple(Tuple::new(items)))
            }
            #[cfg(feature = "float")]
            Self::Float(bits) => Value::Float(f64::from_bits(*bits)),
        }
    }
}

/// An insertion-ordered mapping with hashable keys.
///
/// Serialized as a sequence of pairs, because the structured keys have no
/// map-key representation in self-describing formats.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dict {
    #[serde(with = "entries_as_pairs")]
    entries: IndexMap<DictKey, Value>,
}

mod entries_as_pairs {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DictKey;
    use crate::value::Value;

    pub fn serialize<S: Serializer>(map: &IndexMap<DictKey, Value>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IndexMap<DictKey, Value>, D::Error> {
        let pairs: Vec<(DictKey, Value)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl Dict {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the table; `hint` is the compiler's element-count estimate.
    #[must_use]
    pub fn with_capacity(hint: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(hint),
        }
    }

    #[must_use]
    pub fn get(&self, key: &DictKey) -> Option<Value> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: DictKey, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &DictKey) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &DictKey) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DictKey, &Value)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&DictKey, Value)> {
        self.entries.get_index(index).map(|(k, &v)| (k, v))
    }
}

/// Dispatches a call to one of the dict method-table entries.
pub(crate) fn call_method(
    rt: &mut Runtime,
    self_val: Value,
    name: StaticStrings,
    args: ArgVec,
) -> RunResult<Value> {
    // fromkeys is a class method: self is the dict type object, not an instance.
    if name == StaticStrings::Fromkeys {
        return fromkeys(rt, args);
    }

    let Value::Ref(id) = self_val else {
        return Err(descriptor_error(rt, name, self_val));
    };
    if !matches!(rt.heap.get(id), HeapData::Dict(_)) {
        return Err(descriptor_error(rt, name, self_val));
    }

    match name {
        StaticStrings::Get => {
            let (key, default) = one_two_args("get", args)?;
            let key = DictKey::from_value(&rt.heap, &rt.interns, key)?;
            Ok(dict(rt, id).get(&key).unwrap_or(default.unwrap_or(Value::None)))
        }
        StaticStrings::Keys => {
            check_zero_args("keys", &args)?;
            let keys: Vec<DictKey> = dict(rt, id).entries.keys().cloned().collect();
            let items = keys.iter().map(|k| k.to_value(&mut rt.heap)).collect();
            Ok(rt.heap.alloc_value(HeapData::List(List::new(items))))
        }
        StaticStrings::Values => {
            check_zero_args("values", &args)?;
            let values: Vec<Value> = dict(rt, id).entries.values().copied().collect();
            Ok(rt.heap.alloc_value(HeapData::List(List::new(values))))
        }
        StaticStrings::Items => {
            check_zero_args("items", &args)?;
            let pairs: Vec<(DictKey, Value)> = dict(rt, id)
                .entries
                .iter()
                .map(|(k, &v)| (k.clone(), v))
                .collect();
            let items = pairs
                .into_iter()
                .map(|(k, v)| {
                    let key = k.to_value(&mut rt.heap);
                    rt.heap.alloc_value(HeapData::Tuple(Tuple::new(vec![key, v])))
                })
                .collect();
            Ok(rt.heap.alloc_value(HeapData::List(List::new(items))))
        }
        StaticStrings::Pop => {
            let (key, default) = one_two_args("pop", args)?;
            let key = DictKey::from_value(&rt.heap, &rt.interns, key)?;
            match dict_mut(rt, id).remove(&key) {
                Some(v) => Ok(v),
                None => default.ok_or_else(|| key_error(&key)),
            }
        }
        StaticStrings::Clear => {
            check_zero_args("clear", &args)?;
            dict_mut(rt, id).entries.clear();
            Ok(Value::None)
        }
        StaticStrings::Copy => {
            check_zero_args("copy", &args)?;
            let entries = dict(rt, id).entries.clone();
            Ok(rt.heap.alloc_value(HeapData::Dict(Dict { entries })))
        }
        StaticStrings::Update => {
            let other = one_arg("update", args)?;
            let Value::Ref(other_id) = other else {
                return Err(ExcType::type_error("dict.update() argument must be a dict"));
            };
            let HeapData::Dict(other_dict) = rt.heap.get(other_id) else {
                return Err(ExcType::type_error("dict.update() argument must be a dict"));
            };
            let entries: Vec<(DictKey, Value)> = other_dict.entries.iter().map(|(k, &v)| (k.clone(), v)).collect();
            let target = dict_mut(rt, id);
            for (k, v) in entries {
                target.insert(k, v);
            }
            Ok(Value::None)
        }
        StaticStrings::Setdefault => {
            let (key, default) = one_two_args("setdefault", args)?;
            let key = DictKey::from_value(&rt.heap, &rt.interns, key)?;
            let target = dict_mut(rt, id);
            match target.get(&key) {
                Some(v) => Ok(v),
                None => {
                    let value = default.unwrap_or(Value::None);
                    target.insert(key, value);
                    Ok(value)
                }
            }
        }
        _ => Err(descriptor_error(rt, name, self_val)),
    }
}

/// `dict.fromkeys(iterable[, value])` — a class method, so the bound self
/// (the type object) was already stripped by the method-call path.
fn fromkeys(rt: &mut Runtime, args: ArgVec) -> RunResult<Value> {
    let (iterable, value) = one_two_args("fromkeys", args)?;
    let value = value.unwrap_or(Value::None);
    let items = rt.collect_iterable(iterable)?;
    let mut result = Dict::with_capacity(items.len());
    for item in items {
        let key = DictKey::from_value(&rt.heap, &rt.interns, item)?;
        result.insert(key, value);
    }
    Ok(rt.heap.alloc_value(HeapData::Dict(result)))
}

fn dict(rt: &Runtime, id: HeapId) -> &Dict {
    match rt.heap.get(id) {
        HeapData::Dict(d) => d,
        _ => unreachable!("checked to be a dict above"),
    }
}

fn dict_mut(rt: &mut Runtime, id: HeapId) -> &mut Dict {
    match rt.heap.get_mut(id) {
        HeapData::Dict(d) => d,
        _ => unreachable!("checked to be a dict above"),
    }
}

fn key_error(key: &DictKey) -> SimpleException {
    let shown = match key {
        DictKey::Str(s) => format!("'{s}'"),
        DictKey::Int(n) => n.to_string(),
        _ => "<key>".to_owned(),
    };
    SimpleException::new_msg(ExcType::KeyError, shown)
}

fn descriptor_error(rt: &Runtime, name: StaticStrings, self_val: Value) -> SimpleException {
    ExcType::type_error(format!(
        "descriptor '{}' requires a 'dict' object but received a '{}'",
        <&'static str>::from(name),
        rt.type_name(self_val),
    ))
}
