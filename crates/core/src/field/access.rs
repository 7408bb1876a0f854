//! Get, set, remove and compare values addressed by a [`FieldPath`].
//!
//! `set` and `remove` never touch the caller's value: they clone it and
//! return the updated copy. The `*_in_place` variants are for callers that
//! already own a private copy (the state store's read-modify-write).

use crate::field::error::{FieldError, FieldResult};
use crate::field::path::{FieldPath, Segment};
use serde_json::{Map, Value};

/// Read the value at `path`, or `None` if any step is missing.
pub fn get<'a>(value: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(&segment.key()),
            Value::Array(items) => segment.index().and_then(|index| items.get(index)),
            _ => None,
        })
}

/// How many `null`s a write may insert past the end of an array.
pub const MAX_ARRAY_PADDING: usize = 1024;

/// Return a copy of `value` with `new_value` written at `path`.
///
/// Missing intermediates are created: an array when the next segment is an
/// index, an object otherwise. Scalars in the way are replaced. Arrays are
/// padded with `null` when writing past their end, by at most
/// [`MAX_ARRAY_PADDING`] elements; further out is
/// [`FieldError::IndexOutOfRange`].
pub fn set(value: &Value, path: &FieldPath, new_value: Value) -> FieldResult<Value> {
    let mut copy = value.clone();
    set_in_place(&mut copy, path, new_value)?;
    Ok(copy)
}

/// Write `new_value` at `path` inside `target`.
///
/// On error, intermediates created before the failing segment are left in
/// `target`.
pub fn set_in_place(target: &mut Value, path: &FieldPath, new_value: Value) -> FieldResult<()> {
    let slot = path
        .segments()
        .iter()
        .try_fold(target, |current, segment| child_mut(current, segment))?;
    *slot = new_value;
    Ok(())
}

fn child_mut<'a>(target: &'a mut Value, segment: &Segment) -> FieldResult<&'a mut Value> {
    let index = segment.index();
    let reshape = match (&*target, index) {
        (Value::Object(_), _) | (Value::Array(_), Some(_)) => None,
        (_, Some(_)) => Some(Value::Array(Vec::new())),
        (_, None) => Some(Value::Object(Map::new())),
    };
    if let Some(container) = reshape {
        *target = container;
    }

    match target {
        Value::Array(items) => {
            let index = index.unwrap_or_default();
            let len = items.len();
            let out_of_range = FieldError::IndexOutOfRange { index, len };
            if index > len.saturating_add(MAX_ARRAY_PADDING) {
                return Err(out_of_range);
            }
            if len <= index {
                items.resize(index.checked_add(1).ok_or(out_of_range)?, Value::Null);
            }
            Ok(&mut items[index])
        }
        Value::Object(map) => Ok(map.entry(segment.key()).or_insert(Value::Null)),
        // reshaped above
        other => Ok(other),
    }
}

/// Return a copy of `value` without the entry at `path`.
///
/// A missing path leaves the copy unchanged. Array elements are spliced out,
/// shifting later elements down.
pub fn remove(value: &Value, path: &FieldPath) -> Value {
    let mut copy = value.clone();
    remove_in_place(&mut copy, path);
    copy
}

/// Remove the entry at `path` inside `target`, returning it if it existed.
pub fn remove_in_place(target: &mut Value, path: &FieldPath) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;

    let mut current = target;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.get_mut(&segment.key())?,
            Value::Array(items) => items.get_mut(segment.index()?)?,
            _ => return None,
        };
    }

    match current {
        Value::Object(map) => map.remove(&last.key()),
        Value::Array(items) => {
            let index = last.index()?;
            (index < items.len()).then(|| items.remove(index))
        }
        _ => None,
    }
}

/// Structural equality between two values.
///
/// Numbers compare by numeric value, so `1` and `1.0` are equal.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| deep_equal(x, y)))
        }
        _ => a == b,
    }
}
