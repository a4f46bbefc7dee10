//! Applying the structural edits of a mixin to a copy of its base value.
//!
//! A key segment met while standing on an array applies to every element of
//! that array, so `items.price` names the price of each item.

use crate::evaluation::error::MixinError;
use crate::language::{Segment, Value};

fn extend(walked: &str, segment: impl std::fmt::Display) -> String {
    format!("{}.{}", walked, segment)
}

/// Walk from a base value along the remaining segments of the base path.
pub fn navigate<'v>(
    mut value: &'v Value,
    segments: &[Segment],
    walked: &str,
) -> Result<&'v Value, MixinError> {
    let mut walked = walked.to_string();

    for segment in segments {
        value = match (value, segment) {
            (Value::Object(map), segment) => map
                .get(&segment.key())
                .ok_or_else(|| MixinError::MissingKey(extend(&walked, segment)))?,
            (Value::Array(items) | Value::Ordered(items), Segment::Index(index)) => items
                .get(*index)
                .ok_or_else(|| MixinError::IndexOutOfBounds(walked.clone(), *index, items.len()))?,
            (Value::Array(_) | Value::Ordered(_), Segment::Key(_)) => {
                return Err(MixinError::NotAnIndex(walked));
            }
            _ => return Err(MixinError::NotNavigable(walked)),
        };
        walked = extend(&walked, segment);
    }

    Ok(value)
}

/// Delete whatever is at the path.
pub fn remove(target: &mut Value, segments: &[Segment], walked: &str) -> Result<(), MixinError> {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };

    match target {
        Value::Array(items) | Value::Ordered(items) => match head {
            Segment::Key(_) => {
                for (i, item) in items
                    .iter_mut()
                    .enumerate()
                {
                    remove(item, segments, &extend(walked, i))?;
                }
                Ok(())
            }
            Segment::Index(index) => {
                let len = items.len();
                if *index >= len {
                    return Err(MixinError::IndexOutOfBounds(walked.to_string(), *index, len));
                }
                if rest.is_empty() {
                    items.remove(*index);
                    Ok(())
                } else {
                    remove(&mut items[*index], rest, &extend(walked, index))
                }
            }
        },
        Value::Object(map) => {
            let key = head.key();
            if rest.is_empty() {
                match map.remove(&key) {
                    Some(_) => Ok(()),
                    None => Err(MixinError::MissingKey(extend(walked, key))),
                }
            } else {
                match map.get_mut(&key) {
                    Some(child) => remove(child, rest, &extend(walked, &key)),
                    None => Err(MixinError::MissingKey(extend(walked, key))),
                }
            }
        }
        _ => Err(MixinError::NotNavigable(walked.to_string())),
    }
}

/// Set the value at the path. An index equal to the length of an array
/// appends to it.
pub fn add(
    target: &mut Value,
    segments: &[Segment],
    value: &Value,
    walked: &str,
) -> Result<(), MixinError> {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            *target = value.clone();
            return Ok(());
        }
    };

    match target {
        Value::Array(items) | Value::Ordered(items) => match head {
            Segment::Key(_) => {
                for (i, item) in items
                    .iter_mut()
                    .enumerate()
                {
                    add(item, segments, value, &extend(walked, i))?;
                }
                Ok(())
            }
            Segment::Index(index) => {
                let len = items.len();
                if rest.is_empty() && *index == len {
                    items.push(value.clone());
                    return Ok(());
                }
                match items.get_mut(*index) {
                    Some(item) => add(item, rest, value, &extend(walked, index)),
                    None => Err(MixinError::IndexOutOfBounds(walked.to_string(), *index, len)),
                }
            }
        },
        Value::Object(map) => {
            let key = head.key();
            if rest.is_empty() {
                map.insert(key, value.clone());
                Ok(())
            } else {
                match map.get_mut(&key) {
                    Some(child) => add(child, rest, value, &extend(walked, &key)),
                    None => Err(MixinError::MissingKey(extend(walked, key))),
                }
            }
        }
        _ => Err(MixinError::NotNavigable(walked.to_string())),
    }
}
