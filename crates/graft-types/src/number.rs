//! Serialization of host floating-point fields.
//!
//! The host writes whole numbers without a fractional part (`12`, not
//! `12.0`). Fields the engine reads as `f64` are written back the same way
//! so unchanged records serialize to the values they were read from.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Largest magnitude below which every whole `f64` is an exact integer.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// A float that serializes whole values as integers.
#[derive(Debug, Clone, Copy)]
struct HostFloat(f64);

impl Serialize for HostFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
            #[allow(clippy::cast_possible_truncation)]
            let whole = value as i64;
            serializer.serialize_i64(whole)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

/// Serialize a single float field.
///
/// # Errors
///
/// Propagates the serializer's error.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    HostFloat(*value).serialize(serializer)
}

/// Serialize a map of float values.
///
/// # Errors
///
/// Propagates the serializer's error.
pub fn serialize_map<K, S>(map: &BTreeMap<K, f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize,
    S: Serializer,
{
    serializer.collect_map(map.iter().map(|(key, value)| (key, HostFloat(*value))))
}
