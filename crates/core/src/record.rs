//! Serializable record capability.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A flat record that external persistence can store field by field.
///
/// Only types whose every field is meaningful to downstream consumers implement
/// this; catalog listings do not.
pub trait Record: Serialize + DeserializeOwned {
    /// Field names, in the order external consumers expect them.
    const FIELDS: &'static [&'static str];
}
