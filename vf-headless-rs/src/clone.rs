//! `structuredClone` as a JSON round trip.

use crate::error::{HostError, HostResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Deep-copy `value` by serializing it to JSON text and parsing it back.
///
/// Values JSON cannot carry fail: non-finite floats serialize as `null` and do not
/// read back as numbers.
pub fn structured_clone<T>(value: &T) -> HostResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let text = serde_json::to_string(value)?;
    serde_json::from_str(&text).map_err(|err| HostError::CloneFailed(err.to_string()))
}
