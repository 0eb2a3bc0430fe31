//! Outbound tick payload.

use serde_json::Value;

/// Serialize the constant empty sequence sent on every outbound tick.
///
/// The payload carries no data. It is regenerated on each call rather than
/// cached, so every frame reflects a fresh serialization of the (empty)
/// state. Serializing an empty array cannot fail, hence no `Result`.
pub fn tick_frame() -> String {
    Value::Array(Vec::new()).to_string()
}
