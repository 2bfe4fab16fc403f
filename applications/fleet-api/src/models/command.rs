use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /commands`. Every field is optional so that missing
/// values can be reported with the protocol's own error message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRequest {
    pub asset_id: Option<String>,
    pub cmd: Option<String>,
    pub params: Option<Value>,
    pub user_name: Option<String>,
}

impl CommandRequest {
    /// Read a request body leniently. A missing or non-JSON body, a body that
    /// is not an object, and fields that are not strings all count as absent.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            asset_id: text("asset_id"),
            cmd: text("cmd"),
            params: value.get("params").filter(|p| !p.is_null()).cloned(),
            user_name: text("user_name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub status: String,
}
