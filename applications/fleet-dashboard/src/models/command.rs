use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest<'a> {
    pub user_name: &'a str,
    pub asset_id: &'a str,
    pub cmd: &'a str,
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub status: String,
}
