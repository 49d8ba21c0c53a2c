use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body of `POST /api/owner/access`
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct OwnerAccessRequest {
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OwnerAccessResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `DELETE /api/owner/dev`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClearTestDataResponse {
    pub ok: bool,
    pub deleted: u32,
    pub ids: Vec<String>,
}
