use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::estimate::EstimateSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MagicLinkStatus {
    #[default]
    Active,
    Redeemed,
    Expired,
}

impl MagicLinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MagicLinkStatus::Active => "active",
            MagicLinkStatus::Redeemed => "redeemed",
            MagicLinkStatus::Expired => "expired",
        }
    }
}

impl std::str::FromStr for MagicLinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MagicLinkStatus::Active),
            "redeemed" => Ok(MagicLinkStatus::Redeemed),
            "expired" => Ok(MagicLinkStatus::Expired),
            _ => Err(format!("Invalid magic link status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct MagicLinkContact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub job_location: Option<String>,
}

/// Body of `POST /api/magic-link`
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CreateMagicLinkRequest {
    pub contact: MagicLinkContact,
    pub estimate: Option<EstimateSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateMagicLinkResponse {
    pub ok: bool,
    pub quote_url: String,
    pub token: String,
    pub lead_id: String,
    pub session_id: String,
}

/// Saved quote session reachable through a magic link
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkSession {
    pub id: String,
    pub token: String,
    pub lead_id: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_location: Option<String>,
    pub status: MagicLinkStatus,
    pub estimate_total: Option<f64>,
    pub estimate_summary: String,
    pub estimate: Option<EstimateSnapshot>,
    pub expires_at: i64,
    pub created_at: i64,
    pub last_accessed_at: Option<i64>,
    pub restored: bool,
    pub restored_at: Option<i64>,
}

/// Response of `GET /api/magic-link/{token}`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RestoreMagicLinkResponse {
    pub ok: bool,
    pub is_expired: bool,
    pub session: MagicLinkSession,
    pub estimate: Option<EstimateSnapshot>,
}
