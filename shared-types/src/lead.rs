use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Position of a lead in the sales pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Engaged,
    Qualified,
    Quoted,
    Booked,
    Won,
    Lost,
    Dormant,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Engaged => "engaged",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Quoted => "quoted",
            LeadStatus::Booked => "booked",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
            LeadStatus::Dormant => "dormant",
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(LeadStatus::New),
            "engaged" => Ok(LeadStatus::Engaged),
            "qualified" => Ok(LeadStatus::Qualified),
            "quoted" => Ok(LeadStatus::Quoted),
            "booked" => Ok(LeadStatus::Booked),
            "won" => Ok(LeadStatus::Won),
            "lost" => Ok(LeadStatus::Lost),
            "dormant" => Ok(LeadStatus::Dormant),
            _ => Err(format!("Invalid lead status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    #[default]
    SmartnetFunnel,
    Website,
    Social,
    Referral,
    Google,
    Other,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::SmartnetFunnel => "smartnet_funnel",
            LeadSource::Website => "website",
            LeadSource::Social => "social",
            LeadSource::Referral => "referral",
            LeadSource::Google => "google",
            LeadSource::Other => "other",
        }
    }
}

impl std::str::FromStr for LeadSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smartnet_funnel" => Ok(LeadSource::SmartnetFunnel),
            "website" => Ok(LeadSource::Website),
            "social" => Ok(LeadSource::Social),
            "referral" => Ok(LeadSource::Referral),
            "google" => Ok(LeadSource::Google),
            "other" => Ok(LeadSource::Other),
            _ => Err(format!("Invalid lead source: {}", s)),
        }
    }
}

/// Unified lead record, one per person (email, else phone)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub primary_job_location: Option<String>,
    pub status: LeadStatus,
    pub lead_source: LeadSource,
    pub last_estimate_total: Option<f64>,
    pub last_estimate_currency: String,
    pub last_interaction_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}
