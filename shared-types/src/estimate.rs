use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Kind of property the estimate is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    #[default]
    Home,
    Office,
    Retail,
    Industrial,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Home => "home",
            ProjectType::Office => "office",
            ProjectType::Retail => "retail",
            ProjectType::Industrial => "industrial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum CameraDensity {
    Light,
    #[default]
    Standard,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPointLayout {
    Light,
    #[default]
    Standard,
    Mesh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum DoorCoverage {
    #[default]
    None,
    AFew,
    MultiDoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum WiringStyle {
    ExposedConduit,
    HiddenInWalls,
    #[default]
    Mix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum RackLocation {
    #[default]
    Closet,
    Utility,
    Idc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    #[default]
    Flexible,
    Soon,
    Rush,
}

/// Which systems the customer wants covered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FocusSelection {
    pub cameras: bool,
    pub wifi: bool,
    pub access_control: bool,
}

impl Default for FocusSelection {
    fn default() -> Self {
        Self {
            cameras: true,
            wifi: true,
            access_control: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSelection {
    pub cameras: CameraDensity,
    pub aps: AccessPointLayout,
    pub doors: DoorCoverage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasSelection {
    pub speakers: bool,
    pub wall_displays: bool,
    pub mini_rack: bool,
    pub battery_backup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StyleSelection {
    pub wiring: WiringStyle,
    pub rack_location: RackLocation,
    pub urgency: Urgency,
}

/// Estimator wizard state. Missing fields fall back to the wizard defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateInput {
    pub project_type: ProjectType,
    pub square_footage: u32,
    pub focus: FocusSelection,
    pub devices: DeviceSelection,
    pub extras: ExtrasSelection,
    pub style: StyleSelection,
    pub notes: String,
}

impl Default for EstimateInput {
    fn default() -> Self {
        Self {
            project_type: ProjectType::Home,
            square_footage: 1800,
            focus: FocusSelection::default(),
            devices: DeviceSelection::default(),
            extras: ExtrasSelection::default(),
            style: StyleSelection::default(),
            notes: String::new(),
        }
    }
}

/// Priced estimate returned by `POST /api/estimate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub input: EstimateInput,
    pub price_low: u32,
    pub price_high: u32,
    pub est_cameras: u32,
    pub est_aps: u32,
}

/// Loose estimate snapshot attached to bookings and magic-link sessions.
///
/// Every field is optional because the front-end sends whatever the wizard
/// collected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateSnapshot {
    pub project_type: Option<String>,
    pub square_footage: Option<f64>,
    pub focus: Vec<String>,
    pub coverage_profile: Option<String>,
    pub wifi_layout: Option<String>,
    pub doors_access: Option<String>,
    pub extras: Vec<String>,
    pub wiring_style: Option<String>,
    pub rack_location: Option<String>,
    pub timeline: Option<String>,
    pub rough_low: Option<f64>,
    pub rough_high: Option<f64>,
    pub notes: Option<String>,
}
