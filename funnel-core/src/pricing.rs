use shared_types::{
    AccessPointLayout, CameraDensity, DoorCoverage, EstimateInput, EstimateResult,
    EstimateSnapshot, ProjectType, Urgency, WiringStyle,
};

const LOW_FACTOR: f64 = 0.85;
const HIGH_FACTOR: f64 = 1.10;

/// Per-square-foot starting rate for each property kind
fn base_rate(project_type: ProjectType) -> f64 {
    match project_type {
        ProjectType::Home => 1.8,
        ProjectType::Office => 2.4,
        ProjectType::Retail => 2.1,
        ProjectType::Industrial => 2.6,
    }
}

fn rate_for(input: &EstimateInput) -> f64 {
    let mut rate = base_rate(input.project_type);

    if input.focus.cameras {
        rate += 0.25;
    }
    if input.focus.wifi {
        rate += 0.15;
    }
    if input.focus.access_control {
        rate += 0.35;
    }

    rate += match input.devices.cameras {
        CameraDensity::Heavy => 0.4,
        CameraDensity::Light => -0.15,
        CameraDensity::Standard => 0.0,
    };

    if input.devices.aps == AccessPointLayout::Mesh {
        rate += 0.25;
    }

    rate += match input.devices.doors {
        DoorCoverage::AFew => 0.2,
        DoorCoverage::MultiDoor => 0.55,
        DoorCoverage::None => 0.0,
    };

    if input.extras.speakers {
        rate += 0.2;
    }
    if input.extras.wall_displays {
        rate += 0.25;
    }
    if input.extras.mini_rack {
        rate += 0.3;
    }
    if input.extras.battery_backup {
        rate += 0.25;
    }

    if input.style.wiring == WiringStyle::HiddenInWalls {
        rate += 0.4;
    }
    if input.style.urgency == Urgency::Rush {
        rate += 0.35;
    }

    rate
}

/// Price an estimator wizard submission
pub fn compute_estimate(input: &EstimateInput) -> EstimateResult {
    let sqft = f64::from(input.square_footage);

    let est_cameras = if input.focus.cameras {
        ((sqft / 700.0).round() as u32).max(3)
    } else {
        0
    };

    let est_aps = if input.focus.wifi {
        ((sqft / 1500.0).round() as u32).max(1)
    } else {
        0
    };

    let raw = sqft * rate_for(input);

    EstimateResult {
        input: input.clone(),
        price_low: (raw * LOW_FACTOR).round() as u32,
        price_high: (raw * HIGH_FACTOR).round() as u32,
        est_cameras,
        est_aps,
    }
}

fn focus_labels(input: &EstimateInput) -> Vec<String> {
    let mut focus = Vec::new();
    if input.focus.cameras {
        focus.push("cameras".to_string());
    }
    if input.focus.wifi {
        focus.push("wifi".to_string());
    }
    if input.focus.access_control {
        focus.push("access-control".to_string());
    }
    focus
}

fn extra_labels(input: &EstimateInput) -> Vec<String> {
    let mut extras = Vec::new();
    if input.extras.speakers {
        extras.push("speakers".to_string());
    }
    if input.extras.wall_displays {
        extras.push("wall-displays".to_string());
    }
    if input.extras.mini_rack {
        extras.push("mini-rack".to_string());
    }
    if input.extras.battery_backup {
        extras.push("battery-backup".to_string());
    }
    extras
}

fn wire_name<T: serde::Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => Some(name),
        _ => None,
    }
}

/// Loose snapshot of a priced estimate, as stored with bookings and quote sessions
pub fn to_snapshot(result: &EstimateResult) -> EstimateSnapshot {
    let input = &result.input;
    let notes = input.notes.trim();

    EstimateSnapshot {
        project_type: Some(input.project_type.as_str().to_string()),
        square_footage: Some(f64::from(input.square_footage)),
        focus: focus_labels(input),
        coverage_profile: wire_name(&input.devices.cameras),
        wifi_layout: wire_name(&input.devices.aps),
        doors_access: wire_name(&input.devices.doors),
        extras: extra_labels(input),
        wiring_style: wire_name(&input.style.wiring),
        rack_location: wire_name(&input.style.rack_location),
        timeline: wire_name(&input.style.urgency),
        rough_low: Some(f64::from(result.price_low)),
        rough_high: Some(f64::from(result.price_high)),
        notes: if notes.is_empty() {
            None
        } else {
            Some(notes.to_string())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wizard_estimate() {
        let result = compute_estimate(&EstimateInput::default());

        // 1800 sqft home, cameras + wifi focus: rate 1.8 + 0.25 + 0.15 = 2.2
        assert_eq!(result.price_low, 3366);
        assert_eq!(result.price_high, 4356);
        assert_eq!(result.est_cameras, 3);
        assert_eq!(result.est_aps, 1);
    }

    #[test]
    fn test_device_counts_scale_with_area() {
        let input = EstimateInput {
            square_footage: 7000,
            ..EstimateInput::default()
        };
        let result = compute_estimate(&input);
        assert_eq!(result.est_cameras, 10);
        assert_eq!(result.est_aps, 5);
    }

    #[test]
    fn test_no_focus_means_no_devices() {
        let mut input = EstimateInput::default();
        input.focus.cameras = false;
        input.focus.wifi = false;

        let result = compute_estimate(&input);
        assert_eq!(result.est_cameras, 0);
        assert_eq!(result.est_aps, 0);
        // bare home rate 1.8
        assert_eq!(result.price_low, 2754);
        assert_eq!(result.price_high, 3564);
    }

    #[test]
    fn test_every_adder_applies() {
        let mut input = EstimateInput {
            project_type: ProjectType::Industrial,
            square_footage: 1000,
            ..EstimateInput::default()
        };
        input.focus.access_control = true;
        input.devices.cameras = CameraDensity::Heavy;
        input.devices.aps = AccessPointLayout::Mesh;
        input.devices.doors = DoorCoverage::MultiDoor;
        input.extras.speakers = true;
        input.extras.wall_displays = true;
        input.extras.mini_rack = true;
        input.extras.battery_backup = true;
        input.style.wiring = WiringStyle::HiddenInWalls;
        input.style.urgency = Urgency::Rush;

        // 2.6 + .25 + .15 + .35 + .4 + .25 + .55 + .2 + .25 + .3 + .25 + .4 + .35 = 6.3
        let result = compute_estimate(&input);
        assert_eq!(result.price_low, 5355);
        assert_eq!(result.price_high, 6930);
    }

    #[test]
    fn test_light_cameras_lower_the_rate() {
        let mut light = EstimateInput::default();
        light.devices.cameras = CameraDensity::Light;

        let standard = compute_estimate(&EstimateInput::default());
        let light = compute_estimate(&light);
        assert!(light.price_high < standard.price_high);
    }

    #[test]
    fn test_snapshot_carries_price_and_choices() {
        let mut input = EstimateInput::default();
        input.devices.doors = DoorCoverage::AFew;
        input.extras.mini_rack = true;
        input.notes = "  Gate camera  ".to_string();

        let result = compute_estimate(&input);
        let snapshot = to_snapshot(&result);

        assert_eq!(snapshot.project_type.as_deref(), Some("home"));
        assert_eq!(snapshot.focus, vec!["cameras", "wifi"]);
        assert_eq!(snapshot.doors_access.as_deref(), Some("a-few"));
        assert_eq!(snapshot.extras, vec!["mini-rack"]);
        assert_eq!(snapshot.wiring_style.as_deref(), Some("mix"));
        assert_eq!(snapshot.rough_low, Some(f64::from(result.price_low)));
        assert_eq!(snapshot.notes.as_deref(), Some("Gate camera"));
    }
}
