use crate::structs::{MetadataField, MetadataRecord};
use serde_json::Value;

fn get_f64(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(Value::as_f64)
}

fn get_u64(raw: &Value, key: &str) -> Option<u64> {
    raw.get(key).and_then(Value::as_u64)
}

fn get_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Renders a raw tag value the way the operator should see it: strings
/// without JSON quoting, everything else via its JSON representation.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turns the analyzer's raw numeric JSON output into a canonical
/// [`MetadataRecord`].
///
/// Presence rule: a field that is missing or JSON `null` is absent; any
/// supplied value, including numeric zero, is present. Two structural
/// invariants are enforced here so no downstream view has to re-derive
/// them:
///
/// * GPS pairing: if exactly one of latitude/longitude is supplied, both
///   are dropped. A half coordinate must never reach the map or report.
/// * Dimensions: width and height co-occur or are both dropped.
///
/// `all_fields` keeps every tag in the analyzer's reported order, with
/// duplicates, since that order mirrors the binary tag layout.
pub fn normalize(raw: &Value) -> MetadataRecord {
    let (gps_latitude, gps_longitude) = match (
        get_f64(raw, "GPSLatitude"),
        get_f64(raw, "GPSLongitude"),
    ) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => (None, None),
    };
    let (width, height) = match (
        get_u64(raw, "ImageWidth").filter(|w| *w > 0),
        get_u64(raw, "ImageHeight").filter(|h| *h > 0),
    ) {
        (Some(w), Some(h)) => (Some(w), Some(h)),
        _ => (None, None),
    };

    let all_fields = raw
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(tag, value)| MetadataField {
                    tag: tag.clone(),
                    value: display_value(value),
                })
                .collect()
        })
        .unwrap_or_default();

    MetadataRecord {
        camera_make: get_string(raw, "Make"),
        camera_model: get_string(raw, "Model"),
        date_taken: get_string(raw, "DateTimeOriginal")
            .or_else(|| get_string(raw, "CreateDate"))
            .or_else(|| get_string(raw, "ModifyDate")),
        software: get_string(raw, "Software"),
        width,
        height,
        orientation: get_u64(raw, "Orientation"),
        gps_latitude,
        gps_longitude,
        gps_altitude: get_f64(raw, "GPSAltitude"),
        iso: get_u64(raw, "ISO"),
        exposure_time: get_f64(raw, "ExposureTime"),
        f_number: get_f64(raw, "FNumber").or_else(|| get_f64(raw, "Aperture")),
        focal_length: get_f64(raw, "FocalLength"),
        all_fields,
    }
}
