use crate::structs::MetadataRecord;
use serde::{Deserialize, Serialize};

/// Named report sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Camera,
    Image,
    Location,
    Settings,
}

impl Section {
    const ALL: [Section; 4] = [
        Section::Camera,
        Section::Image,
        Section::Location,
        Section::Settings,
    ];

    fn title(self) -> &'static str {
        match self {
            Section::Camera => "Camera Information",
            Section::Image => "Image Properties",
            Section::Location => "Location Information",
            Section::Settings => "Camera Settings",
        }
    }
}

/// One named field shared by all three views.
///
/// Presence is decided once, by the record's `Option` fields; `display` and
/// `csv` always agree on whether the field exists, they only differ in
/// formatting (e.g. "4000 × 3000 pixels" vs "4000x3000"). The table is
/// ordered the way the CSV emits rows; the sectioned views group it by
/// `section`.
struct FieldDescriptor {
    section: Section,
    label: &'static str,
    csv_label: &'static str,
    display: fn(&MetadataRecord) -> Option<String>,
    csv: fn(&MetadataRecord) -> Option<String>,
}

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        section: Section::Camera,
        label: "Make",
        csv_label: "Camera Make",
        display: |r| r.camera_make.clone(),
        csv: |r| r.camera_make.clone(),
    },
    FieldDescriptor {
        section: Section::Camera,
        label: "Model",
        csv_label: "Camera Model",
        display: |r| r.camera_model.clone(),
        csv: |r| r.camera_model.clone(),
    },
    FieldDescriptor {
        section: Section::Image,
        label: "Date Taken",
        csv_label: "Date Taken",
        display: |r| r.date_taken.clone(),
        csv: |r| r.date_taken.clone(),
    },
    FieldDescriptor {
        section: Section::Image,
        label: "Dimensions",
        csv_label: "Dimensions",
        display: |r| r.width.zip(r.height).map(|(w, h)| format!("{w} × {h} pixels")),
        csv: |r| r.width.zip(r.height).map(|(w, h)| format!("{w}x{h}")),
    },
    FieldDescriptor {
        section: Section::Location,
        label: "Latitude",
        csv_label: "GPS Latitude",
        display: |r| r.gps_latitude.map(|v| format!("{v:.6}")),
        csv: |r| r.gps_latitude.map(|v| v.to_string()),
    },
    FieldDescriptor {
        section: Section::Location,
        label: "Longitude",
        csv_label: "GPS Longitude",
        display: |r| r.gps_longitude.map(|v| format!("{v:.6}")),
        csv: |r| r.gps_longitude.map(|v| v.to_string()),
    },
    FieldDescriptor {
        section: Section::Location,
        label: "Altitude",
        csv_label: "GPS Altitude",
        display: |r| r.gps_altitude.map(|v| format!("{v:.2} meters")),
        csv: |r| r.gps_altitude.map(|v| v.to_string()),
    },
    FieldDescriptor {
        section: Section::Settings,
        label: "ISO",
        csv_label: "ISO",
        display: |r| r.iso.map(|v| v.to_string()),
        csv: |r| r.iso.map(|v| v.to_string()),
    },
    FieldDescriptor {
        section: Section::Settings,
        label: "Exposure Time",
        csv_label: "Exposure Time",
        display: |r| r.exposure_time.map(|v| v.to_string()),
        csv: |r| r.exposure_time.map(|v| v.to_string()),
    },
    FieldDescriptor {
        section: Section::Settings,
        label: "F-Number",
        csv_label: "F-Number",
        display: |r| r.f_number.map(|v| v.to_string()),
        csv: |r| r.f_number.map(|v| v.to_string()),
    },
    FieldDescriptor {
        section: Section::Settings,
        label: "Focal Length",
        csv_label: "Focal Length",
        display: |r| r.focal_length.map(|v| v.to_string()),
        csv: |r| r.focal_length.map(|v| v.to_string()),
    },
    FieldDescriptor {
        section: Section::Image,
        label: "Software",
        csv_label: "Software",
        display: |r| r.software.clone(),
        csv: |r| r.software.clone(),
    },
];

fn section_entries(record: &MetadataRecord, section: Section) -> Vec<(&'static str, String)> {
    FIELDS
        .iter()
        .filter(|f| f.section == section)
        .filter_map(|f| (f.display)(record).map(|v| (f.label, v)))
        .collect()
}

/// Escapes free text for safe embedding in markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Quotes a CSV field per RFC 4180: wrap when the value contains a quote,
/// comma or line break, and double any embedded quotes.
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Sectioned on-screen view. Sections render only when at least one of
/// their fields is present; all values are escaped against markup injection.
pub fn to_html(record: &MetadataRecord) -> String {
    let mut html = String::new();

    for section in Section::ALL {
        let entries = section_entries(record, section);
        if entries.is_empty() {
            continue;
        }
        html.push_str("<div class=\"metadata-section\">");
        html.push_str(&format!("<h3>{}</h3>", section.title()));
        html.push_str("<div class=\"metadata-grid\">");
        for (label, value) in entries {
            html.push_str(&format!(
                "<div class=\"metadata-item\">\
                 <div class=\"metadata-label\">{}</div>\
                 <div class=\"metadata-value\">{}</div>\
                 </div>",
                escape_html(label),
                escape_html(&value)
            ));
        }
        html.push_str("</div></div>");
    }

    if !record.all_fields.is_empty() {
        html.push_str("<div class=\"metadata-section all-fields-section\">");
        html.push_str("<h3>All Metadata Fields</h3>");
        for field in &record.all_fields {
            html.push_str(&format!(
                "<div class=\"field-item\">\
                 <div class=\"field-tag\">{}</div>\
                 <div class=\"field-value\">{}</div>\
                 </div>",
                escape_html(&field.tag),
                escape_html(&field.value)
            ));
        }
        html.push_str("</div>");
    }

    if html.is_empty() {
        html.push_str("<p class=\"no-results\">No results available</p>");
    }
    html
}

/// Tabular view: `Field,Value` header, one row per present named field in
/// fixed order, then every raw field in analyzer order. Absent fields emit
/// no row.
pub fn to_csv(record: &MetadataRecord) -> String {
    let mut csv = String::from("Field,Value\n");
    for field in FIELDS {
        if let Some(value) = (field.csv)(record) {
            csv.push_str(&format!(
                "{},{}\n",
                csv_field(field.csv_label),
                csv_field(&value)
            ));
        }
    }
    for field in &record.all_fields {
        csv.push_str(&format!(
            "{},{}\n",
            csv_field(&field.tag),
            csv_field(&field.value)
        ));
    }
    csv
}

/// Plain-text view: same section grouping as the on-screen view, uppercase
/// headings, `Label: value` lines, blank line between sections.
pub fn to_txt(record: &MetadataRecord) -> String {
    let mut txt = String::from("DIGITAL FORENSIC IMAGE ANALYSIS RESULTS\n");
    txt.push_str(&"=".repeat(50));
    txt.push_str("\n\n");

    for section in Section::ALL {
        let entries = section_entries(record, section);
        if entries.is_empty() {
            continue;
        }
        txt.push_str(&section.title().to_uppercase());
        txt.push('\n');
        txt.push_str(&"-".repeat(30));
        txt.push('\n');
        for (label, value) in entries {
            txt.push_str(&format!("{label}: {value}\n"));
        }
        txt.push('\n');
    }

    if !record.all_fields.is_empty() {
        txt.push_str("ALL METADATA FIELDS\n");
        txt.push_str(&"-".repeat(30));
        txt.push('\n');
        for field in &record.all_fields {
            txt.push_str(&format!("{}: {}\n", field.tag, field.value));
        }
    }
    txt
}

/// Pretty-printed canonical record, as downloaded by the JSON export.
pub fn to_json(record: &MetadataRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// Downloadable artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

/// A rendered export, ready to hand to whatever saves or downloads files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub content: String,
}

pub fn render_export(
    record: &MetadataRecord,
    format: ExportFormat,
) -> serde_json::Result<ExportArtifact> {
    let artifact = match format {
        ExportFormat::Json => ExportArtifact {
            filename: "results.json",
            mime_type: "application/json",
            content: to_json(record)?,
        },
        ExportFormat::Csv => ExportArtifact {
            filename: "results.csv",
            mime_type: "text/csv",
            content: to_csv(record),
        },
        ExportFormat::Txt => ExportArtifact {
            filename: "results.txt",
            mime_type: "text/plain",
            content: to_txt(record),
        },
    };
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::MetadataField;

    fn scenario_record() -> MetadataRecord {
        MetadataRecord {
            camera_make: Some("Canon".into()),
            width: Some(4000),
            height: Some(3000),
            gps_latitude: Some(37.7749),
            gps_longitude: Some(-122.4194),
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_named_rows_for_scenario_record() {
        let csv = to_csv(&scenario_record());
        let rows: Vec<&str> = csv.lines().collect();

        assert_eq!(rows[0], "Field,Value");
        assert!(rows.contains(&"Camera Make,Canon"));
        assert!(rows.contains(&"Dimensions,4000x3000"));
        assert!(rows.contains(&"GPS Latitude,37.7749"));
        assert!(rows.contains(&"GPS Longitude,-122.4194"));
        // Absent fields produce no row at all.
        assert!(!csv.contains("Camera Model"));
        assert!(!csv.contains("ISO"));
    }

    #[test]
    fn test_csv_quote_escaping() {
        let record = MetadataRecord {
            all_fields: vec![MetadataField {
                tag: "UserComment".into(),
                value: r#"He said "hi""#.into(),
            }],
            ..Default::default()
        };
        let csv = to_csv(&record);
        assert!(csv.contains(r#"UserComment,"He said ""hi""""#));
    }

    #[test]
    fn test_csv_quotes_commas_and_newlines() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_csv_named_field_order_is_fixed() {
        let record = MetadataRecord {
            camera_make: Some("Canon".into()),
            camera_model: Some("EOS R5".into()),
            date_taken: Some("2023:06:12 14:03:22".into()),
            software: Some("Lightroom".into()),
            width: Some(4000),
            height: Some(3000),
            gps_latitude: Some(1.0),
            gps_longitude: Some(2.0),
            gps_altitude: Some(3.0),
            iso: Some(100),
            exposure_time: Some(0.004),
            f_number: Some(1.8),
            focal_length: Some(85.0),
            ..Default::default()
        };
        let labels: Vec<String> = to_csv(&record)
            .lines()
            .skip(1)
            .map(|row| row.split(',').next().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Camera Make",
                "Camera Model",
                "Date Taken",
                "Dimensions",
                "GPS Latitude",
                "GPS Longitude",
                "GPS Altitude",
                "ISO",
                "Exposure Time",
                "F-Number",
                "Focal Length",
                "Software",
            ]
        );
    }

    #[test]
    fn test_views_agree_on_field_presence() {
        let records = [
            MetadataRecord::default(),
            scenario_record(),
            MetadataRecord {
                iso: Some(0),
                gps_altitude: Some(0.0),
                ..Default::default()
            },
        ];
        for record in &records {
            for field in FIELDS {
                assert_eq!(
                    (field.display)(record).is_some(),
                    (field.csv)(record).is_some(),
                    "views disagree on presence of {}",
                    field.csv_label
                );
            }
        }
    }

    #[test]
    fn test_html_renders_only_populated_sections() {
        let html = to_html(&scenario_record());
        assert!(html.contains("<h3>Camera Information</h3>"));
        assert!(html.contains("<h3>Image Properties</h3>"));
        assert!(html.contains("<h3>Location Information</h3>"));
        assert!(!html.contains("Camera Settings"));
        assert!(html.contains("4000 × 3000 pixels"));
        assert!(html.contains("37.774900"));
    }

    #[test]
    fn test_html_escapes_free_text() {
        let record = MetadataRecord {
            camera_make: Some("<script>alert(1)</script>".into()),
            ..Default::default()
        };
        let html = to_html(&record);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_html_for_empty_record() {
        let html = to_html(&MetadataRecord::default());
        assert_eq!(html, "<p class=\"no-results\">No results available</p>");
    }

    #[test]
    fn test_txt_sections_and_all_fields_heading() {
        let mut record = scenario_record();
        record.all_fields.push(MetadataField {
            tag: "Make".into(),
            value: "Canon".into(),
        });

        let txt = to_txt(&record);
        assert!(txt.starts_with("DIGITAL FORENSIC IMAGE ANALYSIS RESULTS\n"));
        assert!(txt.contains("CAMERA INFORMATION"));
        assert!(txt.contains("Make: Canon"));
        assert!(txt.contains("Dimensions: 4000 × 3000 pixels"));
        assert!(txt.contains("LOCATION INFORMATION"));
        assert!(txt.contains("ALL METADATA FIELDS"));
        // No settings were present, so the section is omitted entirely.
        assert!(!txt.contains("CAMERA SETTINGS"));
    }

    #[test]
    fn test_export_artifacts_carry_filename_and_mime() {
        let record = scenario_record();
        let json = render_export(&record, ExportFormat::Json).unwrap();
        assert_eq!(json.filename, "results.json");
        assert_eq!(json.mime_type, "application/json");
        assert!(json.content.contains("\"camera_make\": \"Canon\""));

        let csv = render_export(&record, ExportFormat::Csv).unwrap();
        assert_eq!((csv.filename, csv.mime_type), ("results.csv", "text/csv"));

        let txt = render_export(&record, ExportFormat::Txt).unwrap();
        assert_eq!((txt.filename, txt.mime_type), ("results.txt", "text/plain"));
    }
}
