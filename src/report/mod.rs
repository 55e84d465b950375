//! Violation rendering with two structurally equivalent output formats
//!
//! CDD Principle: Anti-Corruption Layer - adapters translate domain objects to external formats
//! - One canonical field-extraction step produces the ordered field rows
//! - The JSON and XML adapters are thin views over the same rows, so the two
//!   outputs can not drift apart field-by-field
//! - Extraction runs to completion before any output text is built; a
//!   malformed record fails atomically with no partial output

use crate::domain::{QualityError, QualityResult, ViolationRecord};
use chrono::{DateTime, FixedOffset};
use serde_json::Value as JsonValue;
use std::io::Write;

/// Wire format of the violation's created-at timestamp: local-offset
/// ISO-8601, seconds precision, numeric zone offset without colon
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Supported output formats for violation records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON-shaped representation for API consumers
    Json,
    /// XML-shaped representation for report consumers
    Xml,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["json", "xml"]
    }
}

/// Renders one violation record into either output format
#[derive(Debug, Clone, Copy, Default)]
pub struct ViolationFormatter;

impl ViolationFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Render a violation record in the specified format
    pub fn format_record(
        &self,
        record: &ViolationRecord,
        format: OutputFormat,
    ) -> QualityResult<String> {
        let rows = field_rows(record)?;
        match format {
            OutputFormat::Json => render_json(&rows),
            OutputFormat::Xml => Ok(render_xml(&rows)),
        }
    }

    /// Write a rendered record to a writer
    pub fn write_record<W: Write>(
        &self,
        record: &ViolationRecord,
        format: OutputFormat,
        mut writer: W,
    ) -> QualityResult<()> {
        let formatted = self.format_record(record, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }
}

/// Canonical field extraction, shared by both format adapters
///
/// Row order is the wire order: message, line, priority, switchedOff,
/// createdAt, rule, resource, review. Optional fields are omitted, never
/// rendered as null.
fn field_rows(record: &ViolationRecord) -> QualityResult<Vec<(&'static str, JsonValue)>> {
    // Resolve the required reference chain first so a malformed record
    // fails before any output text exists
    let rule = record.rule();
    let project = record.project()?;

    let mut rows: Vec<(&'static str, JsonValue)> = Vec::with_capacity(8);
    rows.push(("message", JsonValue::from(record.message())));
    if let Some(line) = record.line() {
        rows.push(("line", JsonValue::from(line)));
    }
    rows.push(("priority", JsonValue::from(record.priority().as_str())));
    rows.push(("switchedOff", JsonValue::from(record.switched_off())));
    if let Some(created_at) = record.created_at() {
        rows.push(("createdAt", JsonValue::from(format_datetime(created_at))));
    }
    rows.push((
        "rule",
        serde_json::json!({
            "key": rule.key,
            "name": rule.name,
        }),
    ));
    rows.push((
        "resource",
        serde_json::json!({
            "key": project.key,
            "name": project.name,
            "scope": project.scope,
            "qualifier": project.qualifier,
            "language": project.language,
        }),
    ));
    if let Some(review) = record.open_review() {
        // Self-contained fragment: the review must not re-embed this violation
        rows.push(("review", review.to_json_fragment(false)));
    }
    Ok(rows)
}

/// Format a timestamp for the wire, e.g. `2011-03-05T14:30:00+0000`
fn format_datetime(datetime: DateTime<FixedOffset>) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

/// JSON adapter: field rows as a pretty-printed object
fn render_json(rows: &[(&'static str, JsonValue)]) -> QualityResult<String> {
    let mut object = serde_json::Map::new();
    for (name, value) in rows {
        object.insert((*name).to_string(), value.clone());
    }
    serde_json::to_string_pretty(&JsonValue::Object(object))
        .map_err(|e| QualityError::validation(format!("JSON serialization failed: {}", e)))
}

/// XML adapter: field rows as nested elements under a `<violation>` root
fn render_xml(rows: &[(&'static str, JsonValue)]) -> String {
    let mut xml = String::new();
    xml.push_str("<violation>");
    for (name, value) in rows {
        write_element(name, value, &mut xml);
    }
    xml.push_str("</violation>");
    xml
}

fn write_element(name: &str, value: &JsonValue, out: &mut String) {
    match value {
        JsonValue::Object(map) => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            for (key, nested) in map {
                write_element(key, nested, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        // Repeated elements, one per item
        JsonValue::Array(items) => {
            for item in items {
                write_element(name, item, out);
            }
        }
        // Omitted fields never reach the rows; an explicit null inside a
        // review fragment renders as an empty element
        JsonValue::Null => {
            out.push('<');
            out.push_str(name);
            out.push_str("/>");
        }
        JsonValue::String(s) => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            out.push_str(&escape_xml(s));
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        other => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            out.push_str(&other.to_string());
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reviews::testing::StubReview;
    use crate::domain::{Detection, Priority, Project, Review, RuleRef, Snapshot};
    use chrono::TimeZone;

    fn project() -> Project {
        Project {
            key: "org.example:core".to_string(),
            name: "Example Core".to_string(),
            scope: "FIL".to_string(),
            qualifier: "CLA".to_string(),
            language: "java".to_string(),
        }
    }

    fn base_detection() -> Detection {
        Detection::new("Avoid magic numbers", Priority::Critical)
            .with_rule(RuleRef::new("squid:S109", "Magic numbers should not be used"))
            .with_snapshot(Snapshot::of(project()))
    }

    fn full_record() -> ViolationRecord {
        let created = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2011, 3, 5, 14, 30, 0)
            .unwrap();
        let reviews: Vec<Box<dyn Review>> = vec![
            Box::new(StubReview::at_minute("closed", 0)),
            Box::new(StubReview::at_minute("open", 10)),
        ];
        ViolationRecord::from_detection(
            base_detection().with_line(12).with_created_at(created),
            99,
            reviews,
        )
        .unwrap()
    }

    fn minimal_record() -> ViolationRecord {
        ViolationRecord::from_detection(base_detection(), 1, Vec::new()).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("XML"), Some(OutputFormat::Xml));
        assert_eq!(OutputFormat::from_str("yaml"), None);
        assert_eq!(OutputFormat::all_formats(), ["json", "xml"]);
    }

    #[test]
    fn test_json_output_full_record() {
        let formatter = ViolationFormatter::new();
        let output = formatter.format_record(&full_record(), OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(json["message"], "Avoid magic numbers");
        assert_eq!(json["line"], 12);
        assert_eq!(json["priority"], "CRITICAL");
        assert_eq!(json["switchedOff"], false);
        assert_eq!(json["createdAt"], "2011-03-05T14:30:00+0000");
        assert_eq!(json["rule"]["key"], "squid:S109");
        assert_eq!(json["rule"]["name"], "Magic numbers should not be used");
        assert_eq!(json["resource"]["key"], "org.example:core");
        assert_eq!(json["resource"]["name"], "Example Core");
        assert_eq!(json["resource"]["scope"], "FIL");
        assert_eq!(json["resource"]["qualifier"], "CLA");
        assert_eq!(json["resource"]["language"], "java");
        assert_eq!(json["review"]["status"], "open");
        // The embedded fragment is the review's self-contained form
        assert!(json["review"].get("violation").is_none());
    }

    #[test]
    fn test_json_output_minimal_record() {
        let formatter = ViolationFormatter::new();
        let output = formatter.format_record(&minimal_record(), OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        // Absent optionals are omitted, not null
        assert!(json.get("line").is_none());
        assert!(json.get("createdAt").is_none());
        assert!(json.get("review").is_none());
        // Unset switched-off still renders as an explicit false
        assert_eq!(json["switchedOff"], false);
    }

    #[test]
    fn test_xml_output_full_record() {
        let formatter = ViolationFormatter::new();
        let output = formatter.format_record(&full_record(), OutputFormat::Xml).unwrap();

        assert!(output.starts_with("<violation>"));
        assert!(output.ends_with("</violation>"));
        assert!(output.contains("<message>Avoid magic numbers</message>"));
        assert!(output.contains("<line>12</line>"));
        assert!(output.contains("<priority>CRITICAL</priority>"));
        assert!(output.contains("<switchedOff>false</switchedOff>"));
        assert!(output.contains("<createdAt>2011-03-05T14:30:00+0000</createdAt>"));
        assert!(output.contains("<key>squid:S109</key>"));
        assert!(output.contains("<resource>"));
        assert!(output.contains("<language>java</language>"));
        assert!(output.contains("<review>"));
        assert!(output.contains("<status>open</status>"));
    }

    #[test]
    fn test_xml_output_minimal_record() {
        let formatter = ViolationFormatter::new();
        let output = formatter.format_record(&minimal_record(), OutputFormat::Xml).unwrap();

        assert!(!output.contains("<line>"));
        assert!(!output.contains("<createdAt>"));
        assert!(!output.contains("<review>"));
        assert!(output.contains("<switchedOff>false</switchedOff>"));
    }

    #[test]
    fn test_xml_escaping() {
        let detection = Detection::new("Use <, > & \"quotes\" carefully", Priority::Minor)
            .with_rule(RuleRef::new("squid:S1", "A & B"))
            .with_snapshot(Snapshot::of(project()));
        let record = ViolationRecord::from_detection(detection, 1, Vec::new()).unwrap();

        let formatter = ViolationFormatter::new();
        let output = formatter.format_record(&record, OutputFormat::Xml).unwrap();
        assert!(output
            .contains("<message>Use &lt;, &gt; &amp; &quot;quotes&quot; carefully</message>"));
        assert!(output.contains("<name>A &amp; B</name>"));
    }

    #[test]
    fn test_field_parity_between_formats() {
        for record in [full_record(), minimal_record()] {
            let rows = field_rows(&record).unwrap();
            let formatter = ViolationFormatter::new();

            let json_output = formatter.format_record(&record, OutputFormat::Json).unwrap();
            let json: JsonValue = serde_json::from_str(&json_output).unwrap();
            let xml_output = formatter.format_record(&record, OutputFormat::Xml).unwrap();

            // The JSON object carries exactly the canonical field set
            let json_keys: Vec<&str> =
                json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
            let mut row_names: Vec<&str> = rows.iter().map(|(name, _)| *name).collect();
            row_names.sort_unstable();
            assert_eq!(json_keys, row_names);

            // Field-by-field: the JSON value matches the canonical value and
            // the XML output carries the same field with the same encoding
            for (name, value) in &rows {
                assert_eq!(&json[*name], value);
                assert!(xml_output.contains(&format!("<{}>", name)));
                match value {
                    JsonValue::String(s) => {
                        assert!(xml_output
                            .contains(&format!("<{}>{}</{}>", name, escape_xml(s), name)));
                    }
                    JsonValue::Number(n) => {
                        assert!(xml_output.contains(&format!("<{}>{}</{}>", name, n, name)));
                    }
                    JsonValue::Bool(b) => {
                        assert!(xml_output.contains(&format!("<{}>{}</{}>", name, b, name)));
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_datetime_rendering_with_nonzero_offset() {
        let created = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2011, 3, 5, 14, 30, 0)
            .unwrap();
        let record = ViolationRecord::from_detection(
            base_detection().with_created_at(created),
            1,
            Vec::new(),
        )
        .unwrap();

        let formatter = ViolationFormatter::new();
        let json = formatter.format_record(&record, OutputFormat::Json).unwrap();
        let xml = formatter.format_record(&record, OutputFormat::Xml).unwrap();
        assert!(json.contains("2011-03-05T14:30:00+0100"));
        assert!(xml.contains("<createdAt>2011-03-05T14:30:00+0100</createdAt>"));
    }

    #[test]
    fn test_write_record() {
        let formatter = ViolationFormatter::new();
        let mut buffer = Vec::new();
        formatter.write_record(&minimal_record(), OutputFormat::Json, &mut buffer).unwrap();
        let json: JsonValue = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["priority"], "CRITICAL");
    }
}
