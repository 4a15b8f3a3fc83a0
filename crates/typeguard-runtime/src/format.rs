//! Error-reporting policy shared by every validator.
//!
//! Conditional schemas make some engines report an extra `if` error next to
//! the failure inside the chosen branch. That record carries no information
//! of its own and is dropped before formatting.

use crate::predicate::ErrorRecord;
use serde_json::Value;

/// Keyword of the branch-selection record removed by [`filter_conditional`].
pub const CONDITIONAL_KEYWORD: &str = "if";

pub fn filter_conditional(records: Vec<ErrorRecord>) -> Vec<ErrorRecord> {
    records
        .into_iter()
        .filter(|record| record.keyword != CONDITIONAL_KEYWORD)
        .collect()
}

/// Render records as `<data_var><path> <message>`, comma separated.
pub fn errors_text(records: &[ErrorRecord], data_var: &str) -> String {
    if records.is_empty() {
        return "No errors".to_string();
    }
    records
        .iter()
        .map(|record| {
            format!(
                "{data_var}{} {}",
                display_path(&record.data_path),
                record.message
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Developer-facing dump of an offending value.
pub fn inspect(value: &Value) -> String {
    format!("{value:#}")
}

/// `/items/0/first name` becomes `.items[0]['first name']`.
fn display_path(pointer: &str) -> String {
    let mut out = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            out.push_str(&format!("[{segment}]"));
        } else if is_plain_identifier(&segment) {
            out.push('.');
            out.push_str(&segment);
        } else {
            out.push_str(&format!("['{}']", segment.replace('\'', "\\'")));
        }
    }
    out
}

fn is_plain_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
