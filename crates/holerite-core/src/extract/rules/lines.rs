//! Line-shape heuristics: `LABEL: VALUE` lines and label/value line pairs.

use crate::models::record::{normalize_key, FieldRecord};

use super::patterns::{BARE_LABEL_LINE, LABEL_VALUE_LINE};

/// Split a `LABEL SEP VALUE` line into its trimmed label and value.
///
/// The label must hold at least one letter; digits never appear in it.
pub fn split_label_value(line: &str) -> Option<(&str, &str)> {
    let caps = LABEL_VALUE_LINE.captures(line)?;
    let label = caps.name("label")?.as_str().trim();
    let value = caps.name("value")?.as_str().trim();

    if label.chars().any(char::is_alphabetic) && !value.is_empty() {
        Some((label, value))
    } else {
        None
    }
}

/// Whether `line` consists only of a label (letters, spaces, hyphens,
/// slashes; three characters or more).
pub fn is_bare_label(line: &str) -> bool {
    BARE_LABEL_LINE.is_match(line) && line.chars().any(char::is_alphabetic)
}

/// Fill `record` from the line shapes of `text`, without overwriting keys.
///
/// Every `LABEL: VALUE` line is applied before any label/value line pair,
/// so a pair earlier on the page never claims a key that a later
/// `LABEL: VALUE` line fills. Pairs are only formed from lines without the
/// `LABEL: VALUE` shape.
pub fn apply_label_lines(text: &str, record: &mut FieldRecord) {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let mut bare = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.chars().count() < 3 {
            continue;
        }

        if let Some((label, value)) = split_label_value(line) {
            record.insert_first(normalize_key(label), value);
        } else if is_bare_label(line) {
            bare.push(i);
        }
    }

    for i in bare {
        if let Some(next) = lines.get(i + 1).filter(|next| !next.is_empty()) {
            record.insert_first(normalize_key(lines[i]), next);
        }
    }
}
