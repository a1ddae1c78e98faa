// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::engine::Record;

/// Field that carries the tracking identifier of a finding.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "RVA ID";

/// Number of digits in a canonical identifier.
pub const IDENTIFIER_DIGITS: usize = 4;

lazy_static! {
    // Four ASCII digits with an optional `.N` increment, at the very end of
    // the text. Anything before it is prefix.
    static ref IDENTIFIER: Regex = Regex::new(r"([0-9]{4}(?:\.([0-9]+))?)$").ok().unwrap();
}

/// The pieces of an identifier value that matched the expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierMatch<'text> {
    pub prefix: &'text str,
    pub group: &'text str,
    pub increment: Option<&'text str>,
}

/// Matches `text` against the identifier shape. When more than four digits
/// precede the increment, the leading extras are part of the prefix.
pub fn parse_identifier(text: &str) -> Option<IdentifierMatch<'_>> {
    let captures = IDENTIFIER.captures(text)?;
    let group = captures.get(1)?;
    Some(IdentifierMatch {
        prefix: &text[..group.start()],
        group: group.as_str(),
        increment: captures.get(2).map(|m| m.as_str()),
    })
}

/// The canonical identifier is the first four digits of the matched group,
/// dropping any increment.
pub fn canonical_digits(group: &str) -> &str {
    &group[..IDENTIFIER_DIGITS.min(group.len())]
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierOutcome {
    Normalized { original: String, canonical: String },
    Absent,
    Mismatch { value: Value },
}

impl IdentifierOutcome {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, IdentifierOutcome::Mismatch { .. })
    }
}

/// Rewrites `record[field_name]` to its canonical four-digit form.
///
/// A missing field leaves the record alone. A value that does not end in
/// an identifier is left untouched and handed back as a mismatch. Numbers
/// are matched on their JSON text, other non-string values never match.
pub fn normalize_identifier(record: &mut Record, field_name: &str) -> IdentifierOutcome {
    let value = match record.get_mut(field_name) {
        Some(value) => value,
        None => return IdentifierOutcome::Absent,
    };

    let text = match &*value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return IdentifierOutcome::Mismatch {
                value: other.clone(),
            }
        }
    };

    match parse_identifier(&text) {
        Some(found) => {
            let canonical = canonical_digits(found.group).to_string();
            *value = Value::String(canonical.clone());
            IdentifierOutcome::Normalized {
                original: text,
                canonical,
            }
        }
        None => IdentifierOutcome::Mismatch {
            value: value.clone(),
        },
    }
}

#[cfg(test)]
#[path = "identifier_tests.rs"]
mod identifier_tests;
