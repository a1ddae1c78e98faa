// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Formatter;

use log::{debug, warn};
use serde_json::Value;

use crate::engine::errors::Error;
use crate::engine::identifier::{normalize_identifier, IdentifierOutcome};
use crate::engine::mapping::{apply_field_map, type_name, Collision, FieldMap};
use crate::engine::{Record, Result};

/// Parses a findings document. The top level must be a JSON array; its
/// elements are checked one by one during transformation.
pub fn parse_document(content: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(findings) => Ok(findings),
        other => Err(Error::MalformedDocument(format!(
            "expected a JSON array of findings, found {}",
            type_name(&other)
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    MappingCollision(Collision),
    IdentifierFieldAbsent { field: String },
    IdentifierFormatMismatch { field: String, value: Value },
    MalformedInput { found: &'static str },
}

impl IssueKind {
    /// Absent identifiers and collisions are informational. Mismatched
    /// identifiers and malformed records need a decision from the caller.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            IssueKind::IdentifierFormatMismatch { .. } | IssueKind::MalformedInput { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordIssue {
    pub index: usize,
    pub kind: IssueKind,
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            IssueKind::MappingCollision(collision) => {
                write!(f, "record {}: mapping collision, {}", self.index, collision)
            }
            IssueKind::IdentifierFieldAbsent { field } => {
                write!(f, "record {}: no `{}` field", self.index, field)
            }
            IssueKind::IdentifierFormatMismatch { field, value } => write!(
                f,
                "record {}: unable to extract a valid identifier from `{}` = {}",
                self.index, field, value
            ),
            IssueKind::MalformedInput { found } => write!(
                f,
                "record {}: expected a JSON object, found {}",
                self.index, found
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRecord {
    pub index: usize,
    pub record: Record,
    pub identifier: IdentifierOutcome,
    pub collisions: Vec<Collision>,
}

impl TransformedRecord {
    fn issues(&self, identifier_field: &str) -> Vec<RecordIssue> {
        let mut issues = self
            .collisions
            .iter()
            .map(|collision| RecordIssue {
                index: self.index,
                kind: IssueKind::MappingCollision(collision.clone()),
            })
            .collect::<Vec<RecordIssue>>();

        match &self.identifier {
            IdentifierOutcome::Absent => issues.push(RecordIssue {
                index: self.index,
                kind: IssueKind::IdentifierFieldAbsent {
                    field: identifier_field.to_string(),
                },
            }),
            IdentifierOutcome::Mismatch { value } => issues.push(RecordIssue {
                index: self.index,
                kind: IssueKind::IdentifierFormatMismatch {
                    field: identifier_field.to_string(),
                    value: value.clone(),
                },
            }),
            IdentifierOutcome::Normalized { .. } => {}
        }
        issues
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub total: usize,
    pub records: Vec<TransformedRecord>,
    pub issues: Vec<RecordIssue>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&IssueKind) -> bool) -> usize {
        self.issues.iter().filter(|issue| pred(&issue.kind)).count()
    }

    pub fn collisions(&self) -> usize {
        self.count(|kind| matches!(kind, IssueKind::MappingCollision(_)))
    }

    pub fn mismatches(&self) -> usize {
        self.count(|kind| matches!(kind, IssueKind::IdentifierFormatMismatch { .. }))
    }

    pub fn absent_identifiers(&self) -> usize {
        self.count(|kind| matches!(kind, IssueKind::IdentifierFieldAbsent { .. }))
    }

    pub fn malformed(&self) -> usize {
        self.count(|kind| matches!(kind, IssueKind::MalformedInput { .. }))
    }

    pub fn needs_attention(&self) -> bool {
        self.issues.iter().any(|issue| issue.kind.needs_attention())
    }

    /// Transformed records as JSON objects, in input order, optionally
    /// leaving out the ones whose identifier did not parse.
    pub fn into_values(self, skip_mismatched: bool) -> Vec<Value> {
        self.records
            .into_iter()
            .filter(|each| !(skip_mismatched && each.identifier.is_mismatch()))
            .map(|each| Value::Object(each.record))
            .collect()
    }
}

/// Applies a field map and identifier normalization to findings. The field
/// map is borrowed, so one transformer (or many) can share it for a run.
#[derive(Debug, Clone)]
pub struct Transformer<'map> {
    field_map: &'map FieldMap,
    identifier_field: String,
}

impl<'map> Transformer<'map> {
    pub fn new(field_map: &'map FieldMap, identifier_field: impl Into<String>) -> Self {
        Transformer {
            field_map,
            identifier_field: identifier_field.into(),
        }
    }

    pub fn identifier_field(&self) -> &str {
        &self.identifier_field
    }

    /// Maps then normalizes a single finding. Anything other than a JSON
    /// object is rejected as malformed.
    pub fn transform_record(
        &self,
        index: usize,
        finding: &Value,
    ) -> std::result::Result<TransformedRecord, RecordIssue> {
        let record = match finding {
            Value::Object(record) => record,
            other => {
                return Err(RecordIssue {
                    index,
                    kind: IssueKind::MalformedInput {
                        found: type_name(other),
                    },
                })
            }
        };

        let mapped = apply_field_map(record, self.field_map);
        let mut record = mapped.record;
        let identifier = normalize_identifier(&mut record, &self.identifier_field);

        Ok(TransformedRecord {
            index,
            record,
            identifier,
            collisions: mapped.collisions,
        })
    }

    pub fn transform_batch(&self, findings: &[Value]) -> BatchReport {
        let mut report = BatchReport {
            total: findings.len(),
            ..BatchReport::default()
        };

        for (index, finding) in findings.iter().enumerate() {
            match self.transform_record(index, finding) {
                Ok(transformed) => {
                    for issue in transformed.issues(&self.identifier_field) {
                        if issue.kind.needs_attention() {
                            warn!("{}", issue);
                        } else {
                            debug!("{}", issue);
                        }
                        report.issues.push(issue);
                    }
                    report.records.push(transformed);
                }
                Err(issue) => {
                    warn!("Skipping {}", issue);
                    report.issues.push(issue);
                }
            }
        }

        debug!(
            "{}/{} findings transformed, {} collisions, {} identifier mismatches",
            report.records.len(),
            report.total,
            report.collisions(),
            report.mismatches()
        );
        report
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod transform_tests;
