// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod command;
pub mod commands;
pub mod engine;
pub mod utils;

pub use crate::engine::errors::Error;
pub use crate::engine::identifier::{
    canonical_digits, normalize_identifier, parse_identifier, IdentifierOutcome,
    DEFAULT_IDENTIFIER_FIELD,
};
pub use crate::engine::mapping::{apply_field_map, Collision, FieldMap, FieldTarget, MappedRecord};
pub use crate::engine::transform::{
    parse_document, BatchReport, IssueKind, RecordIssue, TransformedRecord, Transformer,
};
pub use crate::engine::{Record, Result};

/// Transforms a findings document in one call: parses `data`, applies the
/// optional field map and normalizes `identifier_field` in every finding.
pub fn transform_document(
    data: &str,
    field_map: Option<&FieldMap>,
    identifier_field: &str,
) -> Result<BatchReport> {
    let findings = parse_document(data)?;
    let empty = FieldMap::default();
    let transformer = Transformer::new(field_map.unwrap_or(&empty), identifier_field);
    Ok(transformer.transform_batch(&findings))
}
