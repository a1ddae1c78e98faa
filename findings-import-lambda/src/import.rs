// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use findings_import::{FieldMap, Record, Transformer};
use log::{error, info, warn};
use serde_derive::Serialize;
use serde_json::Value;

use crate::config::{Config, MismatchPolicy};
use crate::database::{Connector, FindingStore};
use crate::errors::Result;
use crate::storage::{
    download_findings, get_field_map, move_processed_file, ObjectStore, FAILED_FOLDER,
    SUCCEEDED_FOLDER,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Imported,
    Failed,
    Skipped,
}

/// Result of one invocation, returned to the caller of the function.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub status: ImportStatus,
    pub key: String,
    pub processed: usize,
    pub total: usize,
    pub issues: Vec<String>,
}

impl ImportSummary {
    fn new(key: &str) -> Self {
        ImportSummary {
            status: ImportStatus::Imported,
            key: key.to_string(),
            processed: 0,
            total: 0,
            issues: vec![],
        }
    }

    pub fn skipped(key: &str, reason: String) -> Self {
        ImportSummary {
            status: ImportStatus::Skipped,
            issues: vec![reason],
            ..ImportSummary::new(key)
        }
    }
}

pub const SCHEMA_FIELD: &str = "schema";
pub const NCATS_ID_FIELD: &str = "NCATS ID";
pub const SEVERITY_FIELD: &str = "Severity";
pub const FINDINGS_FIELD: &str = "findings";

/// Shape of a stored finding, told apart by the fields it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// One document per identifier, `NCATS ID` and `Severity`.
    V1,
    /// One document per identifier holding a `findings` list.
    V2,
}

impl Schema {
    pub fn detect(record: &Record) -> Option<Schema> {
        if record.contains_key(NCATS_ID_FIELD) && record.contains_key(SEVERITY_FIELD) {
            Some(Schema::V1)
        } else if record.contains_key(FINDINGS_FIELD) {
            Some(Schema::V2)
        } else {
            None
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Schema::V1 => "v1",
            Schema::V2 => "v2",
        }
    }

    pub fn key_fields<'f>(&self, identifier_field: &'f str) -> Vec<&'f str> {
        match self {
            Schema::V1 => vec![identifier_field, NCATS_ID_FIELD, SEVERITY_FIELD],
            Schema::V2 => vec![identifier_field],
        }
    }
}

/// The filter used to find the stored copy of `record`. Hands back the
/// first key field the record lacks.
pub fn upsert_filter<'k>(
    record: &Record,
    keys: &[&'k str],
) -> std::result::Result<Record, &'k str> {
    let mut filter = Record::new();
    for key in keys {
        match record.get(*key) {
            Some(value) => {
                filter.insert(key.to_string(), value.clone());
            }
            None => return Err(*key),
        }
    }
    Ok(filter)
}

/// Imports the findings document at `key` and archives it according to the
/// outcome. Never fails: problems end up in the returned summary.
pub async fn import_data<S, C>(
    config: &Config,
    store: &S,
    connector: &C,
    key: &str,
) -> ImportSummary
where
    S: ObjectStore,
    C: Connector,
{
    let mut summary = ImportSummary::new(key);
    if let Err(err) = load_and_write(config, store, connector, &mut summary).await {
        error!("Error Message {}", err);
        summary.status = ImportStatus::Failed;
        summary.issues.push(err.to_string());
    }

    match summary.status {
        ImportStatus::Imported if config.save_succeeded => {
            move_processed_file(store, &config.s3_bucket, SUCCEEDED_FOLDER, key).await
        }
        ImportStatus::Failed if config.save_failed => {
            move_processed_file(store, &config.s3_bucket, FAILED_FOLDER, key).await
        }
        _ => {}
    }

    summary
}

async fn load_and_write<S, C>(
    config: &Config,
    store: &S,
    connector: &C,
    summary: &mut ImportSummary,
) -> Result<()>
where
    S: ObjectStore,
    C: Connector,
{
    let key = summary.key.clone();
    let findings = download_findings(store, &config.s3_bucket, &key).await?;
    summary.total = findings.len();

    let field_map = match &config.field_map {
        Some(field_map_key) => get_field_map(store, &config.s3_bucket, field_map_key).await?,
        None => FieldMap::default(),
    };

    let db = connector.connect().await?;

    info!("Extracting/validating findings from {}", key);
    let transformer = Transformer::new(&field_map, config.identifier_field.as_str());
    let report = transformer.transform_batch(&findings);

    summary.issues.extend(
        report
            .issues
            .iter()
            .filter(|issue| issue.kind.needs_attention())
            .map(|issue| issue.to_string()),
    );
    if report.collisions() > 0 {
        warn!("{} field mapping collisions in {}", report.collisions(), key);
    }

    info!("Updating records");
    let mut failed_writes = 0;
    for each in &report.records {
        if each.identifier.is_mismatch() && config.on_identifier_mismatch == MismatchPolicy::Skip {
            continue;
        }

        let schema = Schema::detect(&each.record);
        let keys: Vec<&str> = match (&config.upsert_keys, schema) {
            (Some(keys), _) => keys.iter().map(String::as_str).collect(),
            (None, Some(schema)) => schema.key_fields(&config.identifier_field),
            (None, None) => {
                warn!("Skipping record {}. Unknown finding schema.", each.index);
                summary.issues.push(format!(
                    "record {}: neither a v1 finding (`{}` and `{}`) nor a v2 finding (`{}`)",
                    each.index, NCATS_ID_FIELD, SEVERITY_FIELD, FINDINGS_FIELD
                ));
                continue;
            }
        };

        let filter = match upsert_filter(&each.record, &keys) {
            Ok(filter) => filter,
            Err(missing) => {
                warn!("Skipping record {}. Missing \"{}\" field.", each.index, missing);
                summary
                    .issues
                    .push(format!("record {}: missing upsert key `{}`", each.index, missing));
                continue;
            }
        };

        let mut finding = each.record.clone();
        if let Some(schema) = schema {
            finding.insert(SCHEMA_FIELD.to_string(), Value::from(schema.tag()));
        }

        match db.upsert(&filter, &finding).await {
            Ok(()) => summary.processed += 1,
            Err(err) => {
                error!("Failed to write record {}: {}", each.index, err);
                summary.issues.push(format!("record {}: {}", each.index, err));
                failed_writes += 1;
            }
        }
    }

    info!(
        "{}/{} documents successfully processed from \"{}\".",
        summary.processed, summary.total, key
    );

    if failed_writes > 0 {
        summary.status = ImportStatus::Failed;
    }
    Ok(())
}
