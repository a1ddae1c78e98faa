// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use aws_sdk_s3::error::DisplayErrorContext;
use chrono::{DateTime, Utc};
use findings_import::{parse_document, FieldMap};
use log::{debug, error, info};
use serde_json::Value;

use crate::errors::{ImportError, Result};

pub const SUCCEEDED_FOLDER: &str = "success";
pub const FAILED_FOLDER: &str = "failed";

/// The object store operations the import needs.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
    async fn copy_object(&self, bucket: &str, from: &str, to: &str) -> Result<()>;
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        S3ObjectStore { client }
    }
}

fn store_error(action: &'static str, bucket: &str, key: &str, message: String) -> ImportError {
    ImportError::ObjectStore {
        action,
        bucket: bucket.to_string(),
        key: key.to_string(),
        message,
    }
}

impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| store_error("download", bucket, key, DisplayErrorContext(&err).to_string()))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|err| store_error("download", bucket, key, err.to_string()))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn copy_object(&self, bucket: &str, from: &str, to: &str) -> Result<()> {
        self.client
            .copy_object()
            .bucket(bucket)
            .copy_source(format!("{}/{}", bucket, urlencoding::encode(from)))
            .key(to)
            .send()
            .await
            .map_err(|err| store_error("copy", bucket, from, DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| store_error("delete", bucket, key, DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }
}

async fn get_text<S: ObjectStore>(store: &S, bucket: &str, key: &str) -> Result<String> {
    let bytes = store.get_object(bucket, key).await?;
    String::from_utf8(bytes).map_err(|err| store_error("decode", bucket, key, err.to_string()))
}

/// Downloads the findings document and returns its findings.
pub async fn download_findings<S: ObjectStore>(store: &S, bucket: &str, key: &str) -> Result<Vec<Value>> {
    info!("Retrieving {} from {}...", key, bucket);
    let content = get_text(store, bucket, key).await?;
    let findings = parse_document(&content).map_err(|err| {
        error!("Unable to decode JSON data for {}", key);
        err
    })?;
    info!("JSON data loaded from {}.", key);
    Ok(findings)
}

pub async fn get_field_map<S: ObjectStore>(store: &S, bucket: &str, key: &str) -> Result<FieldMap> {
    info!("Attempting to read Configuration data from {} in {}", key, bucket);
    let content = get_text(store, bucket, key).await.map_err(|err| {
        error!("Unable to download the field map data {} from {}", key, bucket);
        err
    })?;
    let field_map = FieldMap::from_json(&content).map_err(|err| {
        error!("Unable to decode field map data, does not appear to be a valid field map.");
        err
    })?;
    info!("Configuration data loaded from {}", key);
    debug!("Configuration data: {:?}", field_map);
    Ok(field_map)
}

/// Where a processed object is archived: the object key with every `.json`
/// turned into `_<timestamp>.json`, under `folder`.
pub fn archive_key(folder: &str, key: &str, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y-%m-%d_%H:%M:%S%.6f");
    format!("{}/{}", folder, key.replace(".json", &format!("_{stamp}.json")))
}

/// Copies `key` into `folder` and deletes the original. Failures are logged
/// and otherwise ignored; the import result does not depend on them.
pub async fn move_processed_file<S: ObjectStore>(store: &S, bucket: &str, folder: &str, key: &str) {
    let new_key = archive_key(folder, key, Utc::now());

    let moved = async {
        store.copy_object(bucket, key, &new_key).await?;
        info!("Successfully copied \"{}\" to \"{}\"", key, new_key);
        store.delete_object(bucket, key).await?;
        info!("Successfully deleted original \"{}\"", key);
        Ok::<(), ImportError>(())
    }
    .await;

    if let Err(err) = moved {
        error!("Failed while moving \"{}\" to \"{}\" directory", key, folder);
        error!("Error: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_archive_key() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 1).unwrap();
        assert_eq!(
            archive_key(SUCCEEDED_FOLDER, "RVA1234_findings.json", now),
            "success/RVA1234_findings_2024-03-09_17:05:01.000000.json"
        );
    }

    #[test]
    fn test_archive_key_keeps_prefix() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            archive_key(FAILED_FOLDER, "incoming/data.json", now),
            "failed/incoming/data_2024-12-31_23:59:59.000000.json"
        );
    }
}
