// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde_derive::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{ImportError, Result};

/// The only S3 notification that starts an import.
pub const EXPECTED_EVENT: &str = "ObjectCreated:Put";

/// The parts of an S3 event notification the import looks at. Everything
/// else in the payload is ignored.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct S3Notification {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct NotificationRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    #[serde(default)]
    pub s3: S3Entity,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: S3Bucket,
    #[serde(default)]
    pub object: S3Object,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct S3Bucket {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct S3Object {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Import { key: String },
    Ignore { reason: String },
}

/// Decides whether the first record of `notification` should be imported.
pub fn check_event(notification: &S3Notification, config: &Config) -> Result<Trigger> {
    let record = match notification.records.first() {
        Some(record) => record,
        None => {
            return Ok(Trigger::Ignore {
                reason: "Event carries no records".to_string(),
            })
        }
    };

    if record.event_name != EXPECTED_EVENT {
        return Ok(Trigger::Ignore {
            reason: format!("Unexpected eventName received: {}", record.event_name),
        });
    }

    let source_bucket = &record.s3.bucket.name;
    if *source_bucket != config.s3_bucket {
        return Ok(Trigger::Ignore {
            reason: format!(
                "Expected \"{}\" event from S3 bucket \"{}\" but received event from S3 bucket \"{}\"",
                EXPECTED_EVENT, config.s3_bucket, source_bucket
            ),
        });
    }

    let key = decode_object_key(&record.s3.object.key)?;
    if !key.ends_with(&config.file_suffix) {
        return Ok(Trigger::Ignore {
            reason: format!(
                "Object key \"{}\" does not end with required suffix \"{}\"",
                key, config.file_suffix
            ),
        });
    }

    Ok(Trigger::Import { key })
}

/// Keys in S3 notifications are form encoded, spaces arrive as `+`. A key
/// that really contains a `+` arrives as `%2B` and survives the round trip.
pub fn decode_object_key(key: &str) -> Result<String> {
    let spaced = key.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ImportError::ObjectKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> Config {
        Config::from_lookup(|name| {
            let value = match name {
                "s3_bucket" => Some("findings-bucket"),
                "file_suffix" => Some(".json"),
                "db_hostname" => Some("localhost"),
                "ssm_db_name" | "ssm_db_user" | "ssm_db_password" => Some("/param"),
                _ => None,
            };
            value.map(String::from)
        })
        .unwrap()
    }

    fn notification(event_name: &str, bucket: &str, key: &str) -> S3Notification {
        serde_json::from_value(json!({
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventName": event_name,
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "bucket": {"name": bucket, "arn": format!("arn:aws:s3:::{bucket}")},
                    "object": {"key": key, "size": 1024}
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_import_trigger() {
        let trigger = check_event(
            &notification("ObjectCreated:Put", "findings-bucket", "RVA+1234+findings.json"),
            &config(),
        )
        .unwrap();

        assert_eq!(
            trigger,
            Trigger::Import {
                key: "RVA 1234 findings.json".to_string()
            }
        );
    }

    #[rstest::rstest]
    #[case("ObjectCreated:Copy", "findings-bucket", "data.json")]
    #[case("ObjectCreated:Put", "other-bucket", "data.json")]
    #[case("ObjectCreated:Put", "findings-bucket", "data.csv")]
    fn test_ignored_events(#[case] event_name: &str, #[case] bucket: &str, #[case] key: &str) {
        let trigger = check_event(&notification(event_name, bucket, key), &config()).unwrap();
        assert!(matches!(trigger, Trigger::Ignore { .. }));
    }

    #[test]
    fn test_empty_notification_is_ignored() {
        let trigger = check_event(&S3Notification::default(), &config()).unwrap();
        assert!(matches!(trigger, Trigger::Ignore { .. }));
    }

    #[rstest::rstest]
    #[case("plain.json", "plain.json")]
    #[case("with+spaces.json", "with spaces.json")]
    #[case("literal%2Bplus.json", "literal+plus.json")]
    #[case("folder/sub%20dir/file.json", "folder/sub dir/file.json")]
    fn test_decode_object_key(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(decode_object_key(key).unwrap(), expected);
    }

    #[test]
    fn test_decode_object_key_invalid_utf8() {
        assert!(matches!(
            decode_object_key("bad%FF.json"),
            Err(ImportError::ObjectKey(_))
        ));
    }
}
