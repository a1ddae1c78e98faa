// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use findings_import::DEFAULT_IDENTIFIER_FIELD;
use log::LevelFilter;

use crate::errors::{ImportError, Result};

pub const S3_BUCKET: &str = "s3_bucket";
pub const FILE_SUFFIX: &str = "file_suffix";
pub const FIELD_MAP: &str = "field_map";
pub const DB_HOSTNAME: &str = "db_hostname";
pub const DB_PORT: &str = "db_port";
pub const SAVE_FAILED: &str = "save_failed";
pub const SAVE_SUCCEEDED: &str = "save_succeeded";
pub const SSM_DB_NAME: &str = "ssm_db_name";
pub const SSM_DB_USER: &str = "ssm_db_user";
pub const SSM_DB_PASSWORD: &str = "ssm_db_password";
pub const LOG_LEVEL: &str = "log_level";
pub const IDENTIFIER_FIELD: &str = "identifier_field";
pub const UPSERT_KEYS: &str = "upsert_keys";
pub const ON_IDENTIFIER_MISMATCH: &str = "on_identifier_mismatch";

pub const DEFAULT_DB_PORT: u16 = 27017;

/// What to do with a finding whose identifier could not be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    Skip,
    Accept,
}

impl FromStr for MismatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(MismatchPolicy::Skip),
            "accept" => Ok(MismatchPolicy::Accept),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub s3_bucket: String,
    pub file_suffix: String,
    pub field_map: Option<String>,
    pub db_hostname: String,
    pub db_port: u16,
    pub save_failed: bool,
    pub save_succeeded: bool,
    pub ssm_db_name: String,
    pub ssm_db_user: String,
    pub ssm_db_password: String,
    pub identifier_field: String,
    /// Fixed upsert filter fields. When unset, the fields follow the schema
    /// of each finding.
    pub upsert_keys: Option<Vec<String>>,
    pub on_identifier_mismatch: MismatchPolicy,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which returns the value of an
    /// environment variable by name.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required =
            |name: &str| optional(name).ok_or_else(|| ImportError::MissingVariable(name.to_string()));

        let db_port = match optional(DB_PORT) {
            Some(port) => port.trim().parse::<u16>().map_err(|_| ImportError::InvalidVariable {
                name: DB_PORT.to_string(),
                value: port.clone(),
            })?,
            None => DEFAULT_DB_PORT,
        };

        let upsert_keys = optional(UPSERT_KEYS)
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(String::from)
                    .collect::<Vec<String>>()
            })
            .filter(|keys| !keys.is_empty());

        let on_identifier_mismatch = match optional(ON_IDENTIFIER_MISMATCH) {
            Some(policy) => policy
                .parse::<MismatchPolicy>()
                .map_err(|value| ImportError::InvalidVariable {
                    name: ON_IDENTIFIER_MISMATCH.to_string(),
                    value,
                })?,
            None => MismatchPolicy::Skip,
        };

        Ok(Config {
            s3_bucket: required(S3_BUCKET)?,
            file_suffix: required(FILE_SUFFIX)?,
            field_map: optional(FIELD_MAP),
            db_hostname: required(DB_HOSTNAME)?,
            db_port,
            save_failed: optional(SAVE_FAILED).map_or(true, |v| is_true(&v)),
            save_succeeded: optional(SAVE_SUCCEEDED).map_or(false, |v| is_true(&v)),
            ssm_db_name: required(SSM_DB_NAME)?,
            ssm_db_user: required(SSM_DB_USER)?,
            ssm_db_password: required(SSM_DB_PASSWORD)?,
            identifier_field: optional(IDENTIFIER_FIELD)
                .unwrap_or_else(|| DEFAULT_IDENTIFIER_FIELD.to_string()),
            upsert_keys,
            on_identifier_mismatch,
        })
    }
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Log level from the `log_level` variable. Unknown names are handed back
/// so the caller can report them once logging is up.
pub fn log_level(value: Option<&str>) -> std::result::Result<LevelFilter, String> {
    match value.map(|v| v.trim().to_ascii_uppercase()) {
        None => Ok(LevelFilter::Info),
        Some(level) => match level.as_str() {
            "" | "INFO" => Ok(LevelFilter::Info),
            "DEBUG" => Ok(LevelFilter::Debug),
            "WARNING" | "WARN" => Ok(LevelFilter::Warn),
            "ERROR" | "CRITICAL" => Ok(LevelFilter::Error),
            _ => Err(level),
        },
    }
}
