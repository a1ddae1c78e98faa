// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Missing required environment variable `{0}`")]
    MissingVariable(String),
    #[error("Invalid value `{value}` for environment variable `{name}`")]
    InvalidVariable { name: String, value: String },
    #[error("Unable to {action} `{key}` in bucket `{bucket}`: {message}")]
    ObjectStore {
        action: &'static str,
        bucket: String,
        key: String,
        message: String,
    },
    #[error("Object key `{0}` is not valid UTF-8 once decoded")]
    ObjectKey(String),
    #[error("Unable to fetch database credentials from SSM parameter `{name}`: {message}")]
    Credentials { name: String, message: String },
    #[error("Unable to connect to the mongo db at {host}:{port}: {message}")]
    Connection {
        host: String,
        port: u16,
        message: String,
    },
    #[error("Unable to write finding to the database: {0}")]
    Database(String),
    #[error(transparent)]
    Document(#[from] findings_import::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
