// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error parsing incoming JSON document {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O error when reading {0}")]
    IoError(#[from] std::io::Error),
    #[error("Output is not valid UTF-8 {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("Formatting error when writing {0}")]
    FormatError(#[from] std::fmt::Error),
    #[error("Field map is invalid `{0}`")]
    InvalidFieldMap(String),
    #[error("Findings document is malformed `{0}`")]
    MalformedDocument(String),
    #[error("The path `{0}` does not exist")]
    FileNotFoundError(String),
    #[error("{0}")]
    IllegalArguments(String),
}
