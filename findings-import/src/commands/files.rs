// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::engine::errors::Error;
use crate::engine::Result;

pub(crate) fn open_file(path: &str) -> Result<BufReader<File>> {
    if !Path::new(path).is_file() {
        return Err(Error::FileNotFoundError(path.to_string()));
    }
    Ok(BufReader::new(File::open(path)?))
}

pub(crate) fn read_file_content(path: &str) -> Result<String> {
    let mut content = String::new();
    open_file(path)?.read_to_string(&mut content)?;
    Ok(content)
}

/// Reads `path` when given, otherwise drains `fallback` (stdin for the CLI).
pub(crate) fn read_from_file_or(path: Option<&String>, fallback: &mut dyn Read) -> Result<String> {
    match path {
        Some(path) => read_file_content(path),
        None => {
            let mut content = String::new();
            fallback.read_to_string(&mut content)?;
            Ok(content)
        }
    }
}
