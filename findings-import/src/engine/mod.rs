// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod errors;
pub mod identifier;
pub mod mapping;
pub mod transform;

use errors::Error;

pub type Result<R> = std::result::Result<R, Error>;

/// One finding: a JSON object whose field order is preserved.
pub type Record = serde_json::Map<String, serde_json::Value>;
