// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod files;
pub mod inspect_map;
pub mod transform;

//
// Constants
//
// Application metadata
pub const APP_NAME: &str = "findings-import";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
// Commands
pub const TRANSFORM: &str = "transform";
pub const INSPECT_MAP: &str = "inspect-map";
// Arguments for transform, inspect-map
pub const FIELD_MAP: (&str, char) = ("field-map", 'm');
// Arguments for transform
pub const DATA: (&str, char) = ("data", 'd');
pub const IDENTIFIER_FIELD: (&str, char) = ("identifier-field", 'i');
pub const OUTPUT: (&str, char) = ("output", 'o');
pub const PRETTY: (&str, char) = ("pretty", 'p');
pub const SKIP_MISMATCHED: (&str, char) = ("skip-mismatched", 's');
// Global arguments
pub const VERBOSE: (&str, char) = ("verbose", 'v');

pub const FAILURE_STATUS_CODE: i32 = 19;
pub const SUCCESS_STATUS_CODE: i32 = 0;
pub const ERROR_STATUS_CODE: i32 = 5;
