// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod config;
pub mod database;
pub mod errors;
pub mod event;
pub mod handler;
pub mod import;
pub mod storage;

pub use crate::errors::{ImportError, Result};
pub use crate::handler::function_handler;
pub use crate::import::{import_data, ImportStatus, ImportSummary};
