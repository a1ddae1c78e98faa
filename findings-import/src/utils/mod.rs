// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::command::Command;
use crate::commands;

pub mod reader;
pub mod writer;

pub fn get_findings_import_commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(commands::transform::Transform::new()),
        Box::new(commands::inspect_map::InspectMap::new()),
    ]
}
