// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgAction, ArgMatches};
use colored::*;
use std::io::Write;

use crate::command::Command;
use crate::commands::files::read_from_file_or;
use crate::commands::{FAILURE_STATUS_CODE, FIELD_MAP, INSPECT_MAP, SUCCESS_STATUS_CODE};
use crate::engine::mapping::{FieldMap, FieldTarget};
use crate::engine::Result;
use crate::utils::reader::Reader;
use crate::utils::writer::Writer;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct InspectMap {}

#[allow(clippy::new_without_default)]
impl InspectMap {
    pub fn new() -> Self {
        InspectMap {}
    }
}

impl Command for InspectMap {
    fn name(&self) -> &'static str {
        INSPECT_MAP
    }

    fn command(&self) -> clap::Command {
        clap::Command::new(INSPECT_MAP)
            .about("Lists the renames and removals in a field map and flags destination names shared by several source fields.")
            .arg(
                Arg::new(FIELD_MAP.0)
                    .long(FIELD_MAP.0)
                    .short(FIELD_MAP.1)
                    .action(ArgAction::Set)
                    .help("Provide a field map JSON file. Reads from STDIN when not specified"),
            )
    }

    fn execute(&self, app: &ArgMatches, writer: &mut Writer, reader: &mut Reader) -> Result<i32> {
        let content = read_from_file_or(app.get_one::<String>(FIELD_MAP.0), reader)?;
        let field_map = FieldMap::from_json(&content)?;

        let (mut renames, mut removals) = (0, 0);
        for (from, target) in field_map.iter() {
            match target {
                FieldTarget::Rename(to) => {
                    renames += 1;
                    writeln!(writer, "{} `{}` -> `{}`", "RENAME  ".green(), from, to)?;
                }
                FieldTarget::Remove => {
                    removals += 1;
                    writeln!(writer, "{} `{}`", "REMOVE  ".yellow(), from)?;
                }
            }
        }

        let conflicts = field_map.conflicting_targets();
        for (to, sources) in &conflicts {
            let sources = sources
                .iter()
                .map(|s| format!("`{s}`"))
                .collect::<Vec<String>>()
                .join(", ");
            writeln!(writer, "{} `{}` <- {}", "CONFLICT".red(), to, sources)?;
        }

        writeln!(
            writer,
            "{} renames, {} removals, {} conflicting destinations",
            renames,
            removals,
            conflicts.len()
        )?;

        if conflicts.is_empty() {
            Ok(SUCCESS_STATUS_CODE)
        } else {
            Ok(FAILURE_STATUS_CODE)
        }
    }
}
