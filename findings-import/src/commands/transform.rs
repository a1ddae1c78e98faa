// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgAction, ArgMatches};
use std::io::Write;

use crate::command::Command;
use crate::commands::files::{open_file, read_from_file_or};
use crate::commands::{
    DATA, FAILURE_STATUS_CODE, FIELD_MAP, IDENTIFIER_FIELD, OUTPUT, PRETTY, SKIP_MISMATCHED,
    SUCCESS_STATUS_CODE, TRANSFORM,
};
use crate::engine::identifier::DEFAULT_IDENTIFIER_FIELD;
use crate::engine::mapping::FieldMap;
use crate::engine::transform::IssueKind;
use crate::engine::Result;
use crate::utils::reader::Reader;
use crate::utils::writer::Writer;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Transform {}

#[allow(clippy::new_without_default)]
impl Transform {
    pub fn new() -> Self {
        Transform {}
    }
}

impl Command for Transform {
    fn name(&self) -> &'static str {
        TRANSFORM
    }

    fn command(&self) -> clap::Command {
        clap::Command::new(TRANSFORM)
            .about(
                r#"Renames fields of every finding in a JSON array according to a field map and
normalizes the identifier field to its four digit form. The transformed array is
written to stdout (or the output file); per-finding problems are written to stderr.
"#,
            )
            .arg(
                Arg::new(DATA.0)
                    .long(DATA.0)
                    .short(DATA.1)
                    .action(ArgAction::Set)
                    .help("Provide a findings JSON file. Reads from STDIN when not specified"),
            )
            .arg(
                Arg::new(FIELD_MAP.0)
                    .long(FIELD_MAP.0)
                    .short(FIELD_MAP.1)
                    .action(ArgAction::Set)
                    .help("Provide a field map JSON file of {\"source field\": \"new name\"} pairs. An empty new name removes the field"),
            )
            .arg(
                Arg::new(IDENTIFIER_FIELD.0)
                    .long(IDENTIFIER_FIELD.0)
                    .short(IDENTIFIER_FIELD.1)
                    .action(ArgAction::Set)
                    .default_value(DEFAULT_IDENTIFIER_FIELD)
                    .help("Name of the identifier field, after field mapping"),
            )
            .arg(
                Arg::new(OUTPUT.0)
                    .long(OUTPUT.0)
                    .short(OUTPUT.1)
                    .action(ArgAction::Set)
                    .help("Write to output file"),
            )
            .arg(
                Arg::new(PRETTY.0)
                    .long(PRETTY.0)
                    .short(PRETTY.1)
                    .action(ArgAction::SetTrue)
                    .help("Pretty print the transformed findings"),
            )
            .arg(
                Arg::new(SKIP_MISMATCHED.0)
                    .long(SKIP_MISMATCHED.0)
                    .short(SKIP_MISMATCHED.1)
                    .action(ArgAction::SetTrue)
                    .help("Leave out findings whose identifier could not be parsed"),
            )
    }

    fn execute(&self, app: &ArgMatches, writer: &mut Writer, reader: &mut Reader) -> Result<i32> {
        let data = read_from_file_or(app.get_one::<String>(DATA.0), reader)?;

        let field_map = match app.get_one::<String>(FIELD_MAP.0) {
            Some(file) => Some(FieldMap::from_reader(open_file(file)?)?),
            None => None,
        };

        let identifier_field = app
            .get_one::<String>(IDENTIFIER_FIELD.0)
            .map_or(DEFAULT_IDENTIFIER_FIELD, String::as_str);

        let report = crate::transform_document(&data, field_map.as_ref(), identifier_field)?;

        for issue in report
            .issues
            .iter()
            .filter(|issue| !matches!(issue.kind, IssueKind::IdentifierFieldAbsent { .. }))
        {
            writer.write_err(issue.to_string())?;
        }

        let status = if report.needs_attention() {
            FAILURE_STATUS_CODE
        } else {
            SUCCESS_STATUS_CODE
        };

        let skip_mismatched = app.get_flag(SKIP_MISMATCHED.0);
        let total = report.total;
        let findings = report.into_values(skip_mismatched);
        writer.write_err(format!("{}/{} findings transformed", findings.len(), total))?;

        if app.get_flag(PRETTY.0) {
            serde_json::to_writer_pretty(&mut *writer, &findings)?;
        } else {
            serde_json::to_writer(&mut *writer, &findings)?;
        }
        writeln!(writer)?;

        Ok(status)
    }
}
