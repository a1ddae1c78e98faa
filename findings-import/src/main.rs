// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::fs::File;
use std::process::exit;

use clap::{Arg, ArgAction};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use findings_import::command::Command;
use findings_import::commands::{APP_NAME, APP_VERSION, ERROR_STATUS_CODE, OUTPUT, VERBOSE};
use findings_import::utils;
use findings_import::utils::reader::{ReadBuffer, Reader};
use findings_import::utils::writer::{WriteBuffer, Writer};
use findings_import::Error;

fn main() -> Result<(), Error> {
    let mut app = clap::Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(
            r#"
  Imports findings data: renames, removes or passes through the fields of every
  finding according to a field map, and normalizes the finding identifier to its
  canonical four digit form."#,
        )
        .arg(
            Arg::new(VERBOSE.0)
                .long(VERBOSE.0)
                .short(VERBOSE.1)
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Verbose logging"),
        )
        .arg_required_else_help(true);

    let commands: Vec<Box<dyn Command>> = utils::get_findings_import_commands();

    let mappings = commands.iter().map(|s| (s.name(), s)).fold(
        HashMap::with_capacity(commands.len()),
        |mut map, entry| {
            map.insert(entry.0, entry.1.as_ref());
            map
        },
    );

    for each in &commands {
        app = app.subcommand(each.command());
    }

    let help = app.render_usage();
    let app = app.get_matches();

    let level = if app.get_flag(VERBOSE.0) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Unable to initialize logging {e}");
    }

    match app.subcommand() {
        Some((name, value)) => {
            if let Some(command) = mappings.get(name) {
                let mut output_writer = match value.try_get_one::<String>(OUTPUT.0).ok().flatten()
                {
                    Some(file) => Writer::new(
                        WriteBuffer::File(File::create(file)?),
                        WriteBuffer::Stderr(std::io::stderr()),
                    ),
                    None => Writer::new(
                        WriteBuffer::Stdout(std::io::stdout()),
                        WriteBuffer::Stderr(std::io::stderr()),
                    ),
                };

                match (*command).execute(
                    value,
                    &mut output_writer,
                    &mut Reader::new(ReadBuffer::Stdin(std::io::stdin())),
                ) {
                    Err(e) => {
                        if let Err(write_error) =
                            output_writer.write_err(format!("Error occurred {e}"))
                        {
                            eprintln!("Error occurred {e}, {write_error}");
                        }
                        exit(ERROR_STATUS_CODE);
                    }
                    Ok(code) => exit(code),
                }
            } else {
                println!("{}", help);
            }
        }
        None => {
            println!("{}", help);
        }
    }

    Ok(())
}
