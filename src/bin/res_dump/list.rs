use anyhow::Result;
use clap::{ArgMatches, Command};
use indoc::indoc;
use log::info;
use std::io::Write;

use winres::{ResourceHeader, StringOrId, is_dumpable_type, resource_type_name};

use crate::{DumpSettings, OutputFormat};

pub fn command() -> Command {
    Command::new("list")
        .about("List the blocks of a resource container")
        .long_about(indoc!(
            r#"
            List the blocks of a resource container, one line per block:

                <type> <name> <language> <payload size>

            Types that `show` can decode are marked with `*`.
        "#
        ))
}

fn type_label(res_type: &StringOrId) -> String {
    match res_type {
        StringOrId::Ordinal(code) => resource_type_name(*code)
            .map(str::to_owned)
            .unwrap_or_else(|| code.to_string()),
        StringOrId::Text(_) => format!("\"{res_type}\""),
    }
}

fn is_dumpable(header: &ResourceHeader) -> bool {
    header.res_type.as_ordinal().is_some_and(is_dumpable_type)
}

pub fn run(_matches: &ArgMatches, settings: &DumpSettings, out: &mut dyn Write) -> Result<()> {
    let file = settings.open_input()?;

    let mut count = 0;
    for block in file.blocks() {
        let header = block?.header;
        count += 1;

        match settings.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &header)?;
                writeln!(out)?;
            }
            OutputFormat::Text => {
                writeln!(
                    out,
                    "{} {:<14} {:<24} {} {:>8}",
                    if is_dumpable(&header) { '*' } else { ' ' },
                    type_label(&header.res_type),
                    header.name.to_string(),
                    header.language,
                    header.data_size
                )?;
            }
        }
    }

    info!("{count} blocks");
    Ok(())
}
