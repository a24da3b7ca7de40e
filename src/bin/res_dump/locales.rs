use anyhow::Result;
use clap::{ArgMatches, Command};
use serde_json::{Map, Value};
use std::io::Write;

use winres::{LocaleNames, languages};

use crate::{DumpSettings, OutputFormat};

pub fn command() -> Command {
    Command::new("locales")
        .about("List the languages of a resource container with their display names")
}

pub fn run(_matches: &ArgMatches, settings: &DumpSettings, out: &mut dyn Write) -> Result<()> {
    let file = settings.open_input()?;
    let names = LocaleNames::from_res_file(&file)?;

    // Languages without a name table are listed too, under their numeric form.
    let mut all = languages(&file)?;
    for (lang, _) in names.iter() {
        if !all.contains(&lang) {
            all.push(lang);
        }
    }
    all.sort();

    match settings.format {
        OutputFormat::Json => {
            let map: Map<String, Value> = all
                .iter()
                .map(|lang| {
                    let name = names.name(*lang).map_or(Value::Null, Value::from);
                    (lang.to_string(), name)
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &map)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for lang in all {
                writeln!(out, "{lang}  {}", names.display_name(lang))?;
            }
        }
    }

    Ok(())
}
