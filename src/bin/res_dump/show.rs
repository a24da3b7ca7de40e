use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use indoc::indoc;
use log::{debug, warn};
use serde::Serialize;
use std::io::Write;

use winres::{
    Comparison, DiffCounts, LangId, LocaleNames, Resource, ResourceHeader, ResourceKind,
    ResourceRow, StringOrId, resource_title, resource_type_name,
};

use crate::{DumpSettings, OutputFormat};

const DUMPABLE_TYPES: [u16; 5] = [
    ResourceKind::RT_MENU,
    ResourceKind::RT_DIALOG,
    ResourceKind::RT_STRING,
    ResourceKind::RT_MESSAGETABLE,
    ResourceKind::RES_DIALOGEX,
];

pub fn command() -> Command {
    Command::new("show")
        .about("Decode one resource, optionally side by side with a reference language")
        .long_about(indoc!(
            r#"
            Decode one resource and print it as rows, one per item.

            With `--compare`, the same resource is also loaded in the reference language
            (English (US), 009:01, unless given) and the two are aligned row by row. Rows that
            look wrong in the translation are marked with `!`: missing or extra items, changed
            styles or ids, emptied strings. With `--pedantic`, strings identical to the
            reference are marked as well, since they are usually untranslated.
        "#
        ))
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .required(true)
                .value_name("TYPE")
                .help("Resource type: MENU, DIALOG, DIALOGEX, STRINGTABLE, MESSAGE or a type code"),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .required(true)
                .value_name("NAME")
                .help("Resource name or id. For string tables, the block number (id / 16 + 1)"),
        )
        .arg(
            Arg::new("lang")
                .short('l')
                .long("lang")
                .value_name("LANG")
                .default_value("009:01")
                .help("Language of the resource, as `PPP:SS` in hex"),
        )
        .arg(
            Arg::new("compare")
                .long("compare")
                .value_name("LANG")
                .num_args(0..=1)
                .default_missing_value("009:01")
                .help("Compare against the resource in this language (default 009:01)"),
        )
        .arg(
            Arg::new("pedantic")
                .long("pedantic")
                .action(ArgAction::SetTrue)
                .help("Also flag strings that are identical to the reference"),
        )
}

/// Accepts a type keyword (case-insensitive) or a numeric type code.
fn parse_type(value: &str) -> Result<u16> {
    if let Ok(code) = value.parse::<u16>() {
        return Ok(code);
    }

    DUMPABLE_TYPES
        .into_iter()
        .find(|&code| resource_type_name(code).is_some_and(|n| n.eq_ignore_ascii_case(value)))
        .with_context(|| format!("unknown resource type `{value}`"))
}

fn parse_lang(value: &str) -> Result<LangId> {
    Ok(value.parse::<LangId>()?)
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    header: &'a ResourceHeader,
    resource: &'a Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    master_header: Option<&'a ResourceHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    master: Option<&'a Resource>,
    rows: &'a [ResourceRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<DiffCounts>,
}

pub fn run(matches: &ArgMatches, settings: &DumpSettings, out: &mut dyn Write) -> Result<()> {
    let code = parse_type(matches.get_one::<String>("type").map_or("", String::as_str))?;
    let name: StringOrId = match matches.get_one::<String>("name") {
        Some(name) => name.parse()?,
        None => bail!("a resource name is required"),
    };
    let lang = parse_lang(matches.get_one::<String>("lang").map_or("009:01", String::as_str))?;
    let compare = matches
        .get_one::<String>("compare")
        .map(String::as_str)
        .map(parse_lang)
        .transpose()?;
    let pedantic = matches.get_flag("pedantic");

    let file = settings.open_input()?;
    let title = resource_title(code, &name);

    let comparison = match compare {
        Some(master_lang) => Some(Comparison::load(&file, code, &name, lang, master_lang)?),
        None => None,
    };
    let (header, resource) = match &comparison {
        Some(cmp) => (cmp.header.clone(), cmp.resource.clone()),
        None => Resource::load(&file, code, &name, lang)?,
    };

    let rows = match &comparison {
        Some(cmp) => cmp.rows(),
        None => resource.rows(None),
    };
    let counts = comparison.as_ref().map(|_| DiffCounts::from_rows(&rows));
    debug!("{title}: {} rows", rows.len());

    match settings.format {
        OutputFormat::Json => {
            let output = ShowOutput {
                header: &header,
                resource: &resource,
                master_header: comparison.as_ref().map(|c| &c.master_header),
                master: comparison.as_ref().map(|c| &c.master),
                rows: &rows,
                counts,
            };
            serde_json::to_writer_pretty(&mut *out, &output)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let names = LocaleNames::from_res_file(&file).unwrap_or_else(|e| {
                warn!("locale names unavailable: {e}");
                LocaleNames::default()
            });
            match &comparison {
                Some(cmp) => writeln!(
                    out,
                    "{title}  [{lang} {}]  vs  [{} {}]",
                    names.display_name(lang),
                    cmp.master_header.language,
                    names.display_name(cmp.master_header.language)
                )?,
                None => writeln!(out, "{title}  [{lang} {}]", names.display_name(lang))?,
            }
            write_rows(out, &rows, comparison.is_some(), pedantic)?;

            if let Some(counts) = counts {
                let flagged = if pedantic {
                    counts.warnings
                } else {
                    counts.errors
                };
                writeln!(
                    out,
                    "{flagged} flagged rows ({} errors, {} warnings)",
                    counts.errors, counts.warnings
                )?;
            }
        }
    }

    Ok(())
}

fn write_rows(
    out: &mut dyn Write,
    rows: &[ResourceRow],
    compared: bool,
    pedantic: bool,
) -> Result<()> {
    let id_width = rows.iter().map(|r| r.id.chars().count()).max().unwrap_or(0);
    let left_width = rows
        .iter()
        .filter_map(|r| r.left.as_deref())
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0);

    for row in rows {
        let left = row.left.as_deref().unwrap_or("");
        if !compared {
            writeln!(out, "{:>id_width$}  {left}", row.id)?;
            continue;
        }

        let marker = if row.differs(pedantic) { '!' } else { ' ' };
        writeln!(
            out,
            "{marker} {:>id_width$}  {left:<left_width$} | {}",
            row.id,
            row.right.as_deref().unwrap_or("")
        )?;
    }

    Ok(())
}
