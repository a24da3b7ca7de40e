use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dialoguer::Confirm;
use indoc::indoc;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

use winres::ResFile;

#[path = "res_dump/list.rs"]
mod list;
#[path = "res_dump/locales.rs"]
mod locales;
#[path = "res_dump/show.rs"]
mod show;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct DumpSettings {
    pub input: PathBuf,
    pub format: OutputFormat,
    output_target: Option<PathBuf>,
    confirm_overwrite: bool,
    verbosity_level: Option<LevelFilter>,
}

impl DumpSettings {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = matches
            .get_one::<String>("INPUT")
            .map(PathBuf::from)
            .context("an input file is required")?;

        let format = match matches.get_one::<String>("output-format").map(String::as_str) {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        };

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            3 => Some(LevelFilter::Trace),
            _ => {
                eprintln!("using more than -vvv does not affect verbosity level");
                Some(LevelFilter::Trace)
            }
        };

        Ok(DumpSettings {
            input,
            format,
            output_target: matches.get_one::<String>("output-target").map(PathBuf::from),
            confirm_overwrite: !matches.get_flag("no-confirm-overwrite"),
            verbosity_level,
        })
    }

    pub fn open_input(&self) -> Result<ResFile> {
        ResFile::open(&self.input).with_context(|| format!("while reading {}", self.input.display()))
    }

    fn init_logging(&self) {
        if let Some(level) = self.verbosity_level {
            if let Err(e) = TermLogger::init(
                level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ) {
                eprintln!("Failed to initialize logging: {e}");
            }
        }
    }

    fn open_output(&self) -> Result<Box<dyn Write>> {
        match &self.output_target {
            Some(path) => {
                let file = create_output_file(path, self.confirm_overwrite).with_context(|| {
                    format!(
                        "An error occurred while creating output file at `{}`",
                        path.display()
                    )
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout()))),
        }
    }
}

/// If `prompt` is passed, will display a confirmation prompt before overwriting files.
fn create_output_file(path: &Path, prompt: bool) -> Result<File> {
    if path.is_dir() {
        bail!(
            "There is a directory at {}, refusing to overwrite",
            path.display()
        );
    }

    if path.exists() {
        if prompt {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Are you sure you want to override output file at {}",
                    path.display()
                ))
                .default(false)
                .interact()
                .context("Failed to write confirmation prompt to term")?;
            if !confirmed {
                bail!("Cancelled");
            }
        }
        return Ok(File::create(path)?);
    }

    match path.parent() {
        Some(parent) => {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        None => bail!("Output file cannot be root."),
    }
}

fn common_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("INPUT")
            .required(true)
            .value_name("FILE")
            .help("Compiled resource container (.res)"),
    )
    .arg(
        Arg::new("output-format")
            .short('o')
            .long("format")
            .value_parser(["text", "json"])
            .default_value("text")
            .help("Sets the output format")
            .long_help(indoc!(
                r#"Sets the output format:
                    "text" - human readable listing, one row per item.
                    "json" - the decoded structures and rows, as JSON.
                "#
            )),
    )
    .arg(
        Arg::new("output-target")
            .long("output")
            .short('f')
            .action(ArgAction::Set)
            .value_name("PATH")
            .help(indoc!(
                "Writes output to the file specified instead of stdout, errors will still be printed to stderr.
                 Will ask for confirmation before overwriting files, to allow overwriting, pass `--no-confirm-overwrite`
                 Will create parent directories if needed."
            )),
    )
    .arg(
        Arg::new("no-confirm-overwrite")
            .long("no-confirm-overwrite")
            .action(ArgAction::SetTrue)
            .help("When set, will not ask for confirmation before overwriting files, useful for automation"),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .action(ArgAction::Count)
            .help(indoc!(
                "-v - info, -vv - debug, -vvv - trace.
                 trace output is only available in debug builds, as it is extremely verbose"
            )),
    )
}

fn cli() -> Command {
    Command::new("res_dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility to inspect compiled Windows resource (.res) files")
        .long_about(indoc!(
            r#"
            Utility to inspect compiled Windows resource (.res) files.

            Lists the blocks of a container, decodes STRINGTABLE, MESSAGETABLE, MENU and
            DIALOG/DIALOGEX resources, and compares a translated resource against the same
            resource in a reference language.
        "#
        ))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(common_args(list::command()))
        .subcommand(common_args(show::command()))
        .subcommand(common_args(locales::command()))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let (name, sub_matches) = matches
        .subcommand()
        .context("a subcommand is required")?;

    let settings = DumpSettings::from_cli_matches(sub_matches)?;
    settings.init_logging();

    let mut output = settings.open_output()?;
    match name {
        "list" => list::run(sub_matches, &settings, &mut *output)?,
        "show" => show::run(sub_matches, &settings, &mut *output)?,
        "locales" => locales::run(sub_matches, &settings, &mut *output)?,
        other => bail!("unknown subcommand `{other}`"),
    }
    output.flush()?;

    Ok(())
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
