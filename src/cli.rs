//! CLI definitions and entry point

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use gant::adapters::LocalTaskEngine;
use gant::config::GantConfig;
use gant::output::{OutputMode, TargetListing};
use gant::{Gant, TaskBuilder, Verbosity, paths};

/// Label given to a script read from standard input
const STDIN_BUILD_CLASS_NAME: &str = "standard_input";

/// gant - Scripted builds: targets, depends, and tasks
#[derive(Parser, Debug)]
#[command(
    name = "gant",
    version,
    about = "Scripted builds: targets, depends, and tasks",
    long_about = "Run targets from a Gantfile.\n\n\
                  Targets declare their prerequisites with depends; every target runs\n\
                  at most once per invocation. Names that are not targets are tasks."
)]
pub struct Cli {
    /// Gantfile to load ("-" reads standard input)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<String>,

    /// Trace task calls instead of executing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print nothing
    #[arg(short, long, conflicts_with_all = ["quiet", "verbose", "debug"])]
    pub silent: bool,

    /// Print only warnings and errors
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Bind a variable before the script loads
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_definition)]
    pub definitions: Vec<(String, String)>,

    /// List the targets and their descriptions
    #[arg(short = 'T', long = "targets")]
    pub list_targets: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long)]
    pub json: bool,

    /// Directory task paths resolve against
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Targets to achieve (default: the `default` target)
    pub targets: Vec<String>,
}

impl Cli {
    /// Verbosity chosen by flags, if any
    const fn verbosity(&self) -> Option<Verbosity> {
        if self.silent {
            Some(Verbosity::Silent)
        } else if self.quiet {
            Some(Verbosity::WarningsAndErrors)
        } else if self.debug {
            Some(Verbosity::Debug)
        } else if self.verbose {
            Some(Verbosity::Verbose)
        } else {
            None
        }
    }
}

fn parse_definition(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

/// Run the CLI, returning the process status
pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    let base_dir = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config = GantConfig::load(&base_dir);

    let verbosity = cli.verbosity().or(config.defaults.verbosity).unwrap_or_default();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.level_filter().as_str()),
    )
    .init();

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let mut gant = Gant::with_builder(TaskBuilder::new(LocalTaskEngine::new(&base_dir)));
    gant.set_verbosity(verbosity);
    gant.set_dry_run(cli.dry_run || config.defaults.dry_run.unwrap_or(false));
    for (name, value) in config.definitions.into_iter().chain(cli.definitions) {
        gant.set_variable(name, value);
    }

    let file = cli
        .file
        .or(config.defaults.file)
        .unwrap_or_else(|| paths::DEFAULT_GANTFILE.to_string());
    let loaded = if file == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        gant.set_build_class_name(STDIN_BUILD_CLASS_NAME);
        gant.load_script(&source)
    } else {
        gant.load_file(&base_dir.join(&file))
    };
    if let Err(e) = loaded {
        if verbosity > Verbosity::Silent {
            eprintln!("{} {e}", "error:".red().bold());
        }
        return Ok(e.exit_code());
    }

    if cli.list_targets {
        let listing = TargetListing {
            targets: gant.targets(),
            default: gant.default_target().map(String::from),
        };
        print!("{}", listing.render(output_mode));
        return Ok(gant::EXIT_SUCCESS);
    }

    let code = gant.process_targets_list(&cli.targets);
    if code != gant::EXIT_SUCCESS && verbosity > Verbosity::Silent {
        eprintln!("{}", "BUILD FAILED".red().bold());
    }
    Ok(code)
}
