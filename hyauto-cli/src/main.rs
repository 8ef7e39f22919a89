use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use clap::Parser as ClapParser;
use hyauto::{
    definition::{HyperwordDefinition, NfhDefinition},
    prelude::*,
};
use log::{debug, info, warn};
use serde::{Serialize, de::DeserializeOwned};

#[derive(ClapParser)]
#[command(name = "hyauto", version, about = "Check hyperword membership for an NFH")]
pub struct Arguments {
    /// Path to the automaton definition (JSON, or TOML with a `.toml` extension)
    #[arg(long)]
    nfh: PathBuf,

    /// Path to the hyperword definition (JSON, or TOML with a `.toml` extension)
    #[arg(long, conflicts_with = "words")]
    hyperword: Option<PathBuf>,

    /// Words of the hyperword, one symbol per character
    words: Vec<String>,

    /// Synchrony mode (`sync` or `async`); defaults to the automaton's own, then `sync`
    #[arg(long)]
    mode: Option<SyncMode>,

    /// Maximum number of configurations to expand
    #[arg(long)]
    budget: Option<usize>,

    /// Wall-clock limit for the whole check, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print every witness run step by step
    #[arg(long)]
    trace: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in `{}`: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid TOML in `{}`: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot render the report: {0}")]
    Render(#[from] serde_json::Error),

    #[error(transparent)]
    Automaton(#[from] hyauto::utils::Error),
}

/// Budget and deadline combined; either one may stop the search.
struct Limits {
    budget: Option<NodeBudget>,
    deadline: Option<Deadline>,
}

impl SearchControl for Limits {
    fn proceed(&mut self, explored: usize) -> bool {
        self.budget.as_mut().is_none_or(|b| b.proceed(explored))
            && self.deadline.as_mut().is_none_or(|d| d.proceed(explored))
    }
}

#[derive(Serialize)]
struct WitnessOutput<'a> {
    assignment: Vec<String>,
    run: &'a Run,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    accepted: bool,
    mode: SyncMode,
    explored: usize,
    witnesses: Vec<WitnessOutput<'a>>,
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(&text).map_err(|source| CliError::Toml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn run(args: &Arguments) -> Result<bool, CliError> {
    info!("Loading NFH from {}", args.nfh.display());
    let definition: NfhDefinition = load(&args.nfh)?;
    let preferred = definition.mode()?;
    let nfh = Nfh::try_from(definition)?;
    debug!("NFH loaded:\n{}", nfh);

    let hyperword = match &args.hyperword {
        Some(path) => {
            info!("Loading hyperword from {}", path.display());
            Hyperword::from(load::<HyperwordDefinition>(path)?)
        }
        None => Hyperword::from_strs(args.words.iter().map(String::as_str)),
    };
    if hyperword.is_empty() {
        warn!("The hyperword is empty; only universal prefixes can accept it");
    }

    let mode = args.mode.or(preferred).unwrap_or_default();
    let mut limits = Limits {
        budget: args.budget.map(NodeBudget),
        deadline: args
            .timeout_ms
            .map(|ms| Deadline::after(Duration::from_millis(ms))),
    };

    info!("Checking membership of {} ({} mode)", hyperword, mode);
    let report = MembershipChecker::new(&nfh, mode).check_with(&hyperword, &mut limits)?;

    if args.json {
        let output = ReportOutput {
            accepted: report.accepted,
            mode,
            explored: report.explored,
            witnesses: report
                .witnesses
                .iter()
                .map(|w| WitnessOutput {
                    assignment: w.assignment.iter().map(ToString::to_string).collect(),
                    run: &w.run,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(report.accepted);
    }

    println!("Hyperword: {}", hyperword);
    if report.accepted {
        println!("RESULT: ACCEPTED");
        println!(
            "Succeeded on {} branch(es), {} configuration(s) explored.",
            report.witnesses.len(),
            report.explored
        );
        if args.trace {
            for (idx, witness) in report.witnesses.iter().enumerate() {
                println!("\nRun #{}:\n{}", idx + 1, witness.run.fmt(&nfh));
            }
        }
    } else {
        println!("RESULT: REJECTED");
        println!("{} configuration(s) explored.", report.explored);
    }
    Ok(report.accepted)
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    if let Err(error) = hylog::init(hylog::LogLevel::from_verbosity(args.verbose)) {
        eprintln!("Warning: logger already installed: {}", error);
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::from(2)
        }
    }
}
