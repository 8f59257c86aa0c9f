use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, ArgGroup, Parser};
use log::*;

use dictcc::utils::ProgressState;
use dictcc::{DictConfig, Dictionary, OutputFormat, Query, QueryMode, Result};

const SEPARATOR_WIDTH: usize = 80;
const QUIT_COMMAND: &str = "^Q";

#[derive(Parser)]
#[command(
    name = "dictcc",
    version,
    about = "Query a local copy of the dict.cc German/English dictionary",
    after_help = "If neither an option nor QUERY is given, dictcc enters interactive mode.",
    disable_version_flag = true,
    group(ArgGroup::new("mode").args(["simple", "regexp", "fulltext"]))
)]
struct Cli {
    /// Import the dict file from dict.cc
    #[arg(short, long, value_name = "DICTCC_FILE")]
    import: Option<PathBuf>,

    /// Show the version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Show the number of entries in the databases
    #[arg(short = 'S', long)]
    size: bool,

    /// Use PATH instead of ~/.rdictcc/
    #[arg(short, long, value_name = "PATH")]
    directory: Option<String>,

    /// Load settings from a JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use compact output format
    #[arg(short, long)]
    compact: bool,

    /// Translate the word given as QUERY (default)
    #[arg(short, long)]
    simple: bool,

    /// Translate all words matching the regexp QUERY
    #[arg(short, long)]
    regexp: bool,

    /// Translate all sentences matching the regexp QUERY
    #[arg(short, long)]
    fulltext: bool,

    query: Vec<String>,
}

impl Cli {
    fn query_mode(&self) -> Option<QueryMode> {
        if self.regexp {
            Some(QueryMode::Pattern)
        } else if self.fulltext {
            Some(QueryMode::FullText)
        } else if self.simple {
            Some(QueryMode::Exact)
        } else {
            None
        }
    }

    fn load_config(&self) -> Result<DictConfig> {
        let mut config = match &self.config {
            Some(path) => DictConfig::from_json_file(path)?,
            None => DictConfig::default(),
        };
        if let Some(directory) = &self.directory {
            config.dict_dir = directory.clone();
        }
        if self.compact {
            config.output_format = OutputFormat::Compact;
        }
        Ok(config)
    }
}

fn report_progress(state: &mut ProgressState) -> bool {
    info!("{}: {}/{}", state.state_id, state.current + 1, state.total);
    false
}

fn make_query(mode: Option<QueryMode>, text: &str) -> Query {
    match mode {
        Some(mode) => Query::with_mode(mode, text),
        None => Query::parse(text),
    }
}

fn import(dictionary: &Dictionary, source_file: &Path) -> Result<()> {
    let summary = dictionary.import(source_file, Some(report_progress))?;
    if summary.skipped_lines > 0 {
        warn!("Skipped {} lines without '::'", summary.skipped_lines);
    }
    for (direction, entries) in &summary.entry_counts {
        println!("{{{}}} built dict with {} entries", direction, entries);
    }
    Ok(())
}

fn show_sizes(dictionary: &Dictionary) -> Result<()> {
    for info in dictionary.entry_counts()? {
        match info.created {
            Some(created) => println!(
                "{{{}}} Database has {} entries (imported {})",
                info.direction,
                info.entries,
                created.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => println!("{{{}}} Database has {} entries", info.direction, info.entries),
        }
    }
    Ok(())
}

fn interactive_mode(dictionary: &Dictionary, mode: Option<QueryMode>) -> Result<()> {
    println!("Welcome to dictcc's interactive mode. This mode will read from stdin");
    println!("and print the translations until it reads {} (literally, not Ctrl-Q).", QUIT_COMMAND);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("=> ");
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let word = line.trim_end_matches(['\r', '\n']);
        println!();
        if word == QUIT_COMMAND {
            break;
        }
        match dictionary.query_with(&make_query(mode, word), &mut stdout) {
            Ok(_) => {}
            Err(e) if e.is_missing_store() => return Err(e),
            Err(e) => eprintln!("Error: {}", e),
        }
        println!("{}", "-".repeat(SEPARATOR_WIDTH));
    }
    println!("Bye.");
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let dictionary = Dictionary::new(cli.load_config()?);
    if let Some(source_file) = &cli.import {
        return import(&dictionary, source_file);
    }
    if cli.size {
        return show_sizes(&dictionary);
    }
    let text = cli.query.join(" ");
    if text.is_empty() {
        return interactive_mode(&dictionary, cli.query_mode());
    }
    let matches = dictionary.query_with(&make_query(cli.query_mode(), &text), &mut io::stdout())?;
    debug!("{} matches for '{}'", matches, text);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.import.is_some() { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
