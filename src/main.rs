//! # Kitbag Command Line
//!
//! Drives a history selector against a JSON settings file, so picks made in
//! one run are remembered by the next.

use clap::{Parser, Subcommand};
use kitbag::{
    create_rng, FileStore, HistorySelector, KitbagError, KitbagResult, SelectorConfig,
    WeightedKey,
};
use log::{error, info};
use std::path::PathBuf;

/// Command line arguments for kitbag.
#[derive(Parser, Debug)]
#[command(name = "kitbag")]
#[command(about = "Weighted random picks that remember what they picked")]
#[command(version)]
struct Args {
    /// Settings file that holds saved histories
    #[arg(long, default_value = "kitbag-settings.json")]
    store: PathBuf,

    /// Random seed for reproducible picks
    #[arg(short, long)]
    seed: Option<u64>,

    /// Selector configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick one item, avoiding recent picks under the history id
    Pick {
        /// History id the picks are remembered under
        history_id: String,
        /// Items as `key` or `key:weight`
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Record an item as picked without drawing
    Mark {
        history_id: String,
        /// The item to mark, by key
        item: String,
        /// Items as `key` or `key:weight`
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Empty a saved history
    Clear { history_id: String },
    /// Print a saved history
    Show { history_id: String },
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .format_target(false)
        .init();
}

fn run(args: Args) -> KitbagResult<()> {
    info!("Starting kitbag v{}", kitbag::VERSION);

    let config = match &args.config {
        Some(path) => SelectorConfig::from_json_file(path)?,
        None => SelectorConfig::default(),
    };
    let store = FileStore::open(&args.store);
    let mut selector = HistorySelector::with_config(config, store, create_rng(args.seed));

    match args.command {
        Command::Pick { history_id, items } => {
            let items = parse_items(&items)?;
            match selector.pick_with_history(&items, &history_id) {
                Some(picked) => println!("{}", picked.key),
                None => {
                    return Err(KitbagError::InvalidItem(
                        "no item has a positive weight".to_string(),
                    ))
                }
            }
            selector.save_history(&history_id)?;
        }
        Command::Mark {
            history_id,
            item,
            items,
        } => {
            let items = parse_items(&items)?;
            let Some(target) = items.iter().find(|candidate| candidate.key == item) else {
                return Err(KitbagError::InvalidItem(format!("{} is not in the list", item)));
            };
            selector.mark_used(&items, target, &history_id);
            selector.save_history(&history_id)?;
            println!("marked {}", item);
        }
        Command::Clear { history_id } => {
            selector.load_history(&history_id);
            selector.clear_history(&history_id);
            selector.save_history(&history_id)?;
            println!("cleared {}", history_id);
        }
        Command::Show { history_id } => {
            selector.load_history(&history_id);
            let history = selector.history(&history_id).unwrap_or_default();
            println!("{}", kitbag::to_csv(history));
        }
    }

    Ok(())
}

fn parse_items(raw: &[String]) -> KitbagResult<Vec<WeightedKey>> {
    raw.iter().map(|item| item.parse()).collect()
}
