use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eventline")]
#[command(about = "Inspect timeline conditions and date presets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level written to stderr (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a query and evaluate it against a set of tags
    Eval {
        /// Query such as `history AND NOT(draft)`
        query: String,

        /// Note tags, e.g. `history/rome`
        tags: Vec<String>,
    },

    /// Parse a raw date with a built-in preset and format it back
    Date {
        /// Preset name (see `presets`)
        preset: String,

        /// Raw date text; pure integers take the numeric path
        raw: String,
    },

    /// List built-in presets
    Presets,

    /// Build a timeline from a JSON array of notes
    Timeline {
        /// JSON file holding the notes
        notes: PathBuf,

        /// Condition query for the view
        #[arg(short, long)]
        query: String,

        /// TOML settings file
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Built-in preset overriding the settings' date configuration
        #[arg(short, long)]
        preset: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}
