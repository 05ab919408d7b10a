use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "remindz")]
#[command(about = "Keeps track of reminders found in your documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding settings and flags
    #[arg(long, global = true, env = "REMINDZ_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the reminder cache
    #[arg(long, global = true, env = "REMINDZ_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the persistence state
    #[command(alias = "st")]
    Status,

    /// List reminders, soonest first
    #[command(alias = "ls")]
    List {
        /// Only show reminders from this file
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Record a reminder found in a document
    Add {
        /// File the reminder was found in
        file: String,

        /// Row the reminder was found on
        row: usize,

        /// When it is due (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
        time: String,

        /// Reminder text
        title: String,
    },

    /// Drop every reminder of a file
    Forget {
        file: String,
    },

    /// Get or set settings
    Config {
        /// Setting key (omit to show all)
        key: Option<String>,

        /// New value
        value: Option<String>,
    },

    /// Mark the documents as fully scanned
    Scanned,

    /// Turn persisted debug output on or off
    Debug {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Persist pending changes
    Save {
        /// Write even if nothing changed
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}
