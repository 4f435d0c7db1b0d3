//! Command-line interface for muxsave.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Save and inspect tmux window layouts.
#[derive(Debug, Parser)]
#[command(name = "muxsave", version, about)]
pub struct Cli {
    /// Session description file (defaults to the data dir, per session).
    #[arg(long, global = true, env = "MUXSAVE_FILE")]
    pub file: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save the window layouts of a tmux session.
    Save {
        /// Session to save (defaults to the current one).
        #[arg(long, short)]
        session: Option<String>,

        /// Abort if any window layout fails to decode.
        #[arg(long)]
        strict: bool,

        /// Keep panes in tmux order instead of sorting by position.
        #[arg(long)]
        no_sort: bool,
    },

    /// Show a saved session.
    Show {
        /// Session name, used to locate the file when --file is not given.
        #[arg(long, short)]
        session: Option<String>,

        /// Print the raw session file (JSON).
        #[arg(long)]
        json: bool,
    },

    /// Decode a full layout string (checksum included) and print its tree.
    Decode {
        /// Layout string, e.g. "b262,80x24,0,0,5".
        layout: String,

        /// Output the tree as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse a layout body and print it with its checksum prefix.
    Encode {
        /// Layout body, e.g. "80x24,0,0,5".
        body: String,
    },

    /// Print the layout checksum of arbitrary text.
    Checksum {
        /// Text to hash.
        text: String,
    },
}
