//! CLI definitions for PageBridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PageBridge CLI.
#[derive(Parser)]
#[command(name = "pagebridge")]
#[command(about = "Extract page context and fill composers from saved HTML pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract the page context from an HTML file
    Extract {
        /// HTML file to read
        file: PathBuf,

        /// URL the page was loaded from (selects the site profile)
        #[arg(long)]
        url: String,
    },

    /// Fill the page's composer and print the resulting element
    Fill {
        /// HTML file to read
        file: PathBuf,

        /// URL the page was loaded from
        #[arg(long)]
        url: String,

        /// Text to write
        #[arg(long)]
        text: String,

        /// Target selector (default: the profile's input role)
        #[arg(long)]
        selector: Option<String>,

        /// Let the page handle synthetic paste like a rich-text editor
        #[arg(long)]
        paste_handled: bool,
    },

    /// List site profiles
    Profiles {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Serve the page as a tab and run one bridge request against it
    Bridge {
        /// HTML file to read
        file: PathBuf,

        /// URL the page was loaded from
        #[arg(long)]
        url: String,

        /// Message type to send (GET_PAGE_CONTEXT, FILL_FORM, TOGGLE_SIDEBAR, PING)
        #[arg(long = "type", default_value = "GET_PAGE_CONTEXT")]
        kind: String,

        /// Payload for the message, as JSON
        #[arg(long)]
        payload: Option<String>,

        /// Reply deadline in milliseconds (default: from configuration)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Register the tab without serving it, to observe the deadline
        #[arg(long)]
        silent: bool,
    },

    /// Check a configuration file
    Validate,
}
