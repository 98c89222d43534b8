use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the template records
    #[arg(short, long, global = true, env = "TEMPLATE_VAULT_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a template from an existing document
    ///
    /// Every non-empty line of the source becomes a paragraph of the body.
    /// Mark text to turn it into a field:
    ///   - From the command line: --mark "John Smith"
    ///   - Interactively, from the editing menu
    New {
        /// Source document to derive the template from
        source: PathBuf,

        /// Template name
        #[arg(short, long)]
        name: Option<String>,

        /// Template description
        #[arg(short = 'D', long, default_value = "")]
        description: String,

        /// Category of the template
        #[arg(short, long, default_value = "General")]
        category: String,

        /// Text of the body to turn into a field (first occurrence)
        #[arg(short, long)]
        mark: Vec<String>,

        /// Save right away instead of opening the editing menu
        #[arg(long)]
        batch: bool,
    },

    /// Edit an existing template
    Edit {
        /// Template name
        name: String,
    },

    /// List all templates
    Ls,

    /// Show the details of a template
    Show {
        /// Template name
        name: String,
    },

    /// Show the markers a template body can use
    Markers {
        /// Template name
        name: String,
    },

    /// Fill a template and generate a document
    Fill {
        /// Template name
        name: String,

        /// Field value as id=value; may be repeated
        #[arg(short = 's', long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,

        /// Where to write the generated document
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the generated text instead of writing a file
        #[arg(short, long)]
        print: bool,

        /// Do not prompt for fields missing from --set
        #[arg(long)]
        no_prompt: bool,
    },

    /// Delete a template
    Delete {
        /// Template name
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Import a template record
    Import {
        /// Record to import
        file: PathBuf,

        /// Replace a template with the same name
        #[arg(long)]
        overwrite: bool,
    },

    /// Export a template record
    Export {
        /// Template name
        name: String,

        /// Destination file
        destination: PathBuf,
    },
}

/// Parses `id=value`. The value may be empty and may contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected id=value, got '{}'", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing field id in '{}'", s));
    }
    Ok((id.to_string(), value.to_string()))
}
