/*
[INPUT]:  Command-line arguments
[OUTPUT]: Parsed commands for the `ati` binary
[POS]:    CLI layer - argument definitions
[UPDATE]: When adding commands or flags
*/

pub mod init;
pub mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ati_adapter::HYPOTHESIS_PUBLIC_GROUP_ID;

#[derive(Parser, Debug)]
#[command(name = "ati", version, about = "Annotation transfer for ATI projects")]
pub struct Cli {
    /// Config file (defaults to <config dir>/ati/config.yaml)
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: String,
    /// Also write logs to this file
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show project details and links
    Info,
    /// Export annotations to another URL and group
    Export {
        /// Source group id, or ALL_GROUPS for every group
        #[arg(long, default_value = HYPOTHESIS_PUBLIC_GROUP_ID)]
        source_group: String,
        #[arg(long)]
        destination_url: String,
        #[arg(long)]
        destination_group: String,
        /// Post annotations visible only to me
        #[arg(long = "private")]
        make_private: bool,
    },
    /// Delete the manuscript's annotations
    Delete {
        /// Source group id, or ALL_GROUPS for every group
        #[arg(long, default_value = HYPOTHESIS_PUBLIC_GROUP_ID)]
        source_group: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Save annotations as a JSON array
    DownloadAnnotations {
        #[arg(long, default_value = HYPOTHESIS_PUBLIC_GROUP_ID)]
        group: String,
        #[arg(long, default_value = "annotations.json")]
        output: PathBuf,
    },
    /// Upload a .docx or .pdf manuscript
    UploadManuscript { path: PathBuf },
    /// Delete the project's manuscript
    DeleteManuscript {
        /// Manuscript file id (defaults to project.manuscript_id)
        #[arg(long)]
        id: Option<String>,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
