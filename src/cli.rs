//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use modfetch_core::FlattenMode;

/// Download a GameBanana mod and unpack it into your mods folder.
///
/// Paste a share link (or pass it as an argument); the file is downloaded,
/// extracted into the configured mods directory, and its files are moved up
/// out of the archive's folders.
#[derive(Parser, Debug)]
#[command(name = "modfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Share link, e.g. https://gamebanana.com/dl/12345#FileInfo_67890 (prompted if omitted)
    pub link: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Mods directory to install into (remembered for next time)
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Directory holding the remembered settings (default: data/ next to the executable)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Forget the remembered mods directory and ask again
    #[arg(long)]
    pub reset_path: bool,

    /// Re-attempt the download once after a gateway error
    #[arg(long)]
    pub retry: bool,

    /// How deep to move files out of extracted folders
    #[arg(long, value_enum, default_value_t = FlattenArg::Full)]
    pub flatten: FlattenArg,

    /// Exit without waiting for Enter after a successful install
    #[arg(long)]
    pub no_wait: bool,

    /// Remote host (for mirrors and testing)
    #[arg(long, value_name = "URL", hide = true)]
    pub base_url: Option<String>,
}

/// `--flatten` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenArg {
    /// Only files directly inside each extracted folder
    Shallow,
    /// Files at any depth
    Full,
}

impl From<FlattenArg> for FlattenMode {
    fn from(value: FlattenArg) -> Self {
        match value {
            FlattenArg::Shallow => Self::Shallow,
            FlattenArg::Full => Self::Full,
        }
    }
}
