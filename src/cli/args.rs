//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Find characters a text file cannot keep in its target encoding
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: incompat.toml)
    #[arg(short = 'C', long, global = true, default_value = "incompat.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan a file once and print every incompatible character
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,

        /// Exit with status 1 when anything is found
        #[arg(long)]
        strict: bool,
    },

    /// Keep scanning a file as it changes on disk
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        args: ScanArgs,
    },
}

/// Shared arguments for Scan and Watch commands
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// UTF-8 text file to check
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Target encoding label (e.g., shift_jis, euc-jp, windows-1252)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Compute best-effort substitutes for reported characters
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub substitutes: Option<bool>,
}

impl Cli {
    /// The file the command operates on.
    pub fn file(&self) -> &PathBuf {
        match &self.command {
            Commands::Scan { args, .. } | Commands::Watch { args } => &args.file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from(["incompat", "scan", "notes.txt", "-e", "euc-jp", "--strict"])
            .unwrap();
        match &cli.command {
            Commands::Scan { args, strict } => {
                assert_eq!(args.encoding.as_deref(), Some("euc-jp"));
                assert_eq!(args.substitutes, None);
                assert!(*strict);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cli.file(), &PathBuf::from("notes.txt"));
        assert_eq!(cli.config, PathBuf::from("incompat.toml"));
    }

    #[test]
    fn test_parse_watch_with_globals() {
        let cli = Cli::try_parse_from([
            "incompat", "watch", "draft.md", "--substitutes", "false", "-v", "-C", "alt.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        match &cli.command {
            Commands::Watch { args } => assert_eq!(args.substitutes, Some(false)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bare_substitutes_flag() {
        let cli = Cli::try_parse_from(["incompat", "scan", "a.txt", "--substitutes"]).unwrap();
        match &cli.command {
            Commands::Scan { args, .. } => assert_eq!(args.substitutes, Some(true)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["incompat", "scan"]).is_err());
    }
}
