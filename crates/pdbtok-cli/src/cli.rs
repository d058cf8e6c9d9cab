use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "pdbtok contributors",
    version,
    about = "pdbtok - Turn protein structures into amino-acid/dihedral-angle parallel corpora for sequence-to-sequence training.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of worker threads for tokenization, overriding `n-cores`.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tokenize every structure file, then assemble the train/valid corpora.
    Run(PipelineArgs),
    /// Tokenize structure files into per-file token shards only.
    Tokenize(PipelineArgs),
    /// Assemble existing token shards into shuffled train/valid corpora.
    Assemble(PipelineArgs),
}

/// Arguments shared by every pipeline subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct PipelineArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory searched recursively for structure files.
    #[arg(short, long, value_name = "PATH")]
    pub input_dir: Option<PathBuf>,

    /// Root of the output tree (tokens/, eval/, train/, valid/).
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Smallest fragment length, inclusive.
    #[arg(long, value_name = "INT")]
    pub min_len: Option<usize>,

    /// Largest fragment length, exclusive.
    #[arg(long, value_name = "INT")]
    pub max_len: Option<usize>,

    /// Seed for shuffling; runs with the same seed produce identical corpora.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Language tag of the amino-acid corpus files.
    #[arg(long, value_name = "TAG")]
    pub source_language: Option<String>,

    /// Language tag of the angle corpus files.
    #[arg(long, value_name = "TAG")]
    pub target_language: Option<String>,

    /// Extension of structure files to tokenize (e.g., 'cif', 'pdb').
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Skip structure files that fail instead of aborting the batch.
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S split.train-fraction=0.9
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::parse_from([
            "pdbtok", "-vv", "-j", "4", "run", "-i", "in", "-o", "out", "--min-len", "3",
            "--max-len", "6", "--seed", "42", "-k", "-S", "cipher.keys=0123456789 ",
        ]);

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.input_dir, Some(PathBuf::from("in")));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert_eq!(args.min_len, Some(3));
                assert_eq!(args.max_len, Some(6));
                assert_eq!(args.seed, Some(42));
                assert!(args.keep_going);
                assert_eq!(args.set_values, vec!["cipher.keys=0123456789 ".to_string()]);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from(["pdbtok", "assemble", "-q", "--log-file", "run.log"]);
        assert!(cli.quiet);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        assert!(matches!(cli.command, Commands::Assemble(_)));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pdbtok", "-q", "-v", "tokenize"]).is_err());
    }
}
