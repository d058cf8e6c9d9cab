use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::PipelineArgs;
use crate::error::{CliError, Result};
use pdbtok::engine::config::{self as core_config, FailurePolicy};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Merges built-in defaults, the config file, `--set` values and CLI flags, in increasing
/// order of precedence, into a validated pipeline configuration.
///
/// Relative directories are resolved against the current working directory here, so the
/// core only ever sees absolute paths.
pub fn build_config(
    args: &PipelineArgs,
    threads: Option<usize>,
) -> Result<core_config::PipelineConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let cwd = std::env::current_dir()?;
    let input_dir = resolve_dir(
        &cwd,
        args.input_dir
            .clone()
            .or(file_config.input_dir.take())
            .unwrap_or_else(|| PathBuf::from(&defaults.input_dir)),
    );
    let output_dir = resolve_dir(
        &cwd,
        args.output_dir
            .clone()
            .or(file_config.output_dir.take())
            .unwrap_or_else(|| PathBuf::from(&defaults.output_dir)),
    );

    let cipher_file = file_config.cipher.take().unwrap_or_default();
    let split_file = file_config.split.take().unwrap_or_default();

    let keep_going = args.keep_going
        || file_config
            .keep_going
            .unwrap_or(defaults.keep_going);
    let failure_policy = if keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    core_config::PipelineConfigBuilder::new()
        .input_dir(input_dir)
        .output_dir(output_dir)
        .extension(
            args.extension
                .clone()
                .or(file_config.extension)
                .unwrap_or(defaults.extension),
        )
        .min_len(
            args.min_len
                .or(file_config.min_fragment_len)
                .unwrap_or(defaults.min_fragment_len),
        )
        .max_len(
            args.max_len
                .or(file_config.max_fragment_len)
                .unwrap_or(defaults.max_fragment_len),
        )
        .cipher_alphabets(
            cipher_file.keys.unwrap_or(defaults.cipher_keys),
            cipher_file.values.unwrap_or(defaults.cipher_values),
        )
        .workers(threads.or(file_config.n_cores))
        .source_language(
            args.source_language
                .clone()
                .or(file_config.source_language)
                .unwrap_or(defaults.source_language),
        )
        .target_language(
            args.target_language
                .clone()
                .or(file_config.target_language)
                .unwrap_or(defaults.target_language),
        )
        .train_fraction(
            split_file
                .train_fraction
                .unwrap_or(defaults.train_fraction),
        )
        .drop_last_valid_line(
            split_file
                .drop_last_valid_line
                .unwrap_or(defaults.drop_last_valid_line),
        )
        .seed(args.seed.or(file_config.seed))
        .failure_policy(failure_policy)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn resolve_dir(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Argument(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "input-dir" => config.input_dir = Some(PathBuf::from(value_str)),
            "output-dir" => config.output_dir = Some(PathBuf::from(value_str)),
            "min-fragment-len" => {
                config.min_fragment_len = Some(parse_value(key, value_str, "integer")?)
            }
            "max-fragment-len" => {
                config.max_fragment_len = Some(parse_value(key, value_str, "integer")?)
            }
            "n-cores" => config.n_cores = Some(parse_value(key, value_str, "integer")?),
            "seed" => config.seed = Some(parse_value(key, value_str, "integer")?),
            "source-language" => config.source_language = Some(value_str.to_string()),
            "target-language" => config.target_language = Some(value_str.to_string()),
            "extension" => config.extension = Some(value_str.to_string()),
            "keep-going" => config.keep_going = Some(parse_value(key, value_str, "boolean")?),
            // Cipher alphabets may legitimately contain spaces, so they are taken verbatim.
            "cipher.keys" => {
                config.cipher.get_or_insert_with(Default::default).keys =
                    Some(value_str.to_string())
            }
            "cipher.values" => {
                config.cipher.get_or_insert_with(Default::default).values =
                    Some(value_str.to_string())
            }
            "split.train-fraction" => {
                config
                    .split
                    .get_or_insert_with(Default::default)
                    .train_fraction = Some(parse_value(key, value_str, "float")?)
            }
            "split.drop-last-valid-line" => {
                config
                    .split
                    .get_or_insert_with(Default::default)
                    .drop_last_valid_line = Some(parse_value(key, value_str, "boolean")?)
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdbtok::engine::config::Partition;
    use std::fs;
    use tempfile::tempdir;

    fn base_args() -> PipelineArgs {
        PipelineArgs {
            input_dir: Some(PathBuf::from("/data/in")),
            output_dir: Some(PathBuf::from("/data/out")),
            ..PipelineArgs::default()
        }
    }

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_fill_everything_not_given() {
        let cfg = build_config(&base_args(), None).expect("build ok");

        assert_eq!(cfg.input_dir, PathBuf::from("/data/in"));
        assert_eq!(cfg.layout.root(), Path::new("/data/out"));
        assert_eq!(cfg.bounds.min_len(), 5);
        assert_eq!(cfg.bounds.max_len(), 10);
        assert_eq!(cfg.extension, "cif");
        assert_eq!(cfg.languages.source, "source");
        assert_eq!(cfg.languages.target, "target");
        assert_eq!(cfg.split.train_fraction, 0.8);
        assert!(cfg.split.drop_last_valid_line);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.workers, None);
        assert_eq!(cfg.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn relative_dirs_resolve_against_current_dir() {
        let args = PipelineArgs::default();
        let cfg = build_config(&args, None).expect("build ok");

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(cfg.input_dir, cwd.join("data/input"));
        assert_eq!(cfg.layout.root(), cwd.join("data/output"));
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            r#"
            min-fragment-len = 3
            max-fragment-len = 4
            n-cores = 2
            seed = 9
            source-language = "aa"
            target-language = "angles"
            keep-going = true

            [split]
            train-fraction = 0.5
            drop-last-valid-line = false
            "#,
        );
        let mut args = base_args();
        args.config = Some(path);

        let cfg = build_config(&args, None).expect("build ok");

        assert_eq!(cfg.bounds.file_prefix(), "3_4");
        assert_eq!(cfg.workers, Some(2));
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.split.train_fraction, 0.5);
        assert!(!cfg.split.drop_last_valid_line);
        assert_eq!(cfg.failure_policy, FailurePolicy::Continue);
        assert_eq!(
            cfg.layout.corpus_path(Partition::Train, &cfg.bounds, &cfg.languages.source),
            PathBuf::from("/data/out/train/3_4_aa.txt")
        );
    }

    #[test]
    fn cli_flags_override_set_values_which_override_file() {
        let (_dir, path) = write_config(
            r#"
            min-fragment-len = 3
            max-fragment-len = 8
            seed = 1
            n-cores = 2
            "#,
        );
        let mut args = base_args();
        args.config = Some(path);
        args.set_values = vec![
            "min-fragment-len=4".to_string(),
            "max-fragment-len=9".to_string(),
            "seed=2".to_string(),
        ];
        args.max_len = Some(12);

        let cfg = build_config(&args, Some(6)).expect("build ok");

        assert_eq!(cfg.bounds.min_len(), 4);
        assert_eq!(cfg.bounds.max_len(), 12);
        assert_eq!(cfg.seed, Some(2));
        assert_eq!(cfg.workers, Some(6));
    }

    #[test]
    fn set_values_reach_nested_sections() {
        let mut args = base_args();
        args.set_values = vec![
            "cipher.keys=0123456789 ".to_string(),
            "cipher.values=KJIHGFEDCBA".to_string(),
            "split.train-fraction=0.75".to_string(),
            "split.drop-last-valid-line=false".to_string(),
        ];

        let cfg = build_config(&args, None).expect("build ok");

        assert_eq!(cfg.cipher.encrypt("01 ".chars()), "KJA");
        assert_eq!(cfg.split.train_fraction, 0.75);
        assert!(!cfg.split.drop_last_valid_line);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let mut args = base_args();
        args.set_values = vec!["seed".to_string()];
        assert!(matches!(
            build_config(&args, None),
            Err(CliError::Argument(_))
        ));

        args.set_values = vec!["seed=abc".to_string()];
        assert!(matches!(build_config(&args, None), Err(CliError::Config(_))));

        args.set_values = vec!["unknown-key=1".to_string()];
        let err = build_config(&args, None).unwrap_err();
        assert!(err.to_string().contains("unknown-key"));
    }

    #[test]
    fn invalid_bounds_surface_as_config_errors() {
        let mut args = base_args();
        args.min_len = Some(6);
        args.max_len = Some(6);

        let err = build_config(&args, None).unwrap_err();
        match err {
            CliError::Config(msg) => assert!(msg.contains("min_len: 6")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mismatched_cipher_alphabets_are_rejected() {
        let mut args = base_args();
        args.set_values = vec!["cipher.values=ABC".to_string()];
        assert!(matches!(build_config(&args, None), Err(CliError::Config(_))));
    }
}
