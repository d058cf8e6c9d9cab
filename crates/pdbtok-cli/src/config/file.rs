use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileCipherConfig {
    pub keys: Option<String>,
    pub values: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSplitConfig {
    #[serde(rename = "train-fraction")]
    pub train_fraction: Option<f64>,
    #[serde(rename = "drop-last-valid-line")]
    pub drop_last_valid_line: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(rename = "input-dir")]
    pub input_dir: Option<PathBuf>,
    #[serde(rename = "output-dir")]
    pub output_dir: Option<PathBuf>,
    #[serde(rename = "min-fragment-len")]
    pub min_fragment_len: Option<usize>,
    #[serde(rename = "max-fragment-len")]
    pub max_fragment_len: Option<usize>,
    #[serde(rename = "n-cores")]
    pub n_cores: Option<usize>,
    #[serde(rename = "source-language")]
    pub source_language: Option<String>,
    #[serde(rename = "target-language")]
    pub target_language: Option<String>,
    pub seed: Option<u64>,
    pub extension: Option<String>,
    #[serde(rename = "keep-going")]
    pub keep_going: Option<bool>,
    pub cipher: Option<FileCipherConfig>,
    pub split: Option<FileSplitConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
