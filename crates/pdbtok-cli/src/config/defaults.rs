use pdbtok::core::cipher::{DEFAULT_KEYS, DEFAULT_VALUES};
use pdbtok::engine::config::{
    DEFAULT_EXTENSION, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, DEFAULT_TRAIN_FRACTION,
};

pub struct DefaultsConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub min_fragment_len: usize,
    pub max_fragment_len: usize,
    pub extension: String,
    pub source_language: String,
    pub target_language: String,
    pub cipher_keys: String,
    pub cipher_values: String,
    pub train_fraction: f64,
    pub drop_last_valid_line: bool,
    pub keep_going: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input_dir: "data/input".to_string(),
            output_dir: "data/output".to_string(),
            min_fragment_len: 5,
            max_fragment_len: 10,
            extension: DEFAULT_EXTENSION.to_string(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            cipher_keys: DEFAULT_KEYS.to_string(),
            cipher_values: DEFAULT_VALUES.to_string(),
            train_fraction: DEFAULT_TRAIN_FRACTION,
            drop_last_valid_line: true,
            keep_going: false,
        }
    }
}
