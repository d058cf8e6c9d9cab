use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_KEYS: &str = "0123456789 ";
pub const DEFAULT_VALUES: &str = "ABCDEFGHIJK";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CipherError {
    #[error("Length keys {keys} is not equal to length values {values}")]
    LengthMismatch { keys: usize, values: usize },
    #[error("Symbol '{symbol}' appears more than once in the {side} alphabet")]
    DuplicateSymbol { symbol: char, side: &'static str },
}

/// Symbol substitution used to render angle digits as letters.
///
/// The mapping is a bijection between a plain alphabet and an encrypted alphabet of the
/// same size. Symbols outside either alphabet pass through unchanged, so `decrypt` only
/// inverts `encrypt` for strings made exclusively of plain symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Cipher {
    encrypt_map: HashMap<char, char>,
    decrypt_map: HashMap<char, char>,
}

impl Cipher {
    pub fn new(keys: &str, values: &str) -> Result<Self, CipherError> {
        let keys: Vec<char> = keys.chars().collect();
        let values: Vec<char> = values.chars().collect();

        if keys.len() != values.len() {
            return Err(CipherError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut encrypt_map = HashMap::with_capacity(keys.len());
        let mut decrypt_map = HashMap::with_capacity(values.len());
        for (&plain, &encrypted) in keys.iter().zip(values.iter()) {
            if encrypt_map.insert(plain, encrypted).is_some() {
                return Err(CipherError::DuplicateSymbol {
                    symbol: plain,
                    side: "keys",
                });
            }
            if decrypt_map.insert(encrypted, plain).is_some() {
                return Err(CipherError::DuplicateSymbol {
                    symbol: encrypted,
                    side: "values",
                });
            }
        }

        Ok(Self {
            encrypt_map,
            decrypt_map,
        })
    }

    pub fn encrypt<I>(&self, original: I) -> String
    where
        I: IntoIterator<Item = char>,
    {
        Self::substitute(&self.encrypt_map, original)
    }

    pub fn decrypt<I>(&self, encrypted: I) -> String
    where
        I: IntoIterator<Item = char>,
    {
        Self::substitute(&self.decrypt_map, encrypted)
    }

    pub fn len(&self) -> usize {
        self.encrypt_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encrypt_map.is_empty()
    }

    fn substitute<I>(map: &HashMap<char, char>, symbols: I) -> String
    where
        I: IntoIterator<Item = char>,
    {
        symbols
            .into_iter()
            .map(|c| map.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

impl Default for Cipher {
    fn default() -> Self {
        let symbols = DEFAULT_KEYS.chars().zip(DEFAULT_VALUES.chars());
        Self {
            encrypt_map: symbols.clone().collect(),
            decrypt_map: symbols.map(|(k, v)| (v, k)).collect(),
        }
    }
}
