use crate::core::models::residue::Residue;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("Failed to parse structure: {}", messages.join("; "))]
    Parse { messages: Vec<String> },
    #[error("Structure contains no polypeptide residues with a complete N/CA/C backbone")]
    NoResidues,
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

/// How the extracted chain was chosen from the structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainSelection {
    /// The structure holds exactly one polypeptide chain.
    Single,
    /// The structure holds several chains; only the first one encountered was kept.
    FirstOfMany { chain_count: usize },
}

impl ChainSelection {
    pub fn is_multi_chain(&self) -> bool {
        matches!(self, ChainSelection::FirstOfMany { .. })
    }
}

/// Ordered residues of one chain, plus how that chain was selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainExtraction {
    pub chain_id: String,
    pub residues: Vec<Residue>,
    pub selection: ChainSelection,
}

/// Source of single-chain residue sequences with backbone dihedrals.
///
/// Implementors must be shareable across the worker pool: every worker calls
/// [`StructureReader::read_chain`] on its own file concurrently.
pub trait StructureReader: Send + Sync {
    /// Reads the structure at `path` and returns the residues of its first chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or holds no usable residues.
    fn read_chain(&self, path: &Path) -> Result<ChainExtraction, StructureError>;
}
