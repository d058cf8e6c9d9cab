//! Structure input for the tokenizer.
//!
//! Structure files are reduced to the ordered residues of a single polypeptide chain,
//! each carrying its one-letter code and backbone phi/psi angles. The [`traits`] module
//! defines the reader interface the batch driver depends on; [`cif`] implements it for
//! mmCIF and PDB files.

pub mod cif;
pub mod traits;
