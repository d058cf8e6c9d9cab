//! # Core Module
//!
//! Stateless building blocks of the tokenizer: data models, structure input, geometry,
//! the angle cipher and the fragment/token machinery.
//!
//! ## Architecture
//!
//! - **Residue Representation** ([`models`]) - Residues with one-letter codes and backbone dihedrals
//! - **Structure Input** ([`io`]) - Reading a single chain out of mmCIF/PDB files
//! - **Geometry** ([`utils`]) - Dihedral angles and distances on backbone atoms
//! - **Angle Cipher** ([`cipher`]) - Reversible digit-to-letter substitution
//! - **Tokenization** ([`tokens`]) - Sliding-window fragments and their encoded lines
//!
//! Nothing in this module touches the filesystem layout of a run or holds mutable state;
//! orchestration lives in [`crate::workflows`].

pub mod cipher;
pub mod io;
pub mod models;
pub mod tokens;
pub mod utils;
