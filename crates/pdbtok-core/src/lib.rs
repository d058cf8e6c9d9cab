//! # pdbtok Core Library
//!
//! Turns protein backbone structures into a parallel "amino-acid pairs ↔ encrypted dihedral
//! angles" corpus for sequence-to-sequence model training.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: the substitution cipher,
//!   residue models, structure reading with phi/psi computation, sliding-window fragment
//!   generation and the line encoder with its shard format.
//!
//! - **[`engine`]: Run Configuration.** The validated `PipelineConfig` (window bounds,
//!   output layout, split and failure policies), the error type shared by all workflows
//!   and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Batch tokenization over a worker pool and dataset
//!   assembly into shuffled train/validation corpora.

pub mod core;
pub mod engine;
pub mod workflows;
