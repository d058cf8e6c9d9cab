//! # Workflows Module
//!
//! High-level entry points that turn a directory of protein structures into a tokenized
//! parallel corpus.
//!
//! ## Architecture
//!
//! - **Tokenization** ([`tokenize`]) - Reads the first chain of every structure file on a
//!   worker pool, cuts it into sliding-window fragments and writes one token shard per file,
//!   plus a whole-chain evaluation record.
//! - **Assembly** ([`assemble`]) - Shuffles the shards of one window-size range, splits them
//!   into train and validation partitions and writes source/target corpus files.
//! - **Pipeline** ([`pipeline`]) - Runs both phases back to back.
//!
//! Every workflow takes a validated [`crate::engine::config::PipelineConfig`] and reports
//! progress through a [`crate::engine::progress::ProgressReporter`].

pub mod assemble;
pub mod pipeline;
pub mod tokenize;
