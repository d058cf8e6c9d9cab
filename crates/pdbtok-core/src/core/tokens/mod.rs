//! Fragment generation, line encoding and token shard files.
//!
//! A residue sequence is cut into contiguous windows by [`fragments::FragmentGenerator`];
//! each window becomes one `"<aa_pairs>,<angle_pairs>"` record through
//! [`encoder::FragmentEncoder`], and [`shard`] stores those records on disk.

pub mod encoder;
pub mod fragments;
pub mod shard;
