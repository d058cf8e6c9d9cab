//! # Engine Module
//!
//! Run-level configuration and plumbing shared by the pipeline workflows.
//!
//! - **Configuration** ([`config`]) - Window bounds, cipher alphabets, output layout, split and
//!   failure policies, assembled through [`config::PipelineConfigBuilder`]
//! - **Error Handling** ([`error`]) - [`error::EngineError`], carrying the offending path
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends

pub mod config;
pub mod error;
pub mod progress;
