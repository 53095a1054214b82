//! fitcheck-core: Career readiness assessment engine.
//!
//! This crate defines the question model, the assessment state machine,
//! section scoring and the recommendation engine that the fitcheck CLI and
//! report renderers build on.

pub mod answers;
pub mod bank;
pub mod config;
pub mod error;
pub mod model;
pub mod recommend;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;
