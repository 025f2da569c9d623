//! bloomcheck-core: question analysis engine, scoring, and statistics.
//!
//! This crate defines the data model, configuration, and the analysis
//! pipeline that classifies exam questions against Bloom's taxonomy,
//! estimates their difficulty, flags ambiguous phrasing, and scores the
//! paper as a whole.

pub mod ambiguity;
pub mod classifier;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod preprocess;
pub mod quality;
pub mod report;
pub mod scoring;
pub mod statistics;
pub mod suggestions;

pub use config::EngineConfig;
pub use engine::{Analysis, AnalysisEngine, NoopReporter, ProgressReporter};
pub use error::AnalysisError;
pub use report::Report;
