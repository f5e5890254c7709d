//! Analyzer module - catalog quality analysis engine

pub mod engine;
pub mod metrics;
pub mod scoring;

pub use engine::AnalysisEngine;
pub use scoring::CompositeScorer;
