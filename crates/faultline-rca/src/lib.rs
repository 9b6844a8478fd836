#![forbid(unsafe_code)]
//! faultline-rca library.
//!
//! # Overview
//!
//! The analysis engine behind faultline: raw operational signals go in, a
//! ranked root-cause report comes out.
//!
//! ## Pipeline
//!
//! ```text
//! SignalBatch (log text, request records, explicit events)
//!        ↓  build::GraphBuilder::build()
//! CausalGraph (id-indexed petgraph arena, heuristic edges)
//!        ↓  algo::{paths, cycles, topo, impact}
//! ranked root causes + causal chains + impact scores
//!        ↓  analysis::AnalysisEngine::analyze()
//! AnalysisResult (optionally refined via reason::Reasoner)
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Use typed `reason::ReasonError` results at the reasoner
//!   boundary; heuristic stages degrade and log instead of failing.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod algo;
pub mod analysis;
pub mod build;
pub mod reason;
pub mod store;

// Re-export primary types at crate level for convenience.
pub use analysis::{AnalysisEngine, AnalysisResult};
pub use build::GraphBuilder;
pub use store::CausalGraph;
