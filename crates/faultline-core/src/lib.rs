#![forbid(unsafe_code)]
//! faultline-core library.
//!
//! Shared domain model for the faultline root-cause-analysis engine: the
//! causal node/edge/chain types, the raw signal inputs, layered TOML
//! configuration, and the machine-readable error registry.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types where appropriate.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;
