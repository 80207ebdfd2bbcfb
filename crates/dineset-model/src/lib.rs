//! Core types for the dineset fixture-data pipeline.
//!
//! This crate defines the row types for every generated table (with the
//! exact CSV column headers downstream SQL exercises expect), the
//! [`GeneratorConfig`] parameter set, the error taxonomy, and the CSV
//! table adapter used at the pipeline edges.
//!
//! Generation itself lives in `dineset-gen`; this crate is deliberately
//! free of randomness so the stage builders stay pure functions from a
//! typed input bundle to a typed output bundle.

pub mod config;
pub mod entities;
pub mod error;
pub mod store;

pub use config::GeneratorConfig;
pub use entities::*;
pub use error::DatasetError;
pub use store::TableStore;
