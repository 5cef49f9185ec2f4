// src/pipeline/mod.rs

//! Pipeline stages for event ingestion.
//!
//! - `normalize`: one raw listing item → canonical event draft
//! - `reconcile`: one draft → minimal necessary write against the store
//! - `ingest`: the full cycle invoked by the external scheduler

pub mod ingest;
pub mod normalize;
pub mod reconcile;

pub use ingest::{DateWindow, run_ingest};
pub use normalize::normalize;
pub use reconcile::{ReconcileOutcome, reconcile};
