//! StateSet SKU Library
//!
//! Deterministic, collision-resistant SKU generation for product variants and
//! backfill of missing SKUs and UPCs.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod services;

pub use errors::ServiceError;
pub use services::sku::{
    abbreviate, assign_codes_for_batch, backfill_codes_for_design, backfill_upcs_for_design,
    compute_base_code, compute_unique_code, resolve_unique, AbbreviationMode, SkuService,
};
