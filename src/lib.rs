// src/lib.rs

//! Notice board crawler library.
//!
//! Crawls every section of a paginated HTML notice board, fingerprints
//! attachments and reports the notices that are not yet in the store.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;

pub use pipeline::{NewNotices, scrape};
