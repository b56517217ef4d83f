//! Caching client for a Prometheus-compatible query backend
//!
//! A single client is built per run when the configuration names a backend URL.
//! Query outcomes are cached in memory for the whole run and persisted to a JSON
//! cache file afterwards, so repeated runs against the same backend can skip
//! queries answered recently.

mod cache;
mod client;
mod flush;

pub use client::{PrometheusClient, QueryOutcome};
pub use flush::CacheFlush;
