//! Core utilities for the Risk stars tool
//!
//! This module consolidates common utilities that are used by both API
//! clients:
//! - `cache`: populate-once in-memory caches
//! - `http`: client construction, header helpers and the `Sleeper` seam

pub mod cache;
pub mod http;

// Re-export commonly used items for convenience
pub use cache::{AppendList, KeyedCache};
pub use http::{build_client, Sleeper, TokioSleeper};
