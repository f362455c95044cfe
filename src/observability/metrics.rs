//! Metrics collection.
//!
//! # Metrics
//! - `navcore_navigations_total` (counter): attempts by outcome
//!   (`resolved`, `not_found`, `failed`)
//! - `navcore_superseded_attempts_total` (counter): lazy results discarded
//! - `navcore_lazy_fetch_total` (counter): fetches by result
//! - `navcore_view_cache_size` (gauge): cached lazy views

use ::metrics::{counter, gauge};

pub fn record_navigation(outcome: &'static str) {
    counter!("navcore_navigations_total", "outcome" => outcome).increment(1);
}

pub fn record_superseded() {
    counter!("navcore_superseded_attempts_total").increment(1);
}

pub fn record_lazy_fetch(result: &'static str) {
    counter!("navcore_lazy_fetch_total", "result" => result).increment(1);
}

pub fn record_cache_size(size: usize) {
    gauge!("navcore_view_cache_size").set(size as f64);
}
