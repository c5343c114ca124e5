#![allow(dead_code)]

//! Shared test helpers for `ordersync-core` integration tests.
//!
//! In-memory mocks for every sync port so orchestrator tests can script
//! adapter behaviour and inspect what was persisted.

pub mod adapters;
pub mod clock;
pub mod repositories;
