//! Integration test utilities for the character codex
//!
//! This crate provides helpers for running end-to-end scenarios against the
//! catalog services, on the in-memory store or on PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
