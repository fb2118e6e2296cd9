//! Core types shared across litemig facilities
//!
//! This crate provides foundational types used by both the error handling
//! and logging facilities:
//!
//! - **Correlation types**: RequestId for tying a migration run to its log events
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
