//! Core domain types
//!
//! This module contains the structures shared by the HTTP client and the
//! orchestrator. They describe remote jobs from the point of view of a
//! client: the remote service owns all job state, these types only carry
//! what was observed.

pub mod artifact;
pub mod job;
pub mod live;
pub mod manifest;
pub mod report;
