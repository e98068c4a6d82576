//! Cadence Core
//!
//! Core types and abstractions for driving jobs on a remote encoding service.
//!
//! This crate contains:
//! - Domain types: jobs, progress reports, artifacts, manifest plans, live sessions
//! - DTOs: request and response bodies exchanged with the remote service

pub mod domain;
pub mod dto;
