//! Data Transfer Objects for the remote job service
//!
//! This module contains the request and response bodies used on the wire.
//! Domain types that travel unchanged (descriptions, outputs, live details)
//! are not duplicated here.

pub mod job;
