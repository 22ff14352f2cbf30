//! Use-case services built on top of repository contracts.
//!
//! # Responsibility
//! - Provide caller-facing parcel workflows.
//! - Keep use cases storage-agnostic.

pub mod parcel_service;
