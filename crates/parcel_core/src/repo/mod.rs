//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the parcel data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Only `get` reports a semantic `NotFound`; zero-row writes succeed.
//! - Engine errors are carried verbatim, never reinterpreted.

pub mod parcel_repo;
