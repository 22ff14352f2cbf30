//! Parcel tracking domain model.
//!
//! # Responsibility
//! - Define the data structures shared by storage and use-case layers.
//!
//! # Invariants
//! - Every persisted parcel is identified by a store-assigned `ParcelNumber`.
//! - Deletion is permanent; there are no tombstones.

pub mod parcel;
