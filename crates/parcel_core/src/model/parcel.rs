//! Parcel domain model.
//!
//! # Responsibility
//! - Define the canonical shipment record persisted by the parcel store.
//! - Own the status vocabulary and its storage/wire spelling.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused for another parcel.
//! - `created_at` is an RFC-3339 UTC string written once at creation.
//! - `address` may change only while status is `registered`.

use chrono::{SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Opaque identifier of the client owning a parcel.
pub type ClientId = i64;

/// Lifecycle stage of a parcel.
///
/// The store does not enforce ordering between stages; `next()` describes the
/// forward path callers are expected to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted for shipping; address can still be edited.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Received by the client. Terminal.
    Delivered,
}

impl ParcelStatus {
    /// Storage and wire spelling of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Returns the following lifecycle stage, or `None` for `Delivered`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a known parcel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(String);

impl Display for ParseStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown parcel status `{}`; expected registered|sent|delivered",
            self.0
        )
    }
}

impl Error for ParseStatusError {}

impl FromStr for ParcelStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl ToSql for ParcelStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ParcelStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// Canonical shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Zero until the store assigns an identifier.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    pub address: String,
    /// RFC-3339 UTC, e.g. `2026-10-16T09:30:00Z`.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved parcel in `registered` state stamped with the
    /// current UTC time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: now_rfc3339(),
        }
    }

    /// Returns whether the store has assigned an identifier yet.
    pub fn is_persisted(&self) -> bool {
        self.number > 0
    }
}

/// Current UTC time in the fixed `created_at` format.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
