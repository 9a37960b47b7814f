//! Data models for the CITC portal client.
//!
//! These models match the backend JSON payloads field for field.

mod event;
mod team;
mod user;

pub use event::*;
pub use team::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Read a nullable patch field: a missing key stays `None`, an explicit `null` becomes
/// `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
