//! Guests

use crate::ids::GuestId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub ssn: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

impl Guest {
    /// `Last First`, as shown in pickers
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    /// Substring match on first or last name. `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
    }
}

/// Payload for registering a guest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub ssn: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

impl NewGuest {
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn into_guest(self, id: GuestId) -> Guest {
        Guest {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            ssn: self.ssn,
            dob: self.dob,
            address: self.address,
            city: self.city,
        }
    }
}
