//! Shared data-layer types

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coarse-grained capability class used for authorization decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Passenger,
    Airline,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passenger => "passenger",
            Self::Airline => "airline",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role value; unknown values fall back to passenger
    pub fn parse(s: &str) -> Self {
        match s {
            "airline" => Self::Airline,
            "admin" => Self::Admin,
            _ => Self::Passenger,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Airline entitlement plan gating premium dashboard features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Subscribed,
}

impl Plan {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, Self::Subscribed)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Subscribed => write!(f, "subscribed"),
        }
    }
}

/// Account row as stored in the credential store
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}
