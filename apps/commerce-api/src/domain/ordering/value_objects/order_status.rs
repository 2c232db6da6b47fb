//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::ValidationError;

/// Order status.
///
/// Every order starts as `Pending`. Which transitions are allowed is a
/// business rule owned outside this service, so any status may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, not yet fulfilled.
    #[default]
    Pending,
    /// Fulfilled.
    Complete,
}

impl OrderStatus {
    /// Wire/storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Complete => "COMPLETE",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETE" => Ok(Self::Complete),
            other => Err(ValidationError::new(
                "status",
                format!("unknown order status '{other}'"),
            )),
        }
    }
}
