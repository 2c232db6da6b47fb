//! User aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Timestamp, UserId};

/// One-to-one notification preference of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreference {
    /// Whether the user accepts marketing email.
    pub receive_email: bool,
}

/// Validated input for registering a user.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    /// Unique email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Postal address.
    pub address: String,
    /// Optional preference created alongside the user.
    pub preference: Option<UserPreference>,
}

/// Validated partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New email.
    pub email: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New preference; creates one if the user had none.
    pub preference: Option<UserPreference>,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    first_name: String,
    last_name: String,
    address: String,
    preference: Option<UserPreference>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl User {
    /// Register a new user with a generated id.
    #[must_use]
    pub fn new(cmd: CreateUserCommand) -> Self {
        let now = Timestamp::now();
        Self {
            id: UserId::generate(),
            email: cmd.email,
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            address: cmd.address,
            preference: cmd.preference,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored columns.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn reconstitute(
        id: UserId,
        email: String,
        first_name: String,
        last_name: String,
        address: String,
        preference: Option<UserPreference>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
            address,
            preference,
            created_at,
            updated_at,
        }
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(preference) = patch.preference {
            self.preference = Some(preference);
        }
        self.updated_at = Timestamp::now();
    }

    /// User id.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Postal address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Notification preference, if any.
    #[must_use]
    pub const fn preference(&self) -> Option<UserPreference> {
        self.preference
    }

    /// Registration time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
