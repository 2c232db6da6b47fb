//! User DTOs

use serde::{Deserialize, Serialize};

use super::{validation, ProductDto};
use crate::domain::catalog::Product;
use crate::domain::customer::{CreateUserCommand, User, UserPatch, UserPreference};
use crate::domain::shared::{ProductId, Timestamp, ValidationError};

/// Preference sub-object of the user payloads and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferenceDto {
    /// Accepts marketing email.
    pub receive_email: bool,
}

impl From<UserPreferenceDto> for UserPreference {
    fn from(dto: UserPreferenceDto) -> Self {
        Self {
            receive_email: dto.receive_email,
        }
    }
}

impl From<UserPreference> for UserPreferenceDto {
    fn from(pref: UserPreference) -> Self {
        Self {
            receive_email: pref.receive_email,
        }
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    /// Well-formed, unique.
    pub email: String,
    /// 1 to 30 characters.
    pub first_name: String,
    /// 1 to 30 characters.
    pub last_name: String,
    /// Free text.
    pub address: String,
    /// Optional preference created with the user.
    pub user_preference: Option<UserPreferenceDto>,
}

impl CreateUserDto {
    /// Validate into a domain command.
    pub fn into_command(self) -> Result<CreateUserCommand, ValidationError> {
        validation::email("email", &self.email)?;
        validation::length("firstName", &self.first_name, 1, 30)?;
        validation::length("lastName", &self.last_name, 1, 30)?;
        Ok(CreateUserCommand {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            preference: self.user_preference.map(Into::into),
        })
    }
}

/// Body of `PATCH /users/{id}`; any subset of the create fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    /// New email.
    pub email: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New preference.
    pub user_preference: Option<UserPreferenceDto>,
}

impl UpdateUserDto {
    /// Validate the fields that are present.
    pub fn into_patch(self) -> Result<UserPatch, ValidationError> {
        if let Some(email) = &self.email {
            validation::email("email", email)?;
        }
        if let Some(first_name) = &self.first_name {
            validation::length("firstName", first_name, 1, 30)?;
        }
        if let Some(last_name) = &self.last_name {
            validation::length("lastName", last_name, 1, 30)?;
        }
        Ok(UserPatch {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            preference: self.user_preference.map(Into::into),
        })
    }
}

/// Body of `POST /users/{id}/save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProductDto {
    /// Product to save.
    pub product_id: String,
}

impl SaveProductDto {
    /// Product id to link.
    pub fn product_id(&self) -> Result<ProductId, ValidationError> {
        if self.product_id.is_empty() {
            return Err(ValidationError::new("productId", "must not be empty"));
        }
        Ok(ProductId::new(self.product_id.as_str()))
    }
}

/// User as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// User id.
    pub id: String,
    /// Email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Address.
    pub address: String,
    /// Preference, `null` if never set.
    pub user_preference: Option<UserPreferenceDto>,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            address: user.address().to_string(),
            user_preference: user.preference().map(Into::into),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// User with their saved products, returned by `POST /users/{id}/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItemsDto {
    /// The user.
    #[serde(flatten)]
    pub user: UserDto,
    /// Every product the user has saved.
    pub saved_items: Vec<ProductDto>,
}

impl SavedItemsDto {
    /// Combine a user with their saved products.
    #[must_use]
    pub fn new(user: &User, saved: &[Product]) -> Self {
        Self {
            user: UserDto::from(user),
            saved_items: saved.iter().map(ProductDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn valid() -> serde_json::Value {
        json!({
            "email": "grace@example.com",
            "firstName": "Grace",
            "lastName": "Hopper",
            "address": "Arlington",
            "userPreference": { "receiveEmail": false }
        })
    }

    #[test]
    fn valid_payload_becomes_command() {
        let dto: CreateUserDto = serde_json::from_value(valid()).unwrap();
        let cmd = dto.into_command().unwrap();
        assert_eq!(cmd.first_name, "Grace");
        assert_eq!(
            cmd.preference,
            Some(UserPreference {
                receive_email: false
            })
        );
    }

    #[test]
    fn preference_is_optional() {
        let mut body = valid();
        body.as_object_mut().unwrap().remove("userPreference");
        let dto: CreateUserDto = serde_json::from_value(body).unwrap();
        assert!(dto.into_command().unwrap().preference.is_none());
    }

    #[test_case("email", json!("not-an-email") ; "bad email")]
    #[test_case("firstName", json!("") ; "empty first name")]
    #[test_case("lastName", json!("x".repeat(31)) ; "last name too long")]
    fn invalid_field_is_named(field: &str, value: serde_json::Value) {
        let mut body = valid();
        body[field] = value;
        let dto: CreateUserDto = serde_json::from_value(body).unwrap();
        assert_eq!(dto.into_command().unwrap_err().field, field);
    }

    #[test]
    fn patch_checks_only_present_fields() {
        let dto: UpdateUserDto = serde_json::from_value(json!({ "address": "Seoul" })).unwrap();
        assert_eq!(dto.into_patch().unwrap().address.as_deref(), Some("Seoul"));

        let dto: UpdateUserDto = serde_json::from_value(json!({ "email": "nope" })).unwrap();
        assert_eq!(dto.into_patch().unwrap_err().field, "email");
    }
}
