use crate::model::Id;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

/// Public view of an account as the backend serializes it. The password is
/// never part of this layer.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Body of `POST /api/login`.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/signup`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct CreateUser {
    pub username: String,
    pub email: Email,
    pub password: String,
}

/// Body of `PUT /api/user/{id}`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct UpdateUser {
    pub username: String,
    pub email: Email,
}

/// An email address that passed the client-side format check: no
/// whitespace, exactly one `@`, a non-empty local part, and a domain
/// containing a `.` with at least one character on each side.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The email address is invalid: {0}")]
pub struct InvalidEmailError(String);

impl Email {
    pub fn new(address: String) -> Result<Self, InvalidEmailError> {
        if Self::is_valid(&address) {
            Ok(Email(address))
        } else {
            Err(InvalidEmailError(address))
        }
    }

    fn is_valid(address: &str) -> bool {
        if address.chars().any(char::is_whitespace) {
            return false;
        }

        let Some((local, domain)) = address.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.contains('@') {
            return false;
        }

        domain
            .char_indices()
            .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Email::new(inner).map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"Email"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::user::Email;

    #[test]
    fn accepts_plausible_addresses() {
        for address in [
            "alice@example.com",
            "a@b.c",
            "first.last@sub.domain.org",
            "x+tag@host.co",
        ] {
            assert!(Email::new(address.to_owned()).is_ok(), "{address}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for address in [
            "bad-email",
            "",
            "@example.com",
            "alice@",
            "alice@example",
            "alice@.com",
            "alice@com.",
            "alice@exa mple.com",
            "ali ce@example.com",
            "alice@@example.com",
            "alice@example@com.de",
        ] {
            assert!(Email::new(address.to_owned()).is_err(), "{address}");
        }
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<Email>("\"alice@example.com\"").is_ok());
        assert!(serde_json::from_str::<Email>("\"bad-email\"").is_err());
    }
}
