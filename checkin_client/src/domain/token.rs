use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::errors::TokenError;
use crate::domain::events::Guest;

// Identifiers are owned by the remote API: guests use UUID strings, events use
// integer keys. Keep whichever JSON shape was issued so it is re-sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(u64),
    Text(String),
}

impl Identifier {
    fn is_blank(&self) -> bool {
        match self {
            Identifier::Number(_) => false,
            Identifier::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(value) => write!(f, "{value}"),
            Identifier::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Number(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

/// Identity payload carried by an invitation QR code.
///
/// `guest_id`, `event_id` and `email` are required and non-empty; `name` is only
/// embedded for display and is not sent with the check-in call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestToken {
    pub guest_id: Identifier,
    pub event_id: Identifier,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// Loose shape used while parsing so that missing fields surface as
// `Incomplete` instead of a generic deserialization failure.
#[derive(Deserialize)]
struct RawToken {
    guest_id: Option<Identifier>,
    event_id: Option<Identifier>,
    email: Option<String>,
    name: Option<String>,
}

impl GuestToken {
    /// Builds the payload for a registered guest at invitation time.
    pub fn issue(guest: &Guest) -> Self {
        Self {
            guest_id: guest.id.clone(),
            event_id: guest.event.clone(),
            email: guest.email.clone(),
            name: Some(guest.name.clone()).filter(|name| !name.trim().is_empty()),
        }
    }

    /// Serializes the payload into the text injected into the QR graphic.
    pub fn encode(&self) -> String {
        let mut payload = serde_json::Map::new();
        payload.insert("guest_id".into(), identifier_value(&self.guest_id));
        payload.insert("event_id".into(), identifier_value(&self.event_id));
        payload.insert("email".into(), Value::String(self.email.clone()));
        if let Some(name) = &self.name {
            payload.insert("name".into(), Value::String(name.clone()));
        }
        Value::Object(payload).to_string()
    }

    /// Parses scanned QR text back into a token.
    ///
    /// Only structure is checked here; whether the ids exist or the email is
    /// well formed is decided by the remote API.
    pub fn decode(text: &str) -> Result<Self, TokenError> {
        let value: Value =
            serde_json::from_str(text.trim()).map_err(|err| TokenError::Malformed(err.to_string()))?;
        if !value.is_object() {
            return Err(TokenError::Malformed("payload is not an object".to_string()));
        }

        let raw: RawToken =
            serde_json::from_value(value).map_err(|err| TokenError::Malformed(err.to_string()))?;

        let guest_id = required_identifier(raw.guest_id, "guest_id")?;
        let event_id = required_identifier(raw.event_id, "event_id")?;
        let email = match raw.email {
            Some(email) if !email.trim().is_empty() => email,
            _ => return Err(TokenError::Incomplete { field: "email" }),
        };
        // Kept exactly as written; blank names are handled where they are displayed.
        Ok(Self {
            guest_id,
            event_id,
            email,
            name: raw.name,
        })
    }
}

fn identifier_value(id: &Identifier) -> Value {
    match id {
        Identifier::Number(value) => Value::from(*value),
        Identifier::Text(value) => Value::String(value.clone()),
    }
}

fn required_identifier(
    id: Option<Identifier>,
    field: &'static str,
) -> Result<Identifier, TokenError> {
    match id {
        Some(id) if !id.is_blank() => Ok(id),
        _ => Err(TokenError::Incomplete { field }),
    }
}
