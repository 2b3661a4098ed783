use serde::{Deserialize, Serialize};

use crate::domain::rsvp::RsvpStatus;
use crate::domain::token::Identifier;

// The serialization within this layer is a dependency leak, but these records
// mirror the remote API one to one and nothing else consumes them.

// Event as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    pub id: Identifier,
    pub name: String,
    pub location: String,
    pub start_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub host_username: Option<String>,
}

// Payload for creating an event; the host is taken from the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEvent {
    pub name: String,
    pub location: String,
    pub start_time: String,
    pub description: String,
    pub cover_image: String,
}

// Guest registered for an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Guest {
    pub id: Identifier,
    pub event: Identifier,
    pub name: String,
    pub email: String,
    pub rsvp_status: RsvpStatus,
    #[serde(default)]
    pub check_in_time: Option<String>,
}

impl Guest {
    pub fn is_checked_in(&self) -> bool {
        self.check_in_time.is_some()
    }
}
