use serde::{Deserialize, Serialize};
use std::fmt;

// RSVP answer recorded once per registration; the API stores the one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsvpStatus {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "M")]
    Maybe,
    #[serde(rename = "N")]
    No,
}

impl RsvpStatus {
    pub fn code(self) -> &'static str {
        match self {
            RsvpStatus::Yes => "Y",
            RsvpStatus::Maybe => "M",
            RsvpStatus::No => "N",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
