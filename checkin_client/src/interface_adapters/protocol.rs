use serde::{Deserialize, Serialize};

use crate::domain::{Identifier, RsvpStatus};

// Wire payloads exchanged with the event-management API.

pub const CHECK_IN_PATH: &str = "/guests/check-in/";
pub const GUESTS_PATH: &str = "/guests/";
pub const EVENTS_PATH: &str = "/events/";
pub const MY_EVENTS_PATH: &str = "/events/my_events/";
pub const TOKEN_CREATE_PATH: &str = "/auth/jwt/create/";
pub const TOKEN_REFRESH_PATH: &str = "/auth/jwt/refresh/";
pub const LOGOUT_PATH: &str = "/auth/logout/";

pub fn event_path(id: &Identifier) -> String {
    format!("/events/{id}/")
}

pub fn event_guests_path(id: &Identifier) -> String {
    format!("/guests/by-event/{id}/")
}

// Body of the check-in call; the display name is deliberately not sent.
#[derive(Debug, Serialize)]
pub struct CheckInRequest<'a> {
    pub guest_id: &'a Identifier,
    pub event_id: &'a Identifier,
    pub email: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckedInGuest {
    #[serde(default)]
    pub name: Option<String>,
}

// Check-in confirmation; every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct CheckInResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub guest: Option<CheckedInGuest>,
}

// Public RSVP registration.
#[derive(Debug, Serialize)]
pub struct RegisterGuestRequest<'a> {
    pub event: &'a Identifier,
    pub name: &'a str,
    pub email: &'a str,
    pub rsvp_status: RsvpStatus,
}

#[derive(Debug, Serialize)]
pub struct TokenCreateRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct TokenRefreshRequest<'a> {
    pub refresh: &'a str,
}

// The refresh token is only present when the server rotates it.
#[derive(Debug, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutRequest<'a> {
    pub refresh: &'a str,
}
