// Frameworks layer: configuration and kiosk runtime wiring.

pub mod config;
pub mod kiosk;
