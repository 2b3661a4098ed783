// Interface adapters: HTTP clients, wire protocol, and device/state adapters.

pub mod capture;
pub mod clients;
pub mod protocol;
pub mod state;
