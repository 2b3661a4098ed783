// Use cases layer: check-in workflows over the domain ports.

pub mod check_in;
pub mod events;
pub mod executor;
pub mod rsvp;
pub mod scan_pipeline;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use check_in::CheckInCommitter;
pub use events::EventDirectory;
pub use executor::AuthenticatedExecutor;
pub use rsvp::RsvpRegistrar;
pub use scan_pipeline::{ScanControl, ScanPipeline, ScanSettings};
pub use session::SessionUseCase;
