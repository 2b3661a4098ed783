use std::sync::Arc;

use crate::domain::{ApiRequest, Identifier, RegistrationError, RsvpStatus};
use crate::interface_adapters::protocol::{GUESTS_PATH, RegisterGuestRequest};
use crate::use_cases::executor::AuthenticatedExecutor;

// Guest self-registration for an event.
pub struct RsvpRegistrar {
    pub executor: Arc<AuthenticatedExecutor>,
}

impl RsvpRegistrar {
    pub fn new(executor: Arc<AuthenticatedExecutor>) -> Self {
        Self { executor }
    }

    /// Registers a guest. Required fields are checked before any network call.
    #[tracing::instrument(name = "rsvp_register", skip_all, fields(event_id = %event_id, status = %status))]
    pub async fn register(
        &self,
        event_id: &Identifier,
        name: &str,
        email: &str,
        status: RsvpStatus,
    ) -> Result<(), RegistrationError> {
        let name = required(name, "name")?;
        let email = required(email, "email")?;

        let request = ApiRequest::post(
            GUESTS_PATH,
            &RegisterGuestRequest {
                event: event_id,
                name,
                email,
                rsvp_status: status,
            },
        )?;

        self.executor.execute(request).await.map_err(|err| {
            tracing::warn!(error = %err, "guest registration failed.");
            RegistrationError::RegistrationFailed(err)
        })?;

        tracing::info!("guest registered.");
        Ok(())
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, RegistrationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RegistrationError::ValidationFailed { field });
    }
    Ok(value)
}
