// Event and guest-list operations over the authenticated executor.

use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::domain::{ApiRequest, Event, EventError, Guest, Identifier, NewEvent};
use crate::interface_adapters::protocol::{
    EVENTS_PATH, MY_EVENTS_PATH, event_guests_path, event_path,
};
use crate::use_cases::executor::{AuthenticatedExecutor, decode_body};

pub struct EventDirectory {
    pub executor: Arc<AuthenticatedExecutor>,
}

impl EventDirectory {
    pub fn new(executor: Arc<AuthenticatedExecutor>) -> Self {
        Self { executor }
    }

    #[tracing::instrument(name = "create_event", skip_all, fields(name = %event.name))]
    pub async fn create_event(&self, event: &NewEvent) -> Result<Event, EventError> {
        self.fetch(ApiRequest::post(EVENTS_PATH, event)?).await
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, EventError> {
        self.fetch(ApiRequest::get(EVENTS_PATH)).await
    }

    // Public read; works without a credential.
    pub async fn get_event(&self, id: &Identifier) -> Result<Event, EventError> {
        self.fetch(ApiRequest::get(event_path(id))).await
    }

    pub async fn my_events(&self) -> Result<Vec<Event>, EventError> {
        self.fetch(ApiRequest::get(MY_EVENTS_PATH)).await
    }

    #[tracing::instrument(name = "delete_event", skip_all, fields(event_id = %id))]
    pub async fn delete_event(&self, id: &Identifier) -> Result<(), EventError> {
        self.executor.execute(ApiRequest::delete(event_path(id))).await?;
        tracing::info!("event deleted.");
        Ok(())
    }

    /// Guests registered for an event. Sent with the organizer credential when
    /// one is held.
    pub async fn guests_for_event(&self, id: &Identifier) -> Result<Vec<Guest>, EventError> {
        self.fetch(ApiRequest::get(event_guests_path(id))).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, EventError> {
        let response = self.executor.execute(request).await?;
        decode_body(&response).map_err(EventError::MalformedResponse)
    }
}
