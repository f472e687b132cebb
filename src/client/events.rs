//! Event tracking

use serde_json::json;
use tracing::instrument;

use super::{
    api::BentoClient,
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::{BatchOutcome, EventData};

impl BentoClient {
    /// Track one or more events in a single batch
    ///
    /// Any rejected event fails the call with [`BentoError::PartialBatchFailure`].
    #[instrument(skip(self, ctx, events), fields(count = events.len()))]
    pub async fn track_events(&self, ctx: &Context, events: &[EventData]) -> Result<BatchOutcome> {
        if events.is_empty() {
            return Err(BentoError::InvalidRequest("no events provided".into()));
        }

        for event in events {
            validation::email(&event.email)?;
            validation::required(&event.kind, || {
                BentoError::InvalidRequest("event type is required".into())
            })?;
        }

        self.post_batch(ctx, "/batch/events", &json!({ "events": events }))
            .await
    }
}
