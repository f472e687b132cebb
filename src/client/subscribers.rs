//! Subscriber lookup, creation and batch import

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{
    api::{BentoClient, DataEnvelope},
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::{BatchOutcome, SubscriberData, SubscriberInput};

#[derive(Debug, Deserialize)]
struct SubscriberEnvelope {
    #[serde(default)]
    data: Option<SubscriberData>,
}

impl BentoClient {
    /// Look up a subscriber by email
    ///
    /// A response without a subscriber id is reported as [`BentoError::NotFound`].
    #[instrument(skip(self, ctx))]
    pub async fn find_subscriber(&self, ctx: &Context, email: &str) -> Result<SubscriberData> {
        validation::email(email)?;

        let envelope: SubscriberEnvelope =
            self.get_json(ctx, "/fetch/subscribers", &[("email", email)]).await?;

        match envelope.data {
            Some(data) if !data.id.is_empty() => Ok(data),
            _ => Err(BentoError::not_found(format!("subscriber {email}"))),
        }
    }

    /// Create a single subscriber
    #[instrument(skip(self, ctx, input), fields(email = %input.email))]
    pub async fn create_subscriber(&self, ctx: &Context, input: &SubscriberInput) -> Result<SubscriberData> {
        validate_input(input)?;

        let envelope: DataEnvelope<SubscriberData> = self
            .post_json(ctx, "/fetch/subscribers", &json!({ "subscriber": input }))
            .await?;

        Ok(envelope.data)
    }

    /// Import subscribers in one batch
    #[instrument(skip(self, ctx, subscribers), fields(count = subscribers.len()))]
    pub async fn import_subscribers(
        &self,
        ctx: &Context,
        subscribers: &[SubscriberInput],
    ) -> Result<BatchOutcome> {
        if subscribers.is_empty() {
            return Err(BentoError::InvalidRequest("no subscribers provided".into()));
        }

        subscribers.iter().try_for_each(validate_input)?;

        self.post_batch(ctx, "/batch/subscribers", &json!({ "subscribers": subscribers }))
            .await
    }
}

fn validate_input(input: &SubscriberInput) -> Result<()> {
    validation::email(&input.email)?;

    if let Some(tag) = input
        .tags
        .iter()
        .chain(&input.remove_tags)
        .find(|tag| tag.trim().is_empty())
    {
        return Err(BentoError::InvalidTags(format!(
            "blank tag name {:?} for {}",
            tag.as_str(),
            input.email
        )));
    }

    Ok(())
}
