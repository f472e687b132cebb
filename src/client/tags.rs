//! Tag listing and creation

use serde_json::json;
use tracing::instrument;

use super::{
    api::{BentoClient, DataEnvelope},
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::TagData;

impl BentoClient {
    /// List all tags
    #[instrument(skip(self, ctx))]
    pub async fn get_tags(&self, ctx: &Context) -> Result<Vec<TagData>> {
        let envelope: DataEnvelope<Vec<TagData>> = self.get_json(ctx, "/fetch/tags", &[]).await?;
        Ok(envelope.data)
    }

    /// Create a tag by name
    #[instrument(skip(self, ctx))]
    pub async fn create_tag(&self, ctx: &Context, name: &str) -> Result<TagData> {
        validation::required(name, || BentoError::InvalidRequest("tag name is required".into()))?;

        let envelope: DataEnvelope<TagData> = self
            .post_json(ctx, "/fetch/tags", &json!({ "tag": { "name": name } }))
            .await?;

        Ok(envelope.data)
    }
}
