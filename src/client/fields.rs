//! Custom field listing and creation

use serde_json::json;
use tracing::instrument;

use super::{
    api::{BentoClient, DataEnvelope},
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::FieldData;

impl BentoClient {
    /// List all custom fields
    #[instrument(skip(self, ctx))]
    pub async fn get_fields(&self, ctx: &Context) -> Result<Vec<FieldData>> {
        let envelope: DataEnvelope<Vec<FieldData>> = self.get_json(ctx, "/fetch/fields", &[]).await?;
        Ok(envelope.data)
    }

    /// Create a custom field by key
    #[instrument(skip(self, ctx))]
    pub async fn create_field(&self, ctx: &Context, key: &str) -> Result<FieldData> {
        validation::required(key, || BentoError::InvalidRequest("field key is required".into()))?;

        let envelope: DataEnvelope<FieldData> = self
            .post_json(ctx, "/fetch/fields", &json!({ "field": { "key": key } }))
            .await?;

        Ok(envelope.data)
    }
}
