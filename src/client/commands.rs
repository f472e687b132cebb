//! Subscriber mutation commands

use serde_json::json;
use tracing::instrument;

use super::{
    api::BentoClient,
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::{BatchOutcome, CommandData};

impl BentoClient {
    /// Run one or more subscriber commands
    ///
    /// Command types are a closed set, see [`crate::domain::CommandType`];
    /// use [`CommandData::parse`] to build commands from untrusted names.
    #[instrument(skip(self, ctx, commands), fields(count = commands.len()))]
    pub async fn subscriber_command(&self, ctx: &Context, commands: &[CommandData]) -> Result<BatchOutcome> {
        if commands.is_empty() {
            return Err(BentoError::InvalidRequest("no commands provided".into()));
        }

        for command in commands {
            validation::email(&command.email)?;
            validation::required(&command.query, || {
                BentoError::InvalidRequest(format!("query is required for {}", command.command))
            })?;
        }

        self.post_batch(ctx, "/fetch/commands", &json!({ "command": commands }))
            .await
    }
}
