//! Transactional email delivery

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{
    api::BentoClient,
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::EmailData;

/// Upper bound on emails accepted by a single `/batch/emails` call
pub const MAX_EMAILS_PER_BATCH: usize = 60;

#[derive(Debug, Deserialize)]
struct EmailResults {
    #[serde(default)]
    results: u64,
}

impl BentoClient {
    /// Queue up to [`MAX_EMAILS_PER_BATCH`] emails, returning how many were accepted
    #[instrument(skip(self, ctx, emails), fields(count = emails.len()))]
    pub async fn send_emails(&self, ctx: &Context, emails: &[EmailData]) -> Result<u64> {
        validate_emails(emails)?;

        let response: EmailResults = self
            .post_json(ctx, "/batch/emails", &json!({ "emails": emails }))
            .await?;

        Ok(response.results)
    }
}

fn validate_emails(emails: &[EmailData]) -> Result<()> {
    if emails.is_empty() {
        return Err(BentoError::InvalidRequest("no emails provided".into()));
    }

    if emails.len() > MAX_EMAILS_PER_BATCH {
        return Err(BentoError::InvalidBatchSize(format!(
            "{} emails given, at most {MAX_EMAILS_PER_BATCH} allowed per request",
            emails.len()
        )));
    }

    for email in emails {
        validation::email(&email.to)
            .map_err(|_| BentoError::InvalidEmail(format!("invalid recipient: {}", email.to)))?;
        validation::email(&email.from)
            .map_err(|_| BentoError::InvalidEmail(format!("invalid sender: {}", email.from)))?;
        validation::required(&email.subject, || {
            BentoError::InvalidRequest("subject is required".into())
        })?;
        validation::required(&email.html_body, || {
            BentoError::InvalidRequest("html_body is required".into())
        })?;
    }

    Ok(())
}
