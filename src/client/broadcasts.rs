//! Broadcast listing and creation

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{
    api::BentoClient,
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::BroadcastData;

#[derive(Debug, Deserialize)]
struct BroadcastList {
    #[serde(alias = "data", default)]
    broadcasts: Vec<BroadcastData>,
}

impl BentoClient {
    /// List all broadcasts
    #[instrument(skip(self, ctx))]
    pub async fn get_broadcasts(&self, ctx: &Context) -> Result<Vec<BroadcastData>> {
        let list: BroadcastList = self.get_json(ctx, "/fetch/broadcasts", &[]).await?;
        Ok(list.broadcasts)
    }

    /// Create one or more broadcasts
    #[instrument(skip(self, ctx, broadcasts), fields(count = broadcasts.len()))]
    pub async fn create_broadcasts(&self, ctx: &Context, broadcasts: &[BroadcastData]) -> Result<()> {
        if broadcasts.is_empty() {
            return Err(BentoError::InvalidRequest("no broadcasts provided".into()));
        }

        broadcasts.iter().try_for_each(validate_broadcast)?;

        self.post(ctx, "/batch/broadcasts", &json!({ "broadcasts": broadcasts }))
            .await?;
        Ok(())
    }
}

fn validate_broadcast(broadcast: &BroadcastData) -> Result<()> {
    validation::required(&broadcast.name, || {
        BentoError::InvalidRequest("broadcast name is required".into())
    })?;
    validation::required(&broadcast.subject, || {
        BentoError::InvalidRequest("broadcast subject is required".into())
    })?;
    validation::required(&broadcast.content, || {
        BentoError::InvalidRequest("broadcast content is required".into())
    })?;
    validation::email(&broadcast.from.email)?;

    if broadcast.batch_size_per_hour == 0 {
        return Err(BentoError::InvalidBatchSize("batch size per hour must be positive".into()));
    }

    for tags in [&broadcast.inclusive_tags, &broadcast.exclusive_tags].into_iter().flatten() {
        if tags.split(',').any(|tag| tag.trim().is_empty()) {
            return Err(BentoError::InvalidTags(format!("malformed tag list {:?}", tags.as_str())));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BroadcastType, ContactData};

    fn broadcast() -> BroadcastData {
        BroadcastData {
            name: "Spring launch".into(),
            subject: "Something new".into(),
            content: "<p>Hello</p>".into(),
            kind: BroadcastType::Plain,
            from: ContactData { name: Some("Team".into()), email: "team@example.com".into() },
            inclusive_tags: Some("customers,beta".into()),
            exclusive_tags: None,
            segment_id: None,
            batch_size_per_hour: 1000,
        }
    }

    #[test]
    fn test_valid_broadcast() {
        assert!(validate_broadcast(&broadcast()).is_ok());
    }

    #[test]
    fn test_invalid_broadcasts() {
        let mut b = broadcast();
        b.name.clear();
        assert!(matches!(validate_broadcast(&b), Err(BentoError::InvalidRequest(_))));

        let mut b = broadcast();
        b.from.email = "team".into();
        assert!(matches!(validate_broadcast(&b), Err(BentoError::InvalidEmail(_))));

        let mut b = broadcast();
        b.batch_size_per_hour = 0;
        assert!(matches!(validate_broadcast(&b), Err(BentoError::InvalidBatchSize(_))));

        let mut b = broadcast();
        b.exclusive_tags = Some("churned,,trial".into());
        assert!(matches!(validate_broadcast(&b), Err(BentoError::InvalidTags(_))));
    }
}
