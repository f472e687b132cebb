//! Experimental utility endpoints
//!
//! These return Bento's payload as-is, apart from email validation which
//! has a fixed `{"valid": bool}` shape.

use compact_str::CompactString;
use tracing::instrument;

use super::{
    api::BentoClient,
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::{BlacklistData, JsonMap, ValidationData, ValidationResponse};

impl BentoClient {
    /// Check whether a domain or IP address is on a blacklist
    #[instrument(skip(self, ctx))]
    pub async fn get_blacklist_status(&self, ctx: &Context, data: &BlacklistData) -> Result<JsonMap> {
        let domain = data.domain.as_deref().filter(|d| !d.trim().is_empty());
        let ip = data.ip_address.as_deref().filter(|ip| !ip.is_empty());

        if domain.is_none() && ip.is_none() {
            return Err(BentoError::InvalidRequest(
                "either domain or IP address is required".into(),
            ));
        }

        if let Some(ip) = ip {
            validation::ip_address(ip)?;
        }

        let query: Vec<(&str, &str)> = [("domain", domain), ("ip", ip)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();

        self.get_json(ctx, "/experimental/blacklist.json", &query).await
    }

    /// Ask Bento whether an email address looks deliverable
    #[instrument(skip(self, ctx))]
    pub async fn validate_email(&self, ctx: &Context, data: &ValidationData) -> Result<ValidationResponse> {
        validation::email(&data.email_address)?;

        let ip = optional(&data.ip_address);
        if let Some(ip) = ip {
            validation::ip_address(ip)?;
        }

        let mut query = vec![("email", data.email_address.as_str())];
        query.extend(optional(&data.full_name).map(|v| ("name", v)));
        query.extend(optional(&data.user_agent).map(|v| ("user_agent", v)));
        query.extend(ip.map(|v| ("ip", v)));

        self.post_query(ctx, "/experimental/validation", &query).await
    }

    /// Run content moderation over a piece of text
    #[instrument(skip(self, ctx, content), fields(len = content.len()))]
    pub async fn get_content_moderation(&self, ctx: &Context, content: &str) -> Result<JsonMap> {
        validation::required(content, || BentoError::InvalidContent("content is required".into()))?;
        self.post_query(ctx, "/experimental/content_moderation", &[("content", content)])
            .await
    }

    /// Predict gender from a full name
    #[instrument(skip(self, ctx))]
    pub async fn get_gender(&self, ctx: &Context, full_name: &str) -> Result<JsonMap> {
        validation::required(full_name, || BentoError::InvalidName("full name is required".into()))?;
        self.post_query(ctx, "/experimental/gender", &[("name", full_name)]).await
    }

    /// Geolocate an IP address
    #[instrument(skip(self, ctx))]
    pub async fn geolocate_ip(&self, ctx: &Context, ip_address: &str) -> Result<JsonMap> {
        validation::ip_address(ip_address)?;
        self.get_json(ctx, "/experimental/geolocation", &[("ip", ip_address)]).await
    }
}

fn optional(value: &Option<CompactString>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
