//! Site, segment and report statistics

use tracing::instrument;

use super::{
    api::BentoClient,
    context::Context,
    error::{BentoError, Result},
    validation,
};
use crate::domain::{JsonMap, ReportResponse};

impl BentoClient {
    #[instrument(skip(self, ctx))]
    pub async fn get_site_stats(&self, ctx: &Context) -> Result<JsonMap> {
        self.get_json(ctx, "/stats/site", &[]).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_segment_stats(&self, ctx: &Context, segment_id: &str) -> Result<JsonMap> {
        validation::required(segment_id, || {
            BentoError::InvalidSegmentId("segment ID is required".into())
        })?;

        self.get_json(ctx, "/stats/segment", &[("segment_id", segment_id)]).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_report_stats(&self, ctx: &Context, report_id: &str) -> Result<JsonMap> {
        validate_report_id(report_id)?;
        self.get_json(ctx, "/stats/report", &[("report_id", report_id)]).await
    }

    /// Report stats decoded into chart data
    #[instrument(skip(self, ctx))]
    pub async fn get_report(&self, ctx: &Context, report_id: &str) -> Result<ReportResponse> {
        validate_report_id(report_id)?;
        self.get_json(ctx, "/stats/report", &[("report_id", report_id)]).await
    }
}

fn validate_report_id(report_id: &str) -> Result<()> {
    validation::required(report_id, || {
        BentoError::InvalidRequest("report ID is required".into())
    })
}
