// Bento API documentation: https://docs.bentonow.com
use std::str::FromStr;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::{
    client::BentoError,
    id::{FieldId, SubscriberId, TagId},
};

/// Open-ended JSON object used for stats and experimental payloads
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriberInput {
    pub email: CompactString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<CompactString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<CompactString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<CompactString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_tags: Vec<CompactString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<JsonMap>,
}

impl SubscriberInput {
    pub fn new(email: impl Into<CompactString>) -> Self {
        Self { email: email.into(), ..Default::default() }
    }

    pub fn with_name(
        mut self,
        first_name: impl Into<CompactString>,
        last_name: impl Into<CompactString>,
    ) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CompactString>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields
            .get_or_insert_with(JsonMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriberData {
    #[serde(default)]
    pub id: SubscriberId,
    #[serde(rename = "type", default)]
    pub kind: CompactString,
    #[serde(default)]
    pub attributes: SubscriberAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriberAttributes {
    #[serde(default)]
    pub uuid: CompactString,
    #[serde(default)]
    pub email: CompactString,
    #[serde(default)]
    pub fields: Option<JsonMap>,
    #[serde(default)]
    pub cached_tag_ids: Vec<TagId>,
    #[serde(default)]
    pub unsubscribed_at: Option<CompactString>,
    #[serde(default)]
    pub navigation_url: CompactString,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(rename = "type")]
    pub kind: CompactString,
    pub email: CompactString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonMap>,
}

impl EventData {
    pub fn new(kind: impl Into<CompactString>, email: impl Into<CompactString>) -> Self {
        Self { kind: kind.into(), email: email.into(), fields: None, details: None }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields
            .get_or_insert_with(JsonMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details
            .get_or_insert_with(JsonMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailData {
    pub to: CompactString,
    pub from: CompactString,
    pub subject: CompactString,
    pub html_body: String,
    #[serde(default)]
    pub transactional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalizations: Option<JsonMap>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastType {
    #[default]
    Plain,
    Raw,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<CompactString>,
    #[serde(default)]
    pub email: CompactString,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BroadcastData {
    #[serde(default)]
    pub name: CompactString,
    #[serde(default)]
    pub subject: CompactString,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: BroadcastType,
    #[serde(default)]
    pub from: ContactData,
    /// Comma separated tag names a recipient must have
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusive_tags: Option<CompactString>,
    /// Comma separated tag names a recipient must not have
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_tags: Option<CompactString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<CompactString>,
    #[serde(default)]
    pub batch_size_per_hour: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagData {
    #[serde(default)]
    pub id: TagId,
    #[serde(rename = "type", default)]
    pub kind: CompactString,
    #[serde(default)]
    pub attributes: TagAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagAttributes {
    #[serde(default)]
    pub name: CompactString,
    #[serde(default)]
    pub created_at: CompactString,
    #[serde(default)]
    pub discarded_at: Option<CompactString>,
    #[serde(default)]
    pub site_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    #[serde(default)]
    pub id: FieldId,
    #[serde(rename = "type", default)]
    pub kind: CompactString,
    #[serde(default)]
    pub attributes: FieldAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAttributes {
    #[serde(default)]
    pub name: CompactString,
    #[serde(default)]
    pub key: CompactString,
    #[serde(default)]
    pub whitelisted: Option<bool>,
    /// Absent or null on fields created before Bento tracked it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    AddTag,
    AddTagViaEvent,
    RemoveTag,
    AddField,
    RemoveField,
    Subscribe,
    Unsubscribe,
    ChangeEmail,
}

impl CommandType {
    pub const ALL: [CommandType; 8] = [
        CommandType::AddTag,
        CommandType::AddTagViaEvent,
        CommandType::RemoveTag,
        CommandType::AddField,
        CommandType::RemoveField,
        CommandType::Subscribe,
        CommandType::Unsubscribe,
        CommandType::ChangeEmail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::AddTag => "add_tag",
            CommandType::AddTagViaEvent => "add_tag_via_event",
            CommandType::RemoveTag => "remove_tag",
            CommandType::AddField => "add_field",
            CommandType::RemoveField => "remove_field",
            CommandType::Subscribe => "subscribe",
            CommandType::Unsubscribe => "unsubscribe",
            CommandType::ChangeEmail => "change_email",
        }
    }
}

impl FromStr for CommandType {
    type Err = BentoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandType::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| BentoError::InvalidRequest(format!("invalid command type: {s}")))
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    pub command: CommandType,
    pub email: CompactString,
    pub query: CompactString,
}

impl CommandData {
    pub fn new(
        command: CommandType,
        email: impl Into<CompactString>,
        query: impl Into<CompactString>,
    ) -> Self {
        Self { command, email: email.into(), query: query.into() }
    }

    /// Build a command from its wire name, rejecting unknown command types
    pub fn parse(
        command: &str,
        email: impl Into<CompactString>,
        query: impl Into<CompactString>,
    ) -> Result<Self, BentoError> {
        Ok(Self::new(command.parse()?, email, query))
    }
}

/// Aggregate outcome of a batch endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    #[serde(default)]
    pub results: u64,
    #[serde(default)]
    pub failed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlacklistData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<CompactString>,
    #[serde(rename = "ip", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<CompactString>,
}

impl BlacklistData {
    pub fn domain(domain: impl Into<CompactString>) -> Self {
        Self { domain: Some(domain.into()), ip_address: None }
    }

    pub fn ip(ip: impl Into<CompactString>) -> Self {
        Self { domain: None, ip_address: Some(ip.into()) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationData {
    #[serde(rename = "email")]
    pub email_address: CompactString,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<CompactString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<CompactString>,
    #[serde(rename = "ip", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<CompactString>,
}

impl ValidationData {
    pub fn new(email: impl Into<CompactString>) -> Self {
        Self { email_address: email.into(), ..Default::default() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    #[serde(rename = "counter")]
    Counter,
    #[serde(rename = "column_chart")]
    Column,
    #[serde(rename = "area_chart")]
    Area,
    #[serde(rename = "line_chart")]
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDataPoint {
    #[serde(rename = "g", default)]
    pub group: CompactString,
    #[serde(rename = "x")]
    pub date: CompactString,
    #[serde(rename = "y")]
    pub value: i64,
}

/// Typed view of a report stats payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub chart_style: ChartType,
    #[serde(default)]
    pub data: Vec<ReportDataPoint>,
    #[serde(default)]
    pub report_name: CompactString,
    #[serde(default)]
    pub report_type: CompactString,
}

impl TryFrom<JsonMap> for ReportResponse {
    type Error = serde_json::Error;

    fn try_from(map: JsonMap) -> Result<Self, Self::Error> {
        serde_json::from_value(serde_json::Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_subscriber_input_omits_empty_fields() {
        let input = SubscriberInput::new("user@example.com");
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json, json!({ "email": "user@example.com" }));
    }

    #[test]
    fn test_subscriber_data_tolerates_sparse_payload() {
        let data: SubscriberData = serde_json::from_value(json!({
            "id": "123",
            "type": "visitors",
            "attributes": { "email": "user@example.com" }
        }))
        .unwrap();

        assert_eq!(data.id.as_str(), "123");
        assert_eq!(data.attributes.email, "user@example.com");
        assert!(data.attributes.cached_tag_ids.is_empty());
        assert!(data.attributes.unsubscribed_at.is_none());
    }

    #[test]
    fn test_command_type_parsing() {
        for cmd in CommandType::ALL {
            assert_eq!(cmd.as_str().parse::<CommandType>().unwrap(), cmd);
            assert_eq!(serde_json::to_value(cmd).unwrap(), json!(cmd.as_str()));
        }

        let err = "explode".parse::<CommandType>().unwrap_err();
        assert!(matches!(err, BentoError::InvalidRequest(_)));
        assert!(CommandData::parse("ADD_TAG", "a@b.com", "vip").is_err());
    }

    #[test]
    fn test_broadcast_type_wire_names() {
        assert_eq!(serde_json::to_value(BroadcastType::Plain).unwrap(), json!("plain"));
        assert_eq!(serde_json::to_value(BroadcastType::Raw).unwrap(), json!("raw"));
    }

    #[test]
    fn test_validation_data_wire_names() {
        let data = ValidationData {
            email_address: "a@b.com".into(),
            full_name: Some("Ada".into()),
            user_agent: None,
            ip_address: Some("1.1.1.1".into()),
        };

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "email": "a@b.com", "name": "Ada", "ip": "1.1.1.1" })
        );
    }

    #[test]
    fn test_report_response_from_map() {
        let map = json!({
            "chart_style": "line_chart",
            "data": [{ "g": "opens", "x": "2024-01-01", "y": 12 }],
            "report_name": "Opens",
            "report_type": "Reporting::Reports::Opens"
        });
        let serde_json::Value::Object(map) = map else { unreachable!() };

        let report = ReportResponse::try_from(map).unwrap();
        assert_eq!(report.chart_style, ChartType::Line);
        assert_eq!(report.data[0].value, 12);
        assert_eq!(report.data[0].group, "opens");
    }

    #[test]
    fn test_unknown_chart_type_is_rejected() {
        let map = json!({ "chart_style": "pie", "data": [] });
        let serde_json::Value::Object(map) = map else { unreachable!() };

        assert!(ReportResponse::try_from(map).is_err());
    }

    #[test]
    fn test_sparse_records_decode() {
        let field: FieldData = serde_json::from_value(json!({
            "id": "9",
            "attributes": { "key": "plan", "created_at": null }
        }))
        .unwrap();
        assert_eq!(field.attributes.key, "plan");
        assert!(field.attributes.created_at.is_none());

        let field: FieldData = serde_json::from_value(json!({ "id": "9", "attributes": {} })).unwrap();
        assert!(field.attributes.created_at.is_none());

        let tag: TagData = serde_json::from_value(json!({})).unwrap();
        assert!(tag.id.as_str().is_empty());
        assert!(tag.attributes.name.is_empty());

        let broadcast: BroadcastData =
            serde_json::from_value(json!({ "name": "Spring launch" })).unwrap();
        assert_eq!(broadcast.name, "Spring launch");
        assert!(broadcast.from.email.is_empty());
    }

    #[test]
    fn test_field_data_decodes_timestamp() {
        let field: FieldData = serde_json::from_value(json!({
            "id": "9",
            "type": "visitors-fields",
            "attributes": {
                "name": "Plan",
                "key": "plan",
                "whitelisted": null,
                "created_at": "2024-01-01T00:00:00Z"
            }
        }))
        .unwrap();

        assert_eq!(field.attributes.key, "plan");
        assert_eq!(
            field.attributes.created_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
    }
}
