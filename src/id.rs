use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct SubscriberId {
    value: CompactString,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct TagId {
    value: CompactString,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct FieldId {
    value: CompactString,
}

impl SubscriberId {
    pub fn new(id: impl Into<CompactString>) -> Self { Self { value: id.into() } }
    pub fn as_str(&self) -> &str { &self.value }
    pub fn is_empty(&self) -> bool { self.value.is_empty() }
}

impl TagId {
    pub fn new(id: impl Into<CompactString>) -> Self { Self { value: id.into() } }
    pub fn as_str(&self) -> &str { &self.value }
}

impl FieldId {
    pub fn new(id: impl Into<CompactString>) -> Self { Self { value: id.into() } }
    pub fn as_str(&self) -> &str { &self.value }
}

/// Bento ids are strings, but some payloads carry them as bare numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(CompactString),
    Number(u64),
    Null(()),
}

impl From<RawId> for CompactString {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => compact_str::format_compact!("{n}"),
            RawId::Null(()) => CompactString::default(),
        }
    }
}

impl<'de> Deserialize<'de> for SubscriberId {
    fn deserialize<D>(deserializer: D) -> Result<SubscriberId, D::Error>
        where D: Deserializer<'de>,
    {
        let id = RawId::deserialize(deserializer)?;
        Ok(SubscriberId::new(id))
    }
}

impl<'de> Deserialize<'de> for TagId {
    fn deserialize<D>(deserializer: D) -> Result<TagId, D::Error>
        where D: Deserializer<'de>,
    {
        let id = RawId::deserialize(deserializer)?;
        Ok(TagId::new(id))
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D>(deserializer: D) -> Result<FieldId, D::Error>
        where D: Deserializer<'de>,
    {
        let id = RawId::deserialize(deserializer)?;
        Ok(FieldId::new(id))
    }
}

impl Serialize for SubscriberId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl Serialize for TagId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
