//! Typed document attributes.
//!
//! Only a handful of attribute names carry meaning for the blog pages; they are
//! modelled by [`AttributeKey`]. Anything else read from a document header is
//! kept verbatim in [`Attributes::other`] and handed to the layouts.

use serde::{Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;

/// Layout used when a page does not declare `page-layout`.
pub const DEFAULT_LAYOUT: &str = "default";

/// Recognized attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKey {
    /// `page-layout`: layout template name.
    PageLayout,
    /// `page-tags`: comma-separated tags on articles, the full tag list on the index.
    PageTags,
    /// `page-tag`: the tag a tag page lists.
    PageTag,
    /// `page-aliases`: comma-separated former page paths, turned into redirects.
    PageAliases,
}

impl AttributeKey {
    pub const ALL: [Self; 4] = [
        Self::PageLayout,
        Self::PageTags,
        Self::PageTag,
        Self::PageAliases,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::PageLayout => "page-layout",
            Self::PageTags => "page-tags",
            Self::PageTag => "page-tag",
            Self::PageAliases => "page-aliases",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

/// Attribute value: raw header text or a list built by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// Comma-separated entries (or list items), trimmed, empty ones dropped.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .collect(),
            Self::List(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|entry| !entry.is_empty())
                .collect(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Attribute block of a content item or page descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    known: BTreeMap<AttributeKey, AttributeValue>,
    other: BTreeMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a recognized attribute.
    pub fn with(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> Self {
        self.known.insert(key, value.into());
        self
    }

    /// Insert an attribute read from a document header.
    pub fn insert(&mut self, name: &str, value: String) {
        match AttributeKey::parse(name) {
            Some(key) => {
                self.known.insert(key, AttributeValue::Text(value));
            }
            None => {
                self.other.insert(name.to_owned(), value);
            }
        }
    }

    pub fn get(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.known.get(&key)
    }

    #[cfg(test)]
    pub fn contains(&self, key: AttributeKey) -> bool {
        self.known.contains_key(&key)
    }

    /// Declared layout, `default` when absent or blank.
    pub fn layout(&self) -> &str {
        self.get(AttributeKey::PageLayout)
            .and_then(AttributeValue::as_text)
            .map(str::trim)
            .filter(|layout| !layout.is_empty())
            .unwrap_or(DEFAULT_LAYOUT)
    }

    /// Tags from `page-tags`; empty when absent.
    pub fn tags(&self) -> Vec<&str> {
        self.entries(AttributeKey::PageTags)
    }

    /// Aliases from `page-aliases`; empty when absent.
    pub fn aliases(&self) -> Vec<&str> {
        self.entries(AttributeKey::PageAliases)
    }

    fn entries(&self, key: AttributeKey) -> Vec<&str> {
        self.get(key).map(AttributeValue::entries).unwrap_or_default()
    }

    /// Unrecognized header attributes.
    #[cfg(test)]
    pub fn other(&self) -> &BTreeMap<String, String> {
        &self.other
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.known.len() + self.other.len()))?;
        for (name, value) in &self.other {
            map.serialize_entry(name, value)?;
        }
        for (key, value) in &self.known {
            map.serialize_entry(key.name(), value)?;
        }
        map.end()
    }
}
