//! The wire element: the single serialization primitive of the protocol.
//!
//! Every request and every reply is a [`WireElement`]: a tag, an ordered set
//! of string attributes, and optional children. Nothing is typed at this
//! level. A message type reads the attributes it declares and converts them
//! itself, so decoding a frame into an element never depends on what the
//! element means.
//!
//! ```text
//! { "tag": "unloadGoods",
//!   "attributes": { "type": "model.goods.sugar", "amount": "5", "carrier": "unit:12" } }
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Upper bound on the capacity reserved up front while decoding, so a
/// bogus size hint cannot force a large allocation.
const MAX_PREALLOCATED_ATTRIBUTES: usize = 16;

/// An insertion-ordered map of attribute name to string value.
///
/// Keys are unique. Inserting an existing key replaces its value in place,
/// and decoding a frame that repeats a key fails. Order is kept so that
/// encoding the same element twice yields the same bytes.
///
/// Lookups are linear. Protocol elements carry a handful of attributes,
/// where a scan beats hashing. Decoding is not: a frame can carry as many
/// keys as fit in it, so duplicates are caught with a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, or `None` if the attribute is absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets `name` to `value`, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((name, value));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string attributes")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Attributes, A::Error> {
                let capacity = access
                    .size_hint()
                    .unwrap_or(0)
                    .min(MAX_PREALLOCATED_ATTRIBUTES);
                let mut pairs: Vec<(String, String)> = Vec::with_capacity(capacity);
                let mut seen: HashSet<String> = HashSet::with_capacity(capacity);
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    if !seen.insert(name.clone()) {
                        return Err(de::Error::custom(format_args!(
                            "duplicate attribute `{name}`"
                        )));
                    }
                    pairs.push((name, value));
                }
                Ok(Attributes(pairs))
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

// ---------------------------------------------------------------------------
// WireElement
// ---------------------------------------------------------------------------

/// A tagged tree node with string attributes.
///
/// `children` is part of the general contract (update replies carry one
/// child per changed object) but the request messages only use the flat
/// tag + attributes level. It is left out of the JSON when empty and
/// defaults to empty when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireElement {
    tag: String,

    #[serde(default)]
    attributes: Attributes,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<WireElement>,
}

impl WireElement {
    /// Creates an element with no attributes and no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builds an element from a tag and ordered `(name, value)` pairs.
    ///
    /// A repeated name keeps its first position and its last value.
    pub fn encode<I, K, V>(tag: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut element = Self::new(tag);
        for (name, value) in pairs {
            element.attributes.insert(name, value);
        }
        element
    }

    /// Builder-style [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Builder-style [`push_child`](Self::push_child).
    pub fn with_child(mut self, child: WireElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the attribute value, or `None` when it is absent.
    ///
    /// Absence is not an error here. Whoever interprets the value decides
    /// whether a missing attribute is acceptable.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name, value);
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[WireElement] {
        &self.children
    }

    pub fn push_child(&mut self, child: WireElement) {
        self.children.push(child);
    }

    /// Returns the first child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&WireElement> {
        self.children.iter().find(|c| c.tag == tag)
    }
}
