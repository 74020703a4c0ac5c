// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Section nodes and their JSON decoding.

use crate::{identifier, Result, SectionKind, TrieError};
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess};
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use std::io::Read;

/// Route of the root section. The root contributes no segment of its own.
pub const ROOT_ROUTE: &str = "/";

/// Deepest section nesting accepted while decoding, the root being level 1.
pub const MAX_SECTION_DEPTH: usize = 128;

/// Known fields of a section object. Everything else stays in the raw payload.
///
/// Keys match regardless of case (`Name`, `resourceid`, `TYPE`) and a repeated
/// key replaces the earlier value.
#[derive(Default)]
struct SectionFields {
    name: Option<String>,
    resource_id: Option<String>,
    /// `Some(None)` is an explicit `"type": null`
    kind: Option<Option<String>>,
    children: Option<Vec<Box<RawValue>>>,
}

impl<'de> Deserialize<'de> for SectionFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> de::Visitor<'de> for FieldsVisitor {
            type Value = SectionFields;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a section object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut fields = SectionFields::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.to_lowercase().as_str() {
                        // null leaves an earlier value in place
                        "name" => {
                            if let Some(name) = map.next_value::<Option<String>>()? {
                                fields.name = Some(name);
                            }
                        }
                        "resourceid" => {
                            if let Some(id) = map.next_value::<Option<String>>()? {
                                fields.resource_id = Some(id);
                            }
                        }
                        "type" => fields.kind = Some(map.next_value()?),
                        "section" => fields.children = map.next_value()?,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// One entry of the configuration trie.
#[derive(Debug, Clone)]
pub struct Section {
    name: Option<String>,
    resource_id: String,
    kind: SectionKind,
    children: Vec<Section>,
    raw: Box<RawValue>,
    route: Option<String>,
}

impl Section {
    /// Decode a section (and, recursively, its children) from a captured JSON fragment.
    ///
    /// The identifier is the `resourceId` override when present and non-empty,
    /// the `name` otherwise, and is normalized in both cases. The returned
    /// tree has no routes yet; those are assigned when a
    /// [`ConfigIndex`](crate::ConfigIndex) is built. Trees nested deeper than
    /// [`MAX_SECTION_DEPTH`] are rejected.
    pub fn from_raw(raw: Box<RawValue>) -> Result<Self> {
        Self::decode(raw, 1)
    }

    fn decode(raw: Box<RawValue>, depth: usize) -> Result<Self> {
        if depth > MAX_SECTION_DEPTH {
            return Err(TrieError::TooDeep {
                limit: MAX_SECTION_DEPTH,
            });
        }

        let fields: SectionFields = serde_json::from_str(raw.get())?;

        let kind = match fields.kind {
            None => SectionKind::default(),
            Some(Some(token)) => token.parse()?,
            Some(None) => return Err(TrieError::UnknownSectionType("null".to_string())),
        };

        let locator = match fields.resource_id {
            Some(id) if !id.is_empty() => id,
            _ => fields.name.clone().unwrap_or_default(),
        };

        let children = fields
            .children
            .unwrap_or_default()
            .into_iter()
            .map(|child| Section::decode(child, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(Section {
            name: fields.name,
            resource_id: identifier::normalize(&locator),
            kind,
            children,
            raw,
            route: None,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_raw(serde_json::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_raw(serde_json::from_reader(reader)?)
    }

    /// Human readable label, when the document carries one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Normalized identifier used for path lookups.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn children(&self) -> &[Section] {
        &self.children
    }

    /// Full route from the root, e.g. `/applications/news`.
    ///
    /// `None` for a section decoded on its own; every section reachable from
    /// a built index has one.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// The exact JSON text this section was decoded from.
    pub fn raw_json(&self) -> &str {
        self.raw.get()
    }

    /// First child carrying the given identifier.
    pub fn child(&self, resource_id: &str) -> Option<&Section> {
        self.children.iter().find(|child| child.resource_id == resource_id)
    }

    /// Follow `segments` down the trie as far as they match.
    ///
    /// Each segment is matched against the identifiers of the current
    /// section's children, first match in document order. Resolution stops at
    /// the first segment without a match and returns the section reached so
    /// far, so callers must check the result against what they asked for.
    pub fn traverse<S: AsRef<str>>(&self, segments: &[S]) -> &Section {
        let mut current = self;
        for segment in segments {
            match current.child(segment.as_ref()) {
                Some(child) => {
                    tracing::trace!(segment = segment.as_ref(), "matched section");
                    current = child;
                }
                None => break,
            }
        }
        current
    }

    /// Pre-order walk over this section and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Decode the raw payload into an arbitrary shape.
    ///
    /// Fields outside the section schema (`imgurl`, nested objects, ...) are
    /// available here since the payload is kept verbatim.
    pub fn project<T: DeserializeOwned>(&self) -> Result<T> {
        let mut de = serde_json::Deserializer::from_str(self.raw.get());
        serde_path_to_error::deserialize(&mut de).map_err(|source| TrieError::Projection {
            route: self.route.clone().unwrap_or_else(|| self.resource_id.clone()),
            source,
        })
    }

    /// Assign `route` to this section and derived routes to every descendant.
    pub(crate) fn materialize_routes(&mut self, route: String) {
        for child in &mut self.children {
            let child_route = join_route(&route, &child.resource_id);
            child.materialize_routes(child_route);
        }
        self.route = Some(route);
    }
}

impl std::str::FromStr for Section {
    type Err = TrieError;

    fn from_str(json: &str) -> Result<Self> {
        Self::from_raw(serde_json::from_str(json)?)
    }
}

impl Default for Section {
    /// Unnamed, childless collection with an empty payload.
    fn default() -> Self {
        Section {
            name: None,
            resource_id: String::new(),
            kind: SectionKind::default(),
            children: Vec::new(),
            raw: empty_object(),
            route: Some(ROOT_ROUTE.to_string()),
        }
    }
}

fn empty_object() -> Box<RawValue> {
    RawValue::from_string("{}".to_string()).expect("empty object is valid JSON")
}

/// Append one identifier to a route without doubling separators.
pub(crate) fn join_route(parent: &str, resource_id: &str) -> String {
    if resource_id.is_empty() {
        parent.to_string()
    } else if parent.ends_with('/') {
        format!("{parent}{resource_id}")
    } else {
        format!("{parent}/{resource_id}")
    }
}

/// Iterator returned by [`Section::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Section>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<Self::Item> {
        let section = self.stack.pop()?;
        self.stack.extend(section.children.iter().rev());
        Some(section)
    }
}
