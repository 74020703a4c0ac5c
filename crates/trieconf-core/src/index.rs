// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Read-only index over a decoded section trie.

use crate::section::{join_route, ROOT_ROUTE};
use crate::{Result, Section, TrieError};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::io::Read;

/// Knobs applied while building a [`ConfigIndex`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Reject parents whose children share an identifier. When off, lookups
    /// silently resolve to the first of the duplicates.
    pub unique_siblings: bool,
}

/// Owns the root of a section trie and answers path lookups against it.
///
/// The trie is complete (every section has its route) before an index is
/// handed out and is never modified afterwards, so an index can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct ConfigIndex {
    root: Section,
}

impl ConfigIndex {
    /// Build an index from a JSON document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, &BuildOptions::default())
    }

    pub fn from_reader_with<R: Read>(reader: R, options: &BuildOptions) -> Result<Self> {
        Self::build(Section::from_reader(reader)?, options)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_slice_with(bytes, &BuildOptions::default())
    }

    pub fn from_slice_with(bytes: &[u8], options: &BuildOptions) -> Result<Self> {
        Self::build(Section::from_slice(bytes)?, options)
    }

    /// Finish a decoded trie: check it against `options`, then assign routes.
    fn build(mut root: Section, options: &BuildOptions) -> Result<Self> {
        if options.unique_siblings {
            check_unique_siblings(&root)?;
        }
        root.materialize_routes(ROOT_ROUTE.to_string());

        let index = ConfigIndex { root };
        tracing::debug!(
            sections = index.len(),
            root = index.root.resource_id(),
            "built section trie"
        );
        Ok(index)
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Number of sections in the trie, root included, so never zero.
    ///
    /// Not the counterpart of [`is_empty`](Self::is_empty): an index over a
    /// bare root has `len() == 1` and `is_empty() == true`.
    pub fn len(&self) -> usize {
        self.root.walk().count()
    }

    /// True when the root has no children, i.e. there is nothing to look up.
    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    /// Resolve a request path such as `/applications/news/section1`.
    ///
    /// Everything before the first `/` is discarded; at least one segment
    /// must remain. The section is only returned when every segment matched,
    /// otherwise the error names the requested final segment and the section
    /// where resolution stopped.
    pub fn lookup(&self, request_path: &str) -> Result<&Section> {
        let segments: Vec<&str> = request_path.split('/').skip(1).collect();
        let Some(&end_segment) = segments.last() else {
            return Err(TrieError::MalformedPath {
                path: request_path.to_string(),
            });
        };

        let found = self.root.traverse(&segments);
        let requested_route = segments
            .iter()
            .fold(ROOT_ROUTE.to_string(), |route, segment| join_route(&route, segment));

        if found.resource_id() != end_segment || found.route() != Some(requested_route.as_str()) {
            tracing::debug!(
                request_path,
                found = found.resource_id(),
                "section lookup stopped short"
            );
            return Err(TrieError::NotFound {
                requested: end_segment.to_string(),
                found: found.resource_id().to_string(),
            });
        }

        Ok(found)
    }

    /// Look a section up and project its payload into `T`.
    pub fn lookup_as<T: DeserializeOwned>(&self, request_path: &str) -> Result<T> {
        self.lookup(request_path)?.project()
    }
}

impl std::str::FromStr for ConfigIndex {
    type Err = TrieError;

    fn from_str(json: &str) -> Result<Self> {
        Self::from_slice(json.as_bytes())
    }
}

fn check_unique_siblings(root: &Section) -> Result<()> {
    for parent in root.walk() {
        let mut seen = HashSet::new();
        for child in parent.children() {
            if !seen.insert(child.resource_id()) {
                return Err(TrieError::DuplicateSibling {
                    parent: parent.resource_id().to_string(),
                    resource_id: child.resource_id().to_string(),
                });
            }
        }
    }
    Ok(())
}
