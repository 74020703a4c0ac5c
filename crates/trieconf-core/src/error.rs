// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

/// Convenient result alias for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;

/// Errors that can occur while building or querying a section trie.
#[derive(Debug, Error)]
pub enum TrieError {
    /// Malformed JSON, or a known field holding the wrong JSON type.
    #[error("Section decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The `type` field held a token outside the section vocabulary.
    #[error("Section parse error: unrecognized section type {0:?}")]
    UnknownSectionType(String),

    /// Sections nested deeper than the decoder accepts.
    #[error("Section nesting exceeds the maximum depth of {limit}")]
    TooDeep { limit: usize },

    /// Two children of the same parent normalized to one identifier.
    #[error("Duplicate section {resource_id:?} under {parent:?}")]
    DuplicateSibling { parent: String, resource_id: String },

    /// Lookup path without a single usable segment.
    #[error("Request path {path:?} does not contain enough path segments")]
    MalformedPath { path: String },

    /// Resolution stopped short of the requested section.
    #[error("Found section {found:?}, which does not match requested segment {requested:?}")]
    NotFound { requested: String, found: String },

    /// The raw payload does not fit the requested shape.
    #[error("Projection of section {route:?} failed: {source}")]
    Projection {
        route: String,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

impl TrieError {
    /// True for the lookup-time errors; build errors return false.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, TrieError::MalformedPath { .. } | TrieError::NotFound { .. })
    }
}
