// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Canonical section identifiers.

/// Separator substituted for every whitespace character.
pub const SEPARATOR: char = '_';

/// Normalize a display name or `resourceId` override into a lookup identifier.
///
/// Every character is lowercased and every Unicode whitespace character is
/// replaced by [`SEPARATOR`], one for one. Nothing else is touched, so
/// punctuation and non-ASCII letters survive.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { SEPARATOR } else { c })
        .collect()
}
