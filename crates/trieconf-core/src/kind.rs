// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Section type vocabulary.

use crate::TrieError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of section kinds, decoded from the `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SectionKind {
    /// Generic container of further sections (`section`)
    #[default]
    Collection,
    /// Leaf entry (`item`)
    Item,
    /// Topic backed by the content management system (`wcmstopic`)
    CmsTopic,
    /// Topic fed by the recommendations engine (`recommendations`)
    RecommendationsTopic,
    /// Content listing of a topic (`topiccontent`)
    TopicContent,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Collection,
        SectionKind::Item,
        SectionKind::CmsTopic,
        SectionKind::RecommendationsTopic,
        SectionKind::TopicContent,
    ];

    /// Token used for this kind in configuration documents.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Collection => "section",
            SectionKind::Item => "item",
            SectionKind::CmsTopic => "wcmstopic",
            SectionKind::RecommendationsTopic => "recommendations",
            SectionKind::TopicContent => "topiccontent",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionKind {
    type Err = TrieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "section" => Ok(SectionKind::Collection),
            "item" => Ok(SectionKind::Item),
            "wcmstopic" => Ok(SectionKind::CmsTopic),
            "recommendations" => Ok(SectionKind::RecommendationsTopic),
            "topiccontent" => Ok(SectionKind::TopicContent),
            _ => Err(TrieError::UnknownSectionType(s.to_string())),
        }
    }
}

impl Serialize for SectionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_token_case_insensitively() {
        assert_eq!("section".parse::<SectionKind>().unwrap(), SectionKind::Collection);
        assert_eq!("ITEM".parse::<SectionKind>().unwrap(), SectionKind::Item);
        assert_eq!("WcmsTopic".parse::<SectionKind>().unwrap(), SectionKind::CmsTopic);
        assert_eq!(
            "Recommendations".parse::<SectionKind>().unwrap(),
            SectionKind::RecommendationsTopic
        );
        assert_eq!("topicContent".parse::<SectionKind>().unwrap(), SectionKind::TopicContent);
    }

    #[test]
    fn rejects_unknown_tokens() {
        for token in ["bogus", "", "collection", "sections", " item"] {
            match token.parse::<SectionKind>() {
                Err(TrieError::UnknownSectionType(t)) => assert_eq!(t, token),
                other => panic!("expected UnknownSectionType for {token:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.to_string().parse::<SectionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn default_is_collection() {
        assert_eq!(SectionKind::default(), SectionKind::Collection);
    }

    #[test]
    fn serde_uses_document_tokens() {
        let kind: SectionKind = serde_json::from_str(r#""TopicContent""#).unwrap();
        assert_eq!(kind, SectionKind::TopicContent);
        assert_eq!(serde_json::to_string(&SectionKind::CmsTopic).unwrap(), r#""wcmstopic""#);
        assert!(serde_json::from_str::<SectionKind>(r#""bogus""#).is_err());
    }
}
