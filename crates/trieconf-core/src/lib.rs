// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Section trie built from nested JSON configuration.
//!
//! A configuration document is a tree of sections:
//!
//! ```json
//! { "name": "root", "section": [ { "name": "News 24", "type": "item" } ] }
//! ```
//!
//! Each section gets a lookup identifier derived from its `resourceId` or
//! `name` (`"News 24"` becomes `news_24`) and a kind from its `type`. The
//! [`ConfigIndex`] decodes the whole document once, assigns every section its
//! route and then resolves request paths such as `/news_24` against it. The
//! verbatim JSON of each section is kept so callers can project fields the
//! section schema does not know about into their own types.
//!
//! ```
//! use trieconf_core::ConfigIndex;
//!
//! let index: ConfigIndex =
//!     r#"{ "name": "root", "section": [ { "name": "News 24", "imgurl": "http://x" } ] }"#
//!         .parse()?;
//! let news = index.lookup("/news_24")?;
//! assert_eq!(news.route(), Some("/news_24"));
//! # Ok::<(), trieconf_core::TrieError>(())
//! ```

pub mod identifier;

mod error;
mod index;
mod kind;
mod section;

pub use error::{Result, TrieError};
pub use index::{BuildOptions, ConfigIndex};
pub use kind::SectionKind;
pub use section::{Section, Walk, MAX_SECTION_DEPTH, ROOT_ROUTE};
