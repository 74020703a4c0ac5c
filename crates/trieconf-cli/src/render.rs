// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Printable views of sections.

use serde::Serialize;
use std::io::{self, Write};
use trieconf_core::{Section, SectionKind};

/// Section as shown by `lookup` and `routes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary<'a> {
    pub route: &'a str,
    pub resource_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub kind: SectionKind,
    pub children: Vec<&'a str>,
}

impl<'a> From<&'a Section> for SectionSummary<'a> {
    fn from(section: &'a Section) -> Self {
        SectionSummary {
            route: section.route().unwrap_or_default(),
            resource_id: section.resource_id(),
            name: section.name(),
            kind: section.kind(),
            children: section.children().iter().map(Section::resource_id).collect(),
        }
    }
}

pub fn write_summary_text<W: Write>(out: &mut W, summary: &SectionSummary<'_>) -> io::Result<()> {
    writeln!(out, "route:    {}", summary.route)?;
    writeln!(out, "id:       {}", summary.resource_id)?;
    if let Some(name) = summary.name {
        writeln!(out, "name:     {}", name)?;
    }
    writeln!(out, "kind:     {}", summary.kind)?;
    if !summary.children.is_empty() {
        writeln!(out, "children: {}", summary.children.join(", "))?;
    }
    Ok(())
}

/// One line per section: route, then kind, tab separated
pub fn write_routes_text<'a, W, I>(out: &mut W, sections: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Section>,
{
    for section in sections {
        writeln!(out, "{}\t{}", section.route().unwrap_or_default(), section.kind())?;
    }
    Ok(())
}

pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
