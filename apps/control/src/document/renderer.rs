//! Document renderer: fixed-order layout of a `StructuredDocument`.

use serde::Serialize;

use crate::document::classifier::SectionTag;
use crate::document::segmenter::StructuredDocument;

/// How a block body should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyStyle {
    /// Reflowed paragraph text.
    Flowing,
    /// Line breaks are significant.
    Preformatted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    pub section: SectionTag,
    pub title: Option<&'static str>,
    pub body: String,
    pub style: BodyStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub blocks: Vec<RenderedBlock>,
}

fn title_for(tag: SectionTag) -> Option<&'static str> {
    match tag {
        SectionTag::Header => None,
        SectionTag::Summary => Some("PROFESSIONAL SUMMARY"),
        SectionTag::Experience => Some("EXPERIENCE"),
        SectionTag::Education => Some("EDUCATION"),
        SectionTag::Skills => Some("TECHNICAL SKILLS"),
        SectionTag::Certifications => Some("CERTIFICATIONS & AWARDS"),
    }
}

/// Lays out the header (always) followed by every non-empty section.
pub fn render_document(doc: &StructuredDocument) -> RenderedDocument {
    let blocks = SectionTag::ALL
        .iter()
        .filter(|tag| **tag == SectionTag::Header || !doc.section(**tag).trim().is_empty())
        .map(|tag| RenderedBlock {
            section: *tag,
            title: title_for(*tag),
            body: doc.section(*tag).trim().to_string(),
            style: if *tag == SectionTag::Summary {
                BodyStyle::Flowing
            } else {
                BodyStyle::Preformatted
            },
        })
        .collect();

    RenderedDocument { blocks }
}

impl RenderedDocument {
    /// Plain-text rendering: each titled block gets its heading and a rule.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if !out.is_empty() {
                out.push('\n');
            }
            if let Some(title) = block.title {
                out.push_str(title);
                out.push('\n');
                out.push_str(&"-".repeat(title.chars().count()));
                out.push('\n');
            }
            out.push_str(&block.body);
            out.push('\n');
        }
        out
    }
}
