//! Document segmenter: one linear pass over the generated text, routing each
//! line into the active section's accumulator.
//!
//! Keyword lines move the section pointer and are dropped. Whether a heading's
//! own text (e.g. "Experience: 8 years") belongs to the old or new section is
//! an open product question; until it is decided the text is discarded.

use serde::{Deserialize, Serialize};

use crate::document::classifier::{classify_line, SectionTag};

/// Six-section decomposition of a resume's generated text. Every field is
/// trimmed and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub header: String,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
    pub certifications: String,
}

impl StructuredDocument {
    pub fn section(&self, tag: SectionTag) -> &str {
        match tag {
            SectionTag::Header => &self.header,
            SectionTag::Summary => &self.summary,
            SectionTag::Experience => &self.experience,
            SectionTag::Education => &self.education,
            SectionTag::Skills => &self.skills,
            SectionTag::Certifications => &self.certifications,
        }
    }
}

/// Untrimmed per-section accumulation, indexed by `SectionTag::index`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulators([String; 6]);

impl Accumulators {
    #[cfg(test)]
    pub fn get(&self, tag: SectionTag) -> &str {
        &self.0[tag.index()]
    }

    fn into_document(self) -> StructuredDocument {
        let [header, summary, experience, education, skills, certifications] =
            self.0.map(|s| s.trim().to_string());
        StructuredDocument {
            header,
            summary,
            experience,
            education,
            skills,
            certifications,
        }
    }
}

/// Accumulates lines without trimming. Each kept line is appended with its
/// `\n` terminator.
pub fn accumulate(raw: &str) -> Accumulators {
    let mut acc = Accumulators::default();
    let mut current = SectionTag::Header;

    for line in raw.split('\n') {
        match classify_line(line) {
            Some(tag) => current = tag,
            None => {
                let buf = &mut acc.0[current.index()];
                buf.push_str(line);
                buf.push('\n');
            }
        }
    }

    acc
}

/// Segments generated resume text into a `StructuredDocument`.
pub fn segment(raw: &str) -> StructuredDocument {
    accumulate(raw).into_document()
}
