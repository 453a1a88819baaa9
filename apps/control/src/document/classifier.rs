//! Section classifier: maps one line of generated resume text to a section tag.

use serde::{Deserialize, Serialize};

/// The six sections of a structured resume, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTag {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
}

impl SectionTag {
    pub const ALL: [SectionTag; 6] = [
        SectionTag::Header,
        SectionTag::Summary,
        SectionTag::Experience,
        SectionTag::Education,
        SectionTag::Skills,
        SectionTag::Certifications,
    ];

    pub fn index(self) -> usize {
        match self {
            SectionTag::Header => 0,
            SectionTag::Summary => 1,
            SectionTag::Experience => 2,
            SectionTag::Education => 3,
            SectionTag::Skills => 4,
            SectionTag::Certifications => 5,
        }
    }
}

/// Keyword rules in priority order. The first rule with a matching keyword
/// wins, so this order decides every ambiguous line. Do not reorder.
///
/// "technical skills" is subsumed by "skills" but is kept so the rule reads
/// the way the section headings are written.
const RULES: &[(SectionTag, &[&str])] = &[
    (SectionTag::Experience, &["experience"]),
    (SectionTag::Education, &["education"]),
    (SectionTag::Skills, &["technical skills", "skills"]),
    (SectionTag::Certifications, &["certification", "awards"]),
    (SectionTag::Summary, &["summary", "objective"]),
];

/// Classifies a line by case-insensitive substring match.
///
/// Returns `None` when no keyword matches, meaning the active section is kept
/// and the line belongs to it. `Header` is never returned: it is only the
/// starting section.
pub fn classify_line(line: &str) -> Option<SectionTag> {
    let lower = line.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(tag, _)| *tag)
}
