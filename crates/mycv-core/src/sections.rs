//! # Typed Section Accessors
//!
//! The well-known CV sections and their expected shapes. Accessors are
//! projections over [`CvRecord::get_section`]: an absent section, an
//! explicit null, or a section of the wrong shape all yield the empty
//! default for that section's shape. Accessors never fail.

use std::fmt;

use crate::record::{CvRecord, Mapping, SectionContent};

static EMPTY_MAPPING: Mapping = Mapping::new();

/// Shape a well-known section is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// A single mapping (e.g. `personal_info`).
    Mapping,
    /// A list of entries (e.g. `education`).
    Sequence,
}

/// Sections every theme knows how to lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownSection {
    PersonalInfo,
    About,
    Education,
    Experience,
    Skills,
    Projects,
    Certificates,
    Presentations,
}

impl KnownSection {
    /// All well-known sections in conventional display order.
    pub const ALL: [KnownSection; 8] = [
        KnownSection::PersonalInfo,
        KnownSection::About,
        KnownSection::Education,
        KnownSection::Experience,
        KnownSection::Skills,
        KnownSection::Projects,
        KnownSection::Certificates,
        KnownSection::Presentations,
    ];

    /// Heading used as the top-level key in data files.
    pub fn heading(&self) -> &'static str {
        match self {
            KnownSection::PersonalInfo => "personal_info",
            KnownSection::About => "about",
            KnownSection::Education => "education",
            KnownSection::Experience => "experience",
            KnownSection::Skills => "skills",
            KnownSection::Projects => "projects",
            KnownSection::Certificates => "certificates",
            KnownSection::Presentations => "presentations",
        }
    }

    pub fn shape(&self) -> SectionShape {
        match self {
            KnownSection::PersonalInfo | KnownSection::About | KnownSection::Skills => {
                SectionShape::Mapping
            }
            _ => SectionShape::Sequence,
        }
    }

    /// Parse a heading back into a well-known section.
    pub fn from_heading(heading: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.heading() == heading)
    }
}

impl fmt::Display for KnownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

impl CvRecord {
    fn mapping_section(&self, section: KnownSection) -> &Mapping {
        match self.get_section(section.heading()) {
            Some(SectionContent::Mapping(m)) => m,
            None => &EMPTY_MAPPING,
            Some(c) if c.is_null() => &EMPTY_MAPPING,
            Some(other) => {
                tracing::warn!(
                    section = %section,
                    found = other.kind_name(),
                    "section is not a mapping; treating it as empty"
                );
                &EMPTY_MAPPING
            }
        }
    }

    fn sequence_section(&self, section: KnownSection) -> &[SectionContent] {
        match self.get_section(section.heading()) {
            Some(SectionContent::Sequence(items)) => items,
            None => &[],
            Some(c) if c.is_null() => &[],
            Some(other) => {
                tracing::warn!(
                    section = %section,
                    found = other.kind_name(),
                    "section is not a sequence; treating it as empty"
                );
                &[]
            }
        }
    }

    /// Name, email, phone, links.
    pub fn personal_info(&self) -> &Mapping {
        self.mapping_section(KnownSection::PersonalInfo)
    }

    /// Free-form summary.
    pub fn about(&self) -> &Mapping {
        self.mapping_section(KnownSection::About)
    }

    pub fn education(&self) -> &[SectionContent] {
        self.sequence_section(KnownSection::Education)
    }

    pub fn experience(&self) -> &[SectionContent] {
        self.sequence_section(KnownSection::Experience)
    }

    /// Skill groups, e.g. `languages` and `technologies`.
    pub fn skills(&self) -> &Mapping {
        self.mapping_section(KnownSection::Skills)
    }

    pub fn projects(&self) -> &[SectionContent] {
        self.sequence_section(KnownSection::Projects)
    }

    pub fn certificates(&self) -> &[SectionContent] {
        self.sequence_section(KnownSection::Certificates)
    }

    pub fn presentations(&self) -> &[SectionContent] {
        self.sequence_section(KnownSection::Presentations)
    }
}
