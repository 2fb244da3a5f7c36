use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::render::render_resume_md;
use crate::form::repeater::{Section, SectionList};

/// The repeatable blocks of the resume form, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Education,
    Achievements,
    Projects,
    Skills,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Achievements,
        SectionKind::Projects,
        SectionKind::Skills,
    ];

    /// Field schema shared by every section of this kind.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            SectionKind::Experience => &[
                "title",
                "organization",
                "location",
                "start_date",
                "end_date",
                "description",
            ],
            SectionKind::Education => &[
                "school",
                "degree",
                "city",
                "start_date",
                "graduation_date",
                "description",
            ],
            SectionKind::Achievements => &["title", "description"],
            SectionKind::Projects => &["name", "link", "description"],
            SectionKind::Skills => &["skill"],
        }
    }

    /// Fields joined into the entry heading when rendered.
    pub fn headline(self) -> &'static [&'static str] {
        match self {
            SectionKind::Experience => &["title", "organization"],
            SectionKind::Education => &["degree", "school"],
            SectionKind::Achievements => &["title"],
            SectionKind::Projects => &["name"],
            SectionKind::Skills => &["skill"],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Achievements => "Achievements",
            SectionKind::Projects => "Projects",
            SectionKind::Skills => "Skills",
        }
    }

    fn position(self) -> usize {
        match self {
            SectionKind::Experience => 0,
            SectionKind::Education => 1,
            SectionKind::Achievements => 2,
            SectionKind::Projects => 3,
            SectionKind::Skills => 4,
        }
    }
}

/// Non-repeated top-level fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub designation: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
}

impl Profile {
    fn set(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "designation" => &mut self.designation,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address" => &mut self.address,
            "summary" => &mut self.summary,
            _ => return false,
        };
        if *slot == value {
            return false;
        }
        *slot = value.to_string();
        true
    }
}

/// A single user action against the form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormOp {
    AddSection {
        section: SectionKind,
    },
    RemoveSection {
        section: SectionKind,
        index: usize,
    },
    SetField {
        section: SectionKind,
        index: usize,
        field: String,
        value: String,
    },
    SetProfile {
        field: String,
        value: String,
    },
}

/// The whole resume form plus its derived preview.
///
/// Every mutation that changes state regenerates the preview; no-op
/// mutations leave it, and the regeneration count, untouched.
#[derive(Debug, Clone)]
pub struct ResumeForm {
    profile: Profile,
    sections: [SectionList; 5],
    preview: String,
    regenerations: u64,
}

impl Default for ResumeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeForm {
    /// Fresh form: empty profile, one empty section per kind, preview rendered.
    pub fn new() -> Self {
        let mut form = Self {
            profile: Profile::default(),
            sections: SectionKind::ALL.map(|kind| SectionList::new(kind.fields())),
            preview: String::new(),
            regenerations: 0,
        };
        form.preview = render_resume_md(&form);
        form
    }

    /// Rebuilds a form from submitted state. Fields outside a section's schema
    /// are dropped; a kind with no entries keeps its single empty section.
    /// Restoring is not a user mutation and does not count as a regeneration.
    pub fn restore(profile: Profile, sections: &BTreeMap<SectionKind, Vec<Section>>) -> Self {
        let mut form = Self::new();
        form.profile = profile;
        for (kind, entries) in sections {
            let list = &mut form.sections[kind.position()];
            for (i, entry) in entries.iter().enumerate() {
                let index = if i == 0 { 0 } else { list.add_section() };
                for (field, value) in entry {
                    list.set_field(index, field, value);
                }
            }
        }
        form.preview = render_resume_md(&form);
        form
    }

    /// Section contents keyed by kind, in document order.
    pub fn snapshot(&self) -> BTreeMap<SectionKind, Vec<Section>> {
        SectionKind::ALL
            .into_iter()
            .map(|kind| (kind, self.section(kind).sections().to_vec()))
            .collect()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn section(&self, kind: SectionKind) -> &SectionList {
        &self.sections[kind.position()]
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    pub fn set_profile(&mut self, field: &str, value: &str) -> bool {
        let changed = self.profile.set(field, value);
        if changed {
            self.regenerate();
        }
        changed
    }

    pub fn add_section(&mut self, kind: SectionKind) -> usize {
        let index = self.sections[kind.position()].add_section();
        self.regenerate();
        index
    }

    pub fn remove_section(&mut self, kind: SectionKind, index: usize) -> bool {
        let removed = self.sections[kind.position()].remove_section(index);
        if removed {
            self.regenerate();
        }
        removed
    }

    pub fn set_field(&mut self, kind: SectionKind, index: usize, field: &str, value: &str) -> bool {
        let changed = self.sections[kind.position()].set_field(index, field, value);
        if changed {
            self.regenerate();
        }
        changed
    }

    /// Applies one action; returns whether it changed the form.
    pub fn apply(&mut self, op: &FormOp) -> bool {
        match op {
            FormOp::AddSection { section } => {
                self.add_section(*section);
                true
            }
            FormOp::RemoveSection { section, index } => self.remove_section(*section, *index),
            FormOp::SetField {
                section,
                index,
                field,
                value,
            } => self.set_field(*section, *index, field, value),
            FormOp::SetProfile { field, value } => self.set_profile(field, value),
        }
    }

    /// Rebuilds the preview document from the current form state.
    pub fn regenerate(&mut self) {
        self.preview = render_resume_md(self);
        self.regenerations += 1;
    }
}
