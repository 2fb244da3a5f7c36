use std::collections::BTreeMap;

use serde::Serialize;

/// One repeated group of fields, keyed by field name.
pub type Section = BTreeMap<String, String>;

/// Ordered list of homogeneous sections.
///
/// Invariants: never empty; the first section cannot be removed; every
/// section carries exactly the list's field schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionList {
    #[serde(skip)]
    fields: Vec<String>,
    sections: Vec<Section>,
}

impl SectionList {
    /// A list holding a single empty section.
    pub fn new(fields: &[&str]) -> Self {
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let mut list = Self {
            fields,
            sections: Vec::new(),
        };
        list.sections.push(list.empty_section());
        list
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Appends a section with every field empty; returns its index.
    pub fn add_section(&mut self) -> usize {
        self.sections.push(self.empty_section());
        self.sections.len() - 1
    }

    /// Removes the section at `index`. The first section and out-of-range
    /// indexes are left alone; returns whether anything was removed.
    pub fn remove_section(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.sections.len() {
            return false;
        }
        self.sections.remove(index);
        true
    }

    /// Sets one field; returns whether the value changed. Unknown sections or
    /// fields outside the schema are ignored.
    pub fn set_field(&mut self, index: usize, field: &str, value: &str) -> bool {
        if !self.fields.iter().any(|f| f == field) || self.get(index, field) == Some(value) {
            return false;
        }
        match self.sections.get_mut(index) {
            Some(section) => {
                section.insert(field.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize, field: &str) -> Option<&str> {
        self.sections
            .get(index)
            .and_then(|s| s.get(field))
            .map(String::as_str)
    }

    fn empty_section(&self) -> Section {
        self.fields
            .iter()
            .map(|f| (f.clone(), String::new()))
            .collect()
    }
}
