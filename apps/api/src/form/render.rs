use crate::form::repeater::Section;
use crate::form::resume::{ResumeForm, SectionKind};

/// Renders the form as a markdown resume.
/// Blank fields are skipped, and so are sections with nothing filled in.
pub fn render_resume_md(form: &ResumeForm) -> String {
    let profile = form.profile();
    let mut md = String::new();

    if let Some(name) = filled(&profile.name) {
        md.push_str(&format!("# {name}\n\n"));
    }
    if let Some(designation) = filled(&profile.designation) {
        md.push_str(&format!("_{designation}_\n\n"));
    }

    let contact: Vec<&str> = [&profile.email, &profile.phone, &profile.address]
        .into_iter()
        .filter_map(|v| filled(v))
        .collect();
    if !contact.is_empty() {
        md.push_str(&contact.join(" | "));
        md.push_str("\n\n");
    }

    if let Some(summary) = filled(&profile.summary) {
        md.push_str(&format!("## Summary\n\n{summary}\n\n"));
    }

    for kind in SectionKind::ALL {
        let list = form.section(kind);
        let entries: Vec<&Section> = list
            .sections()
            .iter()
            .filter(|s| s.values().any(|v| filled(v).is_some()))
            .collect();
        if entries.is_empty() {
            continue;
        }

        md.push_str(&format!("## {}\n\n", kind.title()));
        if let [field] = list.fields() {
            for entry in entries {
                if let Some(value) = entry.get(field).and_then(|v| filled(v)) {
                    md.push_str(&format!("- {value}\n"));
                }
            }
            md.push('\n');
            continue;
        }

        for entry in entries {
            render_entry(&mut md, kind, list.fields(), entry);
        }
    }

    md.trim_end().to_string()
}

fn render_entry(md: &mut String, kind: SectionKind, fields: &[String], entry: &Section) {
    let headline: Vec<&str> = kind
        .headline()
        .iter()
        .filter_map(|f| entry.get(*f).and_then(|v| filled(v)))
        .collect();
    if !headline.is_empty() {
        md.push_str(&format!("### {}\n", headline.join(", ")));
    }

    for field in fields {
        if kind.headline().iter().any(|h| h == field) || field == "description" {
            continue;
        }
        if let Some(value) = entry.get(field).and_then(|v| filled(v)) {
            md.push_str(&format!("- **{}:** {value}\n", label(field)));
        }
    }

    if let Some(description) = entry.get("description").and_then(|v| filled(v)) {
        md.push('\n');
        md.push_str(description);
        md.push('\n');
    }
    md.push('\n');
}

fn filled(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// `start_date` -> `Start Date`
fn label(field: &str) -> String {
    field
        .split('_')
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().to_string() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_renders_nothing() {
        assert_eq!(render_resume_md(&ResumeForm::new()), "");
    }

    #[test]
    fn test_profile_header() {
        let mut form = ResumeForm::new();
        form.set_profile("name", "Alice");
        form.set_profile("designation", "Engineer");
        form.set_profile("email", "alice@example.com");
        form.set_profile("address", "Springfield");

        let md = render_resume_md(&form);
        assert!(md.starts_with("# Alice\n\n_Engineer_\n\n"));
        assert!(md.contains("alice@example.com | Springfield"));
    }

    #[test]
    fn test_experience_entry_layout() {
        let mut form = ResumeForm::new();
        let kind = SectionKind::Experience;
        form.set_field(kind, 0, "title", "Engineer");
        form.set_field(kind, 0, "organization", "Acme");
        form.set_field(kind, 0, "start_date", "2020-01");
        form.set_field(kind, 0, "description", "Built things.");

        let md = render_resume_md(&form);
        assert!(md.contains("## Experience\n\n### Engineer, Acme\n- **Start Date:** 2020-01\n\nBuilt things."));
        assert!(!md.contains("End Date"), "blank fields are skipped");
    }

    #[test]
    fn test_blank_entries_and_sections_omitted() {
        let mut form = ResumeForm::new();
        form.add_section(SectionKind::Projects);
        form.set_field(SectionKind::Projects, 1, "name", "Compiler");

        let md = render_resume_md(&form);
        assert_eq!(md.matches("### ").count(), 1);
        assert!(!md.contains("## Education"));
        assert!(!md.contains("## Experience"));
    }

    #[test]
    fn test_skills_render_as_list() {
        let mut form = ResumeForm::new();
        form.set_field(SectionKind::Skills, 0, "skill", "Rust");
        let i = form.add_section(SectionKind::Skills);
        form.set_field(SectionKind::Skills, i, "skill", "SQL");

        let md = render_resume_md(&form);
        assert!(md.contains("## Skills\n\n- Rust\n- SQL"));
    }

    #[test]
    fn test_sections_follow_document_order() {
        let mut form = ResumeForm::new();
        form.set_field(SectionKind::Skills, 0, "skill", "Rust");
        form.set_field(SectionKind::Experience, 0, "title", "Engineer");
        let md = render_resume_md(&form);
        assert!(md.find("## Experience").unwrap() < md.find("## Skills").unwrap());
    }

    #[test]
    fn test_label() {
        assert_eq!(label("graduation_date"), "Graduation Date");
        assert_eq!(label("link"), "Link");
    }
}
