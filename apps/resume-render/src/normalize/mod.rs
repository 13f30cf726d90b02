//! Field Normalizer: maps any of the known resume JSON shapes onto `ResumeRecord`.
//!
//! Never fails on a parseable value: unknown keys are ignored, wrong-typed values
//! are treated as missing, and entries without their identifying fields are dropped.

pub mod aliases;

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{
    Credential, DateSpan, Education, Experience, Involvement, InvolvementEntry, Language,
    LegacyEvent, PersonalInfo, Project, Publication, ResumeRecord, SkillCategory, Skills,
    TextBlock, Volunteer,
};
use aliases::first_present;

/// Normalizes a raw record into the canonical field set.
pub fn normalize(raw: &Value) -> ResumeRecord {
    let Some(root) = raw.as_object() else {
        debug!("Resume input is not a JSON object; producing an empty record");
        return ResumeRecord::default();
    };

    ResumeRecord {
        personal_info: personal_info(root),
        summary: text_at(root, aliases::SUMMARY),
        education: entries(root, aliases::EDUCATION)
            .filter_map(education)
            .collect(),
        experience: entries(root, aliases::EXPERIENCE)
            .filter_map(experience)
            .collect(),
        projects: entries(root, aliases::PROJECTS).filter_map(project).collect(),
        skills: skills(root),
        languages: entries(root, aliases::LANGUAGES)
            .filter_map(language)
            .collect(),
        certifications: entries(root, aliases::CERTIFICATIONS)
            .filter_map(|e| {
                credential(e, aliases::CERTIFICATION_NAME, aliases::CERTIFICATION_ISSUER)
            })
            .collect(),
        awards: entries(root, aliases::AWARDS)
            .filter_map(|e| credential(e, aliases::AWARD_TITLE, aliases::AWARD_ISSUER))
            .collect(),
        publications: entries(root, aliases::PUBLICATIONS)
            .filter_map(publication)
            .collect(),
        volunteer: entries(root, aliases::VOLUNTEER)
            .filter_map(volunteer)
            .collect(),
        involvement: involvement(root),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Contact details live in a nested object under one of several keys, but any
/// field may also sit at the top level of the record. The nested value wins.
fn personal_info(root: &Map<String, Value>) -> Option<PersonalInfo> {
    let nested = first_present(root, aliases::PERSONAL_INFO).and_then(Value::as_object);

    let field = |names: &[&str]| -> Option<String> {
        nested
            .and_then(|n| text_at(n, names))
            .or_else(|| text_at(root, names))
    };

    let info = PersonalInfo {
        name: field(aliases::NAME),
        email: field(aliases::EMAIL),
        phone: field(aliases::PHONE),
        location: nested
            .and_then(|n| location_at(n, aliases::LOCATION))
            .or_else(|| location_at(root, aliases::LOCATION)),
        linkedin: field(aliases::LINKEDIN),
        github: field(aliases::GITHUB),
        website: field(aliases::WEBSITE),
    };

    (!info.is_empty()).then_some(info)
}

fn education(entry: &Map<String, Value>) -> Option<Education> {
    let edu = Education {
        institution: text_at(entry, aliases::INSTITUTION),
        location: location_at(entry, aliases::LOCATION),
        degree: text_at(entry, aliases::DEGREE),
        specialization: text_at(entry, aliases::SPECIALIZATION),
        dates: date_span(entry),
        gpa: text_at(entry, aliases::GPA),
        honors: text_at(entry, aliases::HONORS),
        additional_info: text_at(entry, aliases::ADDITIONAL_INFO),
        coursework: list_at(entry, aliases::COURSEWORK),
    };
    (edu.institution.is_some() || edu.degree.is_some()).then_some(edu)
}

fn experience(entry: &Map<String, Value>) -> Option<Experience> {
    let exp = Experience {
        company: text_at(entry, aliases::COMPANY),
        title: text_at(entry, aliases::JOB_TITLE),
        location: location_at(entry, aliases::LOCATION),
        dates: date_span(entry),
        responsibilities: list_at(entry, aliases::RESPONSIBILITIES),
    };
    (exp.company.is_some() || exp.title.is_some()).then_some(exp)
}

fn project(entry: &Map<String, Value>) -> Option<Project> {
    let title = text_at(entry, aliases::PROJECT_TITLE)?;
    Some(Project {
        title: Some(title),
        dates: date_span(entry),
        technologies: list_at(entry, aliases::TECHNOLOGIES),
        description: first_present(entry, aliases::DESCRIPTION).and_then(text_block),
    })
}

fn skills(root: &Map<String, Value>) -> Option<Skills> {
    let map = first_present(root, aliases::SKILLS)?.as_object()?;

    let technical = first_present(map, aliases::TECHNICAL_SKILLS)
        .and_then(Value::as_object)
        .map(categories);

    let soft_skills = list_at(map, aliases::SOFT_SKILLS);

    // The flat shape: every top-level key holding a list, minus the reserved keys.
    let flat: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| {
            !aliases::TECHNICAL_SKILLS
                .iter()
                .chain(aliases::SOFT_SKILLS)
                .any(|reserved| key.eq_ignore_ascii_case(reserved))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let skills = Skills {
        technical,
        categories: categories(&flat),
        soft_skills,
    };

    let has_content = skills.technical.as_ref().is_some_and(|t| !t.is_empty())
        || !skills.categories.is_empty()
        || !skills.soft_skills.is_empty();
    has_content.then_some(skills)
}

fn categories(map: &Map<String, Value>) -> Vec<SkillCategory> {
    map.iter()
        .filter(|(_, v)| v.is_array())
        .filter_map(|(name, v)| {
            let skills = string_list(v);
            let name = name.trim();
            (!skills.is_empty() && !name.is_empty()).then(|| SkillCategory {
                name: name.to_string(),
                skills,
            })
        })
        .collect()
}

fn language(entry: &Map<String, Value>) -> Option<Language> {
    Some(Language {
        name: text_at(entry, aliases::LANGUAGE_NAME)?,
        proficiency: text_at(entry, aliases::PROFICIENCY),
    })
}

fn credential(
    entry: &Map<String, Value>,
    name_aliases: &[&str],
    issuer_aliases: &[&str],
) -> Option<Credential> {
    Some(Credential {
        name: Some(text_at(entry, name_aliases)?),
        issuer: text_at(entry, issuer_aliases),
        date: text_at(entry, aliases::DATES),
        description: text_at(entry, aliases::DESCRIPTION),
    })
}

fn publication(entry: &Map<String, Value>) -> Option<Publication> {
    Some(Publication {
        title: Some(text_at(entry, aliases::PUBLICATION_TITLE)?),
        authors: list_at(entry, aliases::AUTHORS)
            .into_iter()
            .reduce(|a, b| format!("{a}, {b}")),
        venue: text_at(entry, aliases::VENUE),
        date: text_at(entry, aliases::DATES),
        url: text_at(entry, aliases::URL),
    })
}

fn volunteer(entry: &Map<String, Value>) -> Option<Volunteer> {
    let vol = Volunteer {
        organization: text_at(entry, aliases::ORGANIZATION),
        role: text_at(entry, aliases::VOLUNTEER_ROLE),
        location: location_at(entry, aliases::LOCATION),
        dates: date_span(entry),
        description: first_present(entry, aliases::DESCRIPTION).and_then(text_block),
    };
    (vol.organization.is_some() || vol.role.is_some()).then_some(vol)
}

/// Reads both involvement shapes. Precedence between them is the renderer's call.
fn involvement(root: &Map<String, Value>) -> Involvement {
    let entries = entries(root, aliases::INVOLVEMENT)
        .filter_map(|entry| {
            let item = InvolvementEntry {
                organization: text_at(entry, aliases::ORGANIZATION),
                position: text_at(entry, aliases::INVOLVEMENT_POSITION),
                dates: date_span(entry),
                responsibilities: list_at(entry, aliases::RESPONSIBILITIES),
            };
            (item.organization.is_some() || item.position.is_some()).then_some(item)
        })
        .collect();

    let legacy_events = first_present(root, aliases::MISC)
        .and_then(Value::as_object)
        .and_then(|misc| first_present(misc, aliases::MISC_LEADERSHIP))
        .and_then(Value::as_object)
        .map(|events| {
            events
                .iter()
                .filter(|(name, _)| !name.trim().is_empty())
                .map(|(name, details)| {
                    let details = details.as_object();
                    LegacyEvent {
                        name: name.trim().to_string(),
                        dates: details.map(date_span).unwrap_or_default(),
                        achievements: details
                            .map(|d| list_at(d, aliases::LEGACY_ACHIEVEMENTS))
                            .unwrap_or_default(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Involvement {
        entries,
        legacy_events,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Value helpers
// ────────────────────────────────────────────────────────────────────────────

/// Objects inside the first present list under `names`. Non-object items are skipped.
fn entries<'a>(
    source: &'a Map<String, Value>,
    names: &[&str],
) -> impl Iterator<Item = &'a Map<String, Value>> {
    first_present(source, names)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Stringifies a scalar. Blank strings, arrays, and objects yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_at(source: &Map<String, Value>, names: &[&str]) -> Option<String> {
    first_present(source, names).and_then(scalar_text)
}

/// List-or-scalar: a scalar becomes a one-item list.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn list_at(source: &Map<String, Value>, names: &[&str]) -> Vec<String> {
    first_present(source, names)
        .map(string_list)
        .unwrap_or_default()
}

/// A location is either plain text or a `{city, state}` object.
fn location_at(source: &Map<String, Value>, names: &[&str]) -> Option<String> {
    let value = first_present(source, names)?;
    match value.as_object() {
        Some(parts) => {
            let joined = [aliases::CITY, aliases::STATE]
                .iter()
                .filter_map(|key| text_at(parts, key))
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        None => scalar_text(value),
    }
}

/// Reads `dates`/`date` as an object or text, else flat `start_date`/`end_date`.
fn date_span(source: &Map<String, Value>) -> DateSpan {
    if let Some(value) = first_present(source, aliases::DATES) {
        if let Some(range) = value.as_object() {
            return DateSpan::Range {
                start: text_at(range, aliases::START_DATE),
                end: text_at(range, aliases::END_DATE),
            };
        }
        if let Some(text) = scalar_text(value) {
            return DateSpan::Text(text);
        }
    }
    DateSpan::Range {
        start: text_at(source, aliases::START_DATE),
        end: text_at(source, aliases::END_DATE),
    }
}

fn text_block(value: &Value) -> Option<TextBlock> {
    match value {
        Value::Array(_) => {
            let items = string_list(value);
            (!items.is_empty()).then_some(TextBlock::Items(items))
        }
        other => scalar_text(other).map(TextBlock::Paragraph),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_shape() -> Value {
        json!({
            "Personal Information": {
                "name": "Ruo-Yi Liang",
                "email": "ruoyi_liang@example.edu",
                "website/LinkedIn": "linkedin.com/in/ruoyi",
                "location": {"city": "Berkeley", "state": "CA"}
            },
            "Summary/Objective": "Data meets product.",
            "Education": [{
                "university": "UC Berkeley",
                "degree": "Master of Analytics",
                "start_date": "Aug 2025",
                "end_date": "Present",
                "gpa": 3.7
            }],
            "Experience": [{
                "company": "Shopee",
                "title": "Data Analysis Intern",
                "dates": {"start_date": "June 2023", "end_date": "Dec 2023"},
                "responsibilities/achievements": ["Saved 5% costs.", "", "Ran A/B tests."]
            }],
            "Projects": [{
                "title": "Capstone",
                "technologies_used": "Linear Programming",
                "description": "Achieved a 16% profit boost.",
                "date": "Spring 2023"
            }],
            "Skills": {
                "Technical Skills": {"Languages": ["Python", "SQL"]},
                "Soft Skills": ["Communication"]
            },
            "Misc": {
                "Leadership": {
                    "Event Coordinator": {
                        "dates": {"start_date": "Apr 2023", "end_date": "May 2023"},
                        "responsibilities/achievements": ["Led a team of 100+"]
                    }
                }
            }
        })
    }

    fn schema_shape() -> Value {
        json!({
            "name": "Alex Doe",
            "contact": {"email": "alex@example.com", "github_url": "github.com/alex"},
            "summary": "Systems engineer.",
            "work_experience": [{
                "company": "Acme",
                "position": "Engineer",
                "responsibilities": "Kept the lights on."
            }],
            "skills": {"Languages": ["Rust", "Go"], "Soft Skills": ["Mentoring"]},
            "certifications": [{"certification": "CKA", "institution": "CNCF", "date": 2022}],
            "awards": [{"title": "Dean's List", "issuer": "NTU"}],
            "involvement": [{
                "organization": "Analytics Club",
                "position": "President",
                "date": "2022",
                "responsibilities": ["Led weekly meetings"]
            }]
        })
    }

    #[test]
    fn test_legacy_shape_personal_info() {
        let record = normalize(&legacy_shape());
        let info = record.personal_info.expect("personal info");
        assert_eq!(info.name.as_deref(), Some("Ruo-Yi Liang"));
        assert_eq!(info.linkedin.as_deref(), Some("linkedin.com/in/ruoyi"));
        assert_eq!(info.location.as_deref(), Some("Berkeley, CA"));
    }

    #[test]
    fn test_top_level_name_injected_into_contact() {
        let record = normalize(&schema_shape());
        let info = record.personal_info.expect("personal info");
        assert_eq!(info.name.as_deref(), Some("Alex Doe"));
        assert_eq!(info.github.as_deref(), Some("github.com/alex"));
    }

    #[test]
    fn test_education_flat_dates_and_numeric_gpa() {
        let record = normalize(&legacy_shape());
        let edu = &record.education[0];
        assert_eq!(edu.institution.as_deref(), Some("UC Berkeley"));
        assert_eq!(edu.gpa.as_deref(), Some("3.7"));
        assert_eq!(
            edu.dates,
            DateSpan::Range {
                start: Some("Aug 2025".to_string()),
                end: Some("Present".to_string())
            }
        );
    }

    #[test]
    fn test_experience_aliases_and_blank_bullets_dropped() {
        let record = normalize(&legacy_shape());
        let exp = &record.experience[0];
        assert_eq!(exp.title.as_deref(), Some("Data Analysis Intern"));
        assert_eq!(exp.responsibilities, vec!["Saved 5% costs.", "Ran A/B tests."]);
    }

    #[test]
    fn test_scalar_responsibility_is_one_item_list() {
        let record = normalize(&schema_shape());
        assert_eq!(
            record.experience[0].responsibilities,
            vec!["Kept the lights on."]
        );
    }

    #[test]
    fn test_project_scalar_technology_and_paragraph_description() {
        let record = normalize(&legacy_shape());
        let proj = &record.projects[0];
        assert_eq!(proj.technologies, vec!["Linear Programming"]);
        assert_eq!(
            proj.description,
            Some(TextBlock::Paragraph("Achieved a 16% profit boost.".to_string()))
        );
        assert_eq!(proj.dates, DateSpan::Text("Spring 2023".to_string()));
    }

    #[test]
    fn test_nested_skills_keep_technical_map() {
        let record = normalize(&legacy_shape());
        let skills = record.skills.expect("skills");
        let technical = skills.technical.expect("technical");
        assert_eq!(technical[0].name, "Languages");
        assert_eq!(skills.soft_skills, vec!["Communication"]);
        assert!(skills.categories.is_empty());
    }

    #[test]
    fn test_flat_skills_exclude_soft_key() {
        let record = normalize(&schema_shape());
        let skills = record.skills.expect("skills");
        assert!(skills.technical.is_none());
        assert_eq!(skills.categories.len(), 1);
        assert_eq!(skills.categories[0].skills, vec!["Rust", "Go"]);
        assert_eq!(skills.soft_skills, vec!["Mentoring"]);
    }

    #[test]
    fn test_credentials_use_their_own_aliases() {
        let record = normalize(&schema_shape());
        assert_eq!(record.certifications[0].name.as_deref(), Some("CKA"));
        assert_eq!(record.certifications[0].issuer.as_deref(), Some("CNCF"));
        assert_eq!(record.certifications[0].date.as_deref(), Some("2022"));
        assert_eq!(record.awards[0].issuer.as_deref(), Some("NTU"));
    }

    #[test]
    fn test_both_involvement_shapes_are_read() {
        let flat = normalize(&schema_shape());
        assert_eq!(flat.involvement.entries.len(), 1);
        assert!(flat.involvement.legacy_events.is_empty());

        let legacy = normalize(&legacy_shape());
        assert!(legacy.involvement.entries.is_empty());
        assert_eq!(legacy.involvement.legacy_events[0].name, "Event Coordinator");
        assert_eq!(
            legacy.involvement.legacy_events[0].achievements,
            vec!["Led a team of 100+"]
        );
    }

    #[test]
    fn test_empty_and_malformed_input_yield_empty_record() {
        assert_eq!(normalize(&json!({})), ResumeRecord::default());
        assert_eq!(normalize(&json!([1, 2, 3])), ResumeRecord::default());
        assert_eq!(normalize(&json!(null)), ResumeRecord::default());
    }

    #[test]
    fn test_wrong_typed_sections_are_ignored() {
        let record = normalize(&json!({
            "Education": "not a list",
            "Experience": [42, "x", {"company": "Real Co"}],
            "Skills": ["not", "a", "map"]
        }));
        assert!(record.education.is_empty());
        assert_eq!(record.experience.len(), 1);
        assert!(record.skills.is_none());
    }
}
