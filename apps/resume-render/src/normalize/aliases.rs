//! Ordered alias tables, one per canonical field.
//!
//! Producers of resume JSON have used several key spellings over time. The first
//! alias that resolves to a present value wins; order is most specific first.

use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Top-level sections
// ────────────────────────────────────────────────────────────────────────────

pub const PERSONAL_INFO: &[&str] = &["Personal Information", "personal_information", "contact"];
pub const SUMMARY: &[&str] = &["Summary/Objective", "objective", "summary"];
pub const EDUCATION: &[&str] = &["Education", "education"];
pub const EXPERIENCE: &[&str] = &["Experience", "work_experience", "experience"];
pub const PROJECTS: &[&str] = &["Projects", "projects"];
pub const SKILLS: &[&str] = &["Skills", "skills"];
pub const LANGUAGES: &[&str] = &["Languages", "languages"];
pub const CERTIFICATIONS: &[&str] = &["certifications", "Certifications", "Certifications/Awards"];
pub const AWARDS: &[&str] = &["awards", "Awards"];
pub const PUBLICATIONS: &[&str] = &["Publications", "publications"];
pub const VOLUNTEER: &[&str] = &["Volunteer Experience", "volunteer_experience"];
pub const INVOLVEMENT: &[&str] = &["involvement", "Involvement", "leadership", "Leadership"];
pub const MISC: &[&str] = &["Misc", "misc"];
pub const MISC_LEADERSHIP: &[&str] = &["Leadership"];

// ────────────────────────────────────────────────────────────────────────────
// Contact fields
// ────────────────────────────────────────────────────────────────────────────

pub const NAME: &[&str] = &["name"];
pub const EMAIL: &[&str] = &["email"];
pub const PHONE: &[&str] = &["phone"];
pub const LOCATION: &[&str] = &["location"];
pub const LINKEDIN: &[&str] = &["linkedin", "linkedin_url", "website/LinkedIn"];
pub const GITHUB: &[&str] = &["github", "github_url"];
pub const WEBSITE: &[&str] = &["website"];

// ────────────────────────────────────────────────────────────────────────────
// Entry fields
// ────────────────────────────────────────────────────────────────────────────

pub const INSTITUTION: &[&str] = &["institution", "university"];
pub const DEGREE: &[&str] = &["degree"];
pub const SPECIALIZATION: &[&str] = &["specialization"];
pub const GPA: &[&str] = &["gpa"];
pub const HONORS: &[&str] = &["honors"];
pub const ADDITIONAL_INFO: &[&str] = &["additional_info"];
pub const COURSEWORK: &[&str] = &["relevant_coursework"];

pub const COMPANY: &[&str] = &["company"];
pub const JOB_TITLE: &[&str] = &["position", "title"];
pub const RESPONSIBILITIES: &[&str] = &["responsibilities", "responsibilities/achievements"];

pub const PROJECT_TITLE: &[&str] = &["title", "name"];
pub const TECHNOLOGIES: &[&str] = &["technologies", "technologies_used"];
pub const DESCRIPTION: &[&str] = &["description"];

pub const DATES: &[&str] = &["dates", "date"];
pub const START_DATE: &[&str] = &["start_date"];
pub const END_DATE: &[&str] = &["end_date"];
pub const CITY: &[&str] = &["city"];
pub const STATE: &[&str] = &["state"];

pub const TECHNICAL_SKILLS: &[&str] = &["Technical Skills"];
pub const SOFT_SKILLS: &[&str] = &["Soft Skills"];

pub const LANGUAGE_NAME: &[&str] = &["name", "language"];
pub const PROFICIENCY: &[&str] = &["proficiency"];

pub const CERTIFICATION_NAME: &[&str] = &["certification", "name", "title"];
pub const CERTIFICATION_ISSUER: &[&str] = &["institution", "issuer"];
pub const AWARD_TITLE: &[&str] = &["title", "name"];
pub const AWARD_ISSUER: &[&str] = &["issuer", "institution"];

pub const PUBLICATION_TITLE: &[&str] = &["title"];
pub const AUTHORS: &[&str] = &["authors"];
pub const VENUE: &[&str] = &["journal/conference", "venue"];
pub const URL: &[&str] = &["url"];

pub const ORGANIZATION: &[&str] = &["organization"];
pub const VOLUNTEER_ROLE: &[&str] = &["role", "position"];
pub const INVOLVEMENT_POSITION: &[&str] = &["position", "role"];
pub const LEGACY_ACHIEVEMENTS: &[&str] = &["responsibilities/achievements", "responsibilities"];

// ────────────────────────────────────────────────────────────────────────────
// Lookup
// ────────────────────────────────────────────────────────────────────────────

/// Returns the value of the first alias that is present in `source`.
///
/// Every alias is tried as an exact key before any case-insensitive match, so an
/// exact later alias still beats a differently-cased earlier one.
pub fn first_present<'a>(source: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    let exact = aliases
        .iter()
        .filter_map(|alias| source.get(*alias))
        .find(|v| is_present(v));
    if exact.is_some() {
        return exact;
    }

    aliases.iter().find_map(|alias| {
        source
            .iter()
            .find(|(key, v)| key.eq_ignore_ascii_case(alias) && is_present(v))
            .map(|(_, v)| v)
    })
}

/// Null, blank strings, and empty collections all count as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_first_alias_wins_when_both_present() {
        let source = obj(json!({ "Experience": [1], "work_experience": [2] }));
        assert_eq!(first_present(&source, EXPERIENCE), Some(&json!([1])));
    }

    #[test]
    fn test_empty_value_falls_through_to_next_alias() {
        let source = obj(json!({ "Experience": [], "work_experience": [2] }));
        assert_eq!(first_present(&source, EXPERIENCE), Some(&json!([2])));

        let source = obj(json!({ "Summary/Objective": "  ", "summary": "Builder" }));
        assert_eq!(first_present(&source, SUMMARY), Some(&json!("Builder")));
    }

    #[test]
    fn test_no_alias_is_absent() {
        let source = obj(json!({ "unrelated": true }));
        assert_eq!(first_present(&source, EDUCATION), None);
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let source = obj(json!({ "EDUCATION": [{"degree": "BS"}] }));
        assert!(first_present(&source, EDUCATION).is_some());
    }

    #[test]
    fn test_exact_match_beats_case_insensitive_match() {
        let source = obj(json!({ "OBJECTIVE": "loose", "summary": "exact" }));
        assert_eq!(first_present(&source, SUMMARY), Some(&json!("exact")));
    }

    #[test]
    fn test_is_present_scalars() {
        assert!(is_present(&json!(0)));
        assert!(is_present(&json!(false)));
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!({})));
    }
}
