//! Canonical resume record produced by the field normalizer.
//!
//! All text here is RAW (unescaped). Escaping happens once, inside the section
//! renderers, so the record can also be serialized back out as JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub personal_info: Option<PersonalInfo>,
    pub summary: Option<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Option<Skills>,
    pub languages: Vec<Language>,
    pub certifications: Vec<Credential>,
    pub awards: Vec<Credential>,
    pub publications: Vec<Publication>,
    pub volunteer: Vec<Volunteer>,
    pub involvement: Involvement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

impl PersonalInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.linkedin.is_none()
            && self.github.is_none()
            && self.website.is_none()
    }
}

/// A date field as it appeared in the input: either a start/end pair or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DateSpan {
    Range {
        start: Option<String>,
        end: Option<String>,
    },
    Text(String),
}

impl Default for DateSpan {
    fn default() -> Self {
        DateSpan::Range {
            start: None,
            end: None,
        }
    }
}

/// Free text that may arrive either as one paragraph or as a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextBlock {
    Paragraph(String),
    Items(Vec<String>),
}

impl TextBlock {
    /// The block as a list; a paragraph counts as a single item.
    pub fn items(&self) -> Vec<&str> {
        match self {
            TextBlock::Paragraph(text) => vec![text.as_str()],
            TextBlock::Items(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: Option<String>,
    pub location: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub dates: DateSpan,
    pub gpa: Option<String>,
    pub honors: Option<String>,
    pub additional_info: Option<String>,
    pub coursework: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub dates: DateSpan,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: Option<String>,
    pub dates: DateSpan,
    pub technologies: Vec<String>,
    pub description: Option<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Skills keep both input shapes; the skills renderer decides which one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    /// Categories under a nested "Technical Skills" map, if one was present.
    pub technical: Option<Vec<SkillCategory>>,
    /// Top-level category→list entries (the flat shape).
    pub categories: Vec<SkillCategory>,
    pub soft_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub proficiency: Option<String>,
}

/// Certification or award; both share the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    pub organization: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub dates: DateSpan,
    pub description: Option<TextBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvolvementEntry {
    pub organization: Option<String>,
    pub position: Option<String>,
    pub dates: DateSpan,
    pub responsibilities: Vec<String>,
}

/// Legacy `Misc.Leadership` shape: event name → details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyEvent {
    pub name: String,
    pub dates: DateSpan,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Involvement {
    pub entries: Vec<InvolvementEntry>,
    pub legacy_events: Vec<LegacyEvent>,
}

impl Involvement {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.legacy_events.is_empty()
    }
}
