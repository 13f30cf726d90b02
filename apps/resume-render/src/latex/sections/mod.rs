//! Section Renderers: one function per resume section.
//!
//! Every renderer takes normalized data and returns `Some(Fragment)` or `None` when
//! there is nothing worth a heading. Renderers only emit well-formed structure: no
//! empty lists, no line made of a bare `\\`.

mod credentials;
mod header;
mod history;
mod involvement;
mod skills;

pub use credentials::{
    render_awards, render_certifications, render_languages, render_publications,
};
pub use header::{render_header, render_summary};
pub use history::{render_education, render_experience, render_projects, render_volunteer};
pub use involvement::render_involvement;
pub use skills::render_skills;

use serde::Serialize;

use crate::latex::escape::escape;
use crate::models::{DateSpan, ResumeRecord};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Fixed section taxonomy. Declaration order is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SectionKind {
    Header,
    Summary,
    Education,
    Experience,
    Projects,
    Skills,
    Languages,
    Certifications,
    Awards,
    Publications,
    Volunteer,
    Involvement,
}

/// A self-contained LaTeX fragment for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub kind: SectionKind,
    pub body: String,
}

impl Fragment {
    fn new(kind: SectionKind, lines: Vec<String>) -> Self {
        Fragment {
            kind,
            body: lines.join("\n"),
        }
    }
}

/// Runs every renderer over `record` and keeps the non-omitted fragments, in order.
pub fn render_all(record: &ResumeRecord) -> Vec<Fragment> {
    [
        record.personal_info.as_ref().and_then(render_header),
        record.summary.as_deref().and_then(render_summary),
        render_education(&record.education),
        render_experience(&record.experience),
        render_projects(&record.projects),
        record.skills.as_ref().and_then(render_skills),
        render_languages(&record.languages),
        render_certifications(&record.certifications),
        render_awards(&record.awards),
        render_publications(&record.publications),
        render_volunteer(&record.volunteer),
        render_involvement(&record.involvement),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

/// Formats a raw (unescaped) date range.
///
/// - end is "present" (any case) → `start -- Present`
/// - start and end → `start -- end`
/// - only one side → that side
/// - neither → empty
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> String {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());

    match (start, end) {
        (Some(s), Some(e)) if e.eq_ignore_ascii_case("present") => format!("{s} -- Present"),
        (None, Some(e)) if e.eq_ignore_ascii_case("present") => "Present".to_string(),
        (Some(s), Some(e)) => format!("{s} -- {e}"),
        (Some(s), None) => s.to_string(),
        (None, Some(e)) => e.to_string(),
        (None, None) => String::new(),
    }
}

/// Escaped display text for a date field.
pub(crate) fn date_text(span: &DateSpan) -> String {
    match span {
        DateSpan::Range { start, end } => {
            escape(&format_date_range(start.as_deref(), end.as_deref()))
        }
        DateSpan::Text(text) => escape(text),
    }
}

/// Appends a bullet list for the non-blank `items`. Nothing is appended when all are blank.
pub(crate) fn push_item_list<'a>(
    lines: &mut Vec<String>,
    indent: &str,
    items: impl IntoIterator<Item = &'a str>,
) {
    let bullets: Vec<String> = items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| format!("{indent}  \\resumeItem{{{}}}", escape(item)))
        .collect();

    if bullets.is_empty() {
        return;
    }
    lines.push(format!("{indent}\\resumeItemListStart"));
    lines.extend(bullets);
    lines.push(format!("{indent}\\resumeItemListEnd"));
}

/// Wraps subheading entries in a titled section. `None` when there are no entries.
pub(crate) fn subheading_section(
    kind: SectionKind,
    title: &str,
    entries: Vec<String>,
) -> Option<Fragment> {
    if entries.is_empty() {
        return None;
    }
    let mut lines = vec![
        format!("\\section{{{title}}}"),
        "  \\resumeSubHeadingListStart".to_string(),
    ];
    lines.extend(entries);
    lines.push("  \\resumeSubHeadingListEnd".to_string());
    lines.push(String::new());
    Some(Fragment::new(kind, lines))
}

/// `\resumeSubheading{a}{b}{c}{d}` over two lines; arguments must already be escaped.
pub(crate) fn subheading(lines: &mut Vec<String>, top: [&str; 2], bottom: [&str; 2]) {
    lines.push("    \\resumeSubheading".to_string());
    lines.push(format!("      {{{}}}{{{}}}", top[0], top[1]));
    lines.push(format!("      {{{}}}{{{}}}", bottom[0], bottom[1]));
}
