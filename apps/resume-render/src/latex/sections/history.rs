use super::{date_text, push_item_list, subheading, subheading_section, Fragment, SectionKind};
use crate::latex::escape::{escape, escape_opt};
use crate::models::{Education, Experience, Project, TextBlock, Volunteer};

pub fn render_education(entries: &[Education]) -> Option<Fragment> {
    let mut lines = Vec::new();

    for edu in entries {
        let degree = match (edu.degree.as_deref(), edu.specialization.as_deref()) {
            (Some(d), Some(s)) => format!("{}, {}", escape(d), escape(s)),
            (d, s) => escape_opt(d.or(s)),
        };
        subheading(
            &mut lines,
            [&escape_opt(edu.institution.as_deref()), &escape_opt(edu.location.as_deref())],
            [&degree, &date_text(&edu.dates)],
        );

        let standing: Vec<String> = [("GPA", &edu.gpa), ("Honors", &edu.honors)]
            .into_iter()
            .filter_map(|(label, value)| value.as_deref().map(|v| format!("{label}: {}", escape(v))))
            .collect();
        if !standing.is_empty() {
            lines.push(format!("    \\resumeSubSubheading{{{}}}{{}}", standing.join(", ")));
        }

        let coursework = (!edu.coursework.is_empty())
            .then(|| format!("Relevant Coursework: {}", edu.coursework.join(", ")));
        let addendum = edu.additional_info.clone().or(coursework);
        push_item_list(&mut lines, "    ", addendum.as_deref());
    }

    subheading_section(SectionKind::Education, "Education", lines)
}

pub fn render_experience(entries: &[Experience]) -> Option<Fragment> {
    let mut lines = Vec::new();

    for exp in entries {
        subheading(
            &mut lines,
            [&escape_opt(exp.title.as_deref()), &date_text(&exp.dates)],
            [&escape_opt(exp.company.as_deref()), &escape_opt(exp.location.as_deref())],
        );
        push_item_list(&mut lines, "    ", exp.responsibilities.iter().map(String::as_str));
    }

    subheading_section(SectionKind::Experience, "Experience", lines)
}

pub fn render_projects(entries: &[Project]) -> Option<Fragment> {
    let mut lines = Vec::new();

    for proj in entries {
        let Some(title) = proj.title.as_deref() else {
            continue;
        };
        let mut heading = format!("\\textbf{{{}}}", escape(title));
        if !proj.technologies.is_empty() {
            heading.push_str(&format!(
                " $|$ \\emph{{{}}}",
                escape(&proj.technologies.join(", "))
            ));
        }
        lines.push("    \\resumeProjectHeading".to_string());
        lines.push(format!("      {{{heading}}}{{{}}}", date_text(&proj.dates)));
        push_description(&mut lines, proj.description.as_ref());
    }

    subheading_section(SectionKind::Projects, "Projects", lines)
}

pub fn render_volunteer(entries: &[Volunteer]) -> Option<Fragment> {
    let mut lines = Vec::new();

    for vol in entries {
        subheading(
            &mut lines,
            [&escape_opt(vol.role.as_deref()), &date_text(&vol.dates)],
            [&escape_opt(vol.organization.as_deref()), &escape_opt(vol.location.as_deref())],
        );
        push_description(&mut lines, vol.description.as_ref());
    }

    subheading_section(SectionKind::Volunteer, "Volunteer Experience", lines)
}

/// A scalar description is one paragraph; a list is one bullet per item.
fn push_description(lines: &mut Vec<String>, description: Option<&TextBlock>) {
    match description {
        Some(TextBlock::Paragraph(text)) if !text.trim().is_empty() => {
            lines.push(format!("    \\resumeParagraph{{{}}}", escape(text.trim())));
        }
        Some(block @ TextBlock::Items(_)) => push_item_list(lines, "    ", block.items()),
        _ => {}
    }
}
