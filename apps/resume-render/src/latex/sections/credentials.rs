use super::{push_item_list, subheading, subheading_section, Fragment, SectionKind};
use crate::latex::escape::{escape, escape_opt, escape_url};
use crate::models::{Credential, Language, Publication};

/// All languages on a single line: `Name (Proficiency), ...`.
pub fn render_languages(languages: &[Language]) -> Option<Fragment> {
    let listed: Vec<String> = languages
        .iter()
        .filter(|lang| !lang.name.trim().is_empty())
        .map(|lang| match lang.proficiency.as_deref() {
            Some(level) => format!("{} ({})", escape(lang.name.trim()), escape(level)),
            None => escape(lang.name.trim()),
        })
        .collect();
    if listed.is_empty() {
        return None;
    }

    Some(Fragment::new(
        SectionKind::Languages,
        vec![
            "\\section{Languages}".to_string(),
            " \\begin{itemize}[leftmargin=0.15in, label={}]".to_string(),
            format!("    \\small{{\\item{{{}}}}}", listed.join(", ")),
            " \\end{itemize}".to_string(),
            String::new(),
        ],
    ))
}

pub fn render_certifications(certifications: &[Credential]) -> Option<Fragment> {
    credential_section(SectionKind::Certifications, "Certifications", certifications)
}

pub fn render_awards(awards: &[Credential]) -> Option<Fragment> {
    credential_section(SectionKind::Awards, "Awards", awards)
}

fn credential_section(kind: SectionKind, title: &str, items: &[Credential]) -> Option<Fragment> {
    let mut lines = Vec::new();
    for item in items {
        let Some(name) = item.name.as_deref() else {
            continue;
        };
        subheading(
            &mut lines,
            [&escape(name), &escape_opt(item.date.as_deref())],
            [&escape_opt(item.issuer.as_deref()), ""],
        );
        push_item_list(&mut lines, "    ", item.description.as_deref());
    }
    subheading_section(kind, title, lines)
}

pub fn render_publications(publications: &[Publication]) -> Option<Fragment> {
    let mut lines = Vec::new();
    for publication in publications {
        let Some(title) = publication.title.as_deref() else {
            continue;
        };
        let title = match publication.url.as_deref() {
            Some(url) => format!("\\href{{{}}}{{{}}}", escape_url(url), escape(title)),
            None => escape(title),
        };
        subheading(
            &mut lines,
            [&title, &escape_opt(publication.date.as_deref())],
            [
                &format!("\\emph{{{}}}", escape_opt(publication.venue.as_deref())),
                "",
            ],
        );
        push_item_list(&mut lines, "    ", publication.authors.as_deref());
    }
    subheading_section(SectionKind::Publications, "Publications", lines)
}
