use super::{Fragment, SectionKind};
use crate::latex::escape::{escape, escape_url};
use crate::models::PersonalInfo;

/// Centered name line plus a `$|$`-separated contact line.
pub fn render_header(info: &PersonalInfo) -> Option<Fragment> {
    let mut contacts: Vec<String> = Vec::new();

    if let Some(phone) = &info.phone {
        contacts.push(escape(phone));
    }
    if let Some(email) = &info.email {
        contacts.push(format!(
            "\\href{{mailto:{}}}{{{}}}",
            escape_url(email),
            escape(email)
        ));
    }
    for (link, scheme) in [
        (&info.linkedin, "https"),
        (&info.github, "https"),
        (&info.website, "http"),
    ] {
        if let Some(link) = link {
            contacts.push(profile_link(link, scheme));
        }
    }
    if let Some(location) = &info.location {
        contacts.push(escape(location));
    }

    if info.name.is_none() && contacts.is_empty() {
        return None;
    }

    let mut lines = vec!["\\begin{center}".to_string()];
    match &info.name {
        Some(name) if contacts.is_empty() => {
            lines.push(format!("    \\textbf{{\\Huge \\scshape {}}}", escape(name)));
        }
        Some(name) => {
            lines.push(format!(
                "    \\textbf{{\\Huge \\scshape {}}} \\\\ \\vspace{{1pt}}",
                escape(name)
            ));
        }
        None => {}
    }
    if !contacts.is_empty() {
        lines.push(format!("    \\small {}", contacts.join(" $|$ ")));
    }
    lines.push("\\end{center}".to_string());
    lines.push(String::new());

    Some(Fragment::new(SectionKind::Header, lines))
}

/// `\href` with the raw value as target (scheme added when missing) and the
/// escaped value as display text.
fn profile_link(raw: &str, default_scheme: &str) -> String {
    let target = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{default_scheme}://{raw}")
    };
    format!("\\href{{{}}}{{{}}}", escape_url(&target), escape(raw))
}

pub fn render_summary(summary: &str) -> Option<Fragment> {
    let summary = summary.trim();
    if summary.is_empty() {
        return None;
    }
    Some(Fragment::new(
        SectionKind::Summary,
        vec![
            "\\section*{Summary}".to_string(),
            format!("  {}", escape(summary)),
            String::new(),
        ],
    ))
}
