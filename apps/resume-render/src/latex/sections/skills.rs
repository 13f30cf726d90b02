use super::{Fragment, SectionKind};
use crate::latex::escape::escape;
use crate::models::{SkillCategory, Skills};

/// Technical categories (the nested map if present, else the flat categories) and
/// an optional soft-skills line, one category per line.
pub fn render_skills(skills: &Skills) -> Option<Fragment> {
    let categories = match &skills.technical {
        Some(technical) if !technical.is_empty() => technical,
        _ => &skills.categories,
    };

    let mut rows: Vec<String> = categories.iter().filter_map(category_row).collect();
    if let Some(soft) = joined(&skills.soft_skills) {
        rows.push(format!("\\textbf{{Soft Skills}}{{: {soft}}}"));
    }
    if rows.is_empty() {
        return None;
    }

    // Separators go between rows, never on a line of their own.
    let last = rows.len() - 1;
    let mut lines = vec![
        "\\section{Skills}".to_string(),
        " \\begin{itemize}[leftmargin=0.15in, label={}]".to_string(),
        "    \\small{\\item{".to_string(),
    ];
    for (i, row) in rows.into_iter().enumerate() {
        let separator = if i < last { " \\\\" } else { "" };
        lines.push(format!("     {row}{separator}"));
    }
    lines.push("    }}".to_string());
    lines.push(" \\end{itemize}".to_string());
    lines.push(String::new());

    Some(Fragment::new(SectionKind::Skills, lines))
}

fn category_row(category: &SkillCategory) -> Option<String> {
    let name = category.name.trim();
    if name.is_empty() {
        return None;
    }
    joined(&category.skills).map(|list| format!("\\textbf{{{}}}{{: {list}}}", escape(name)))
}

/// Escaped, comma-joined non-blank items. `None` if nothing is left.
fn joined(items: &[String]) -> Option<String> {
    let kept: Vec<String> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(escape)
        .collect();
    (!kept.is_empty()).then(|| kept.join(", "))
}
