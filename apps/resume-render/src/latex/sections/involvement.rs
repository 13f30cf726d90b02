use super::{date_text, push_item_list, subheading, subheading_section, Fragment, SectionKind};
use crate::latex::escape::{escape, escape_opt};
use crate::models::{Involvement, InvolvementEntry, LegacyEvent};

/// The flat entry list wins; the legacy event map is only used when it is empty.
pub fn render_involvement(involvement: &Involvement) -> Option<Fragment> {
    if !involvement.entries.is_empty() {
        return render_entries(&involvement.entries);
    }
    render_legacy(&involvement.legacy_events)
}

fn render_entries(entries: &[InvolvementEntry]) -> Option<Fragment> {
    let mut lines = Vec::new();
    for entry in entries {
        subheading(
            &mut lines,
            [&escape_opt(entry.position.as_deref()), &date_text(&entry.dates)],
            [&escape_opt(entry.organization.as_deref()), ""],
        );
        push_item_list(&mut lines, "    ", entry.responsibilities.iter().map(String::as_str));
    }
    subheading_section(SectionKind::Involvement, "Leadership \\& Involvement", lines)
}

fn render_legacy(events: &[LegacyEvent]) -> Option<Fragment> {
    let mut lines = Vec::new();
    for event in events {
        lines.push(format!(
            "    \\resumeSubheadingSingleLine{{{}}}{{{}}}",
            escape(&event.name),
            date_text(&event.dates)
        ));
        push_item_list(&mut lines, "    ", event.achievements.iter().map(String::as_str));
    }
    subheading_section(SectionKind::Involvement, "Leadership \\& Activities", lines)
}
