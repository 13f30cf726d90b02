//! Document Assembler: preamble plus section fragments, with page geometry
//! driven by the requested page height.

use super::sections::Fragment;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Letter height used for the text-block computation when no height is pinned.
pub const DEFAULT_PAGE_HEIGHT_IN: f64 = 11.0;

/// Uniform margin on every side, in inches.
pub const MARGIN_IN: f64 = 0.5;

/// Fixed page geometry for one template variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Base font size passed to the document class (10, 11 or 12).
    pub font_size_pt: u8,
    pub margin_in: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            font_size_pt: 11,
            margin_in: MARGIN_IN,
        }
    }
}

impl PageGeometry {
    /// Text-block height for a page of `page_height` inches.
    pub fn text_height(&self, page_height: f64) -> f64 {
        page_height - 2.0 * self.margin_in
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Builds a complete document from `fragments`, which must already be in
/// section order.
///
/// `textheight` is always set. `paperheight` is only emitted when `page_height`
/// is `Some`; otherwise the engine's letter default applies.
pub fn assemble(fragments: &[Fragment], page_height: Option<f64>, geometry: &PageGeometry) -> String {
    let height = page_height.unwrap_or(DEFAULT_PAGE_HEIGHT_IN);

    let mut out = preamble(geometry, height, page_height.is_some());
    out.push_str("\n\\begin{document}\n\n");
    for fragment in fragments {
        out.push_str(&fragment.body);
        out.push('\n');
    }
    out.push_str("\\end{document}\n");
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn preamble(geometry: &PageGeometry, height: f64, pin_height: bool) -> String {
    let margin = geometry.margin_in;
    let mut geometry_opts = format!(
        "left={margin:.2}in, right={margin:.2}in, top={margin:.2}in, bottom={margin:.2}in, textheight={:.2}in",
        geometry.text_height(height)
    );
    if pin_height {
        geometry_opts.push_str(&format!(", paperheight={height:.2}in"));
    }

    let mut lines = vec![
        format!("\\documentclass[letterpaper,{}pt]{{article}}", geometry.font_size_pt),
        r"\usepackage[T1]{fontenc}".to_string(),
        r"\usepackage{latexsym}".to_string(),
        format!("\\usepackage[{geometry_opts}]{{geometry}}"),
    ];
    lines.extend(FIXED_PREAMBLE.iter().map(|line| line.to_string()));
    lines.join("\n")
}

/// Packages, page style, and the resume macros every renderer relies on.
const FIXED_PREAMBLE: &[&str] = &[
    r"\usepackage{titlesec}",
    r"\usepackage{marvosym}",
    r"\usepackage[usenames,dvipsnames]{color}",
    r"\usepackage{verbatim}",
    r"\usepackage{enumitem}",
    r"\usepackage[hidelinks]{hyperref}",
    r"\usepackage{fancyhdr}",
    r"\usepackage[english]{babel}",
    r"\usepackage{tabularx}",
    r"\usepackage{amsfonts}",
    r"\usepackage{textcomp}",
    r"\pagestyle{fancy}",
    r"\fancyhf{}",
    r"\fancyfoot{}",
    r"\renewcommand{\headrulewidth}{0pt}",
    r"\renewcommand{\footrulewidth}{0pt}",
    r"\linespread{1.05}",
    r"\raggedbottom",
    r"\urlstyle{same}",
    r"\setlength{\tabcolsep}{0in}",
    r"\titleformat{\section}{",
    r"  \vspace{2pt}\scshape\raggedright\large",
    r"}{}{0em}{}[\color{black}\titlerule \vspace{3pt}]",
    r"\pdfgentounicode=1",
    r"\newcommand{\resumeItem}[1]{\item{\small #1}\vspace{1pt}}",
    r"\newcommand{\resumeParagraph}[1]{\item[]{\small #1}\vspace{2pt}}",
    r"\newcommand{\resumeSubheading}[4]{",
    r"  \vspace{-2pt}\item",
    r"    \begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}",
    r"      \textbf{#1} & #2 \\",
    r"      \textit{\small#3} & \textit{\small #4} \\",
    r"    \end{tabular*}\vspace{-7pt}",
    r"}",
    r"\newcommand{\resumeSubSubheading}[2]{",
    r"    \item",
    r"    \begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}",
    r"      \textit{\small#1} & \textit{\small #2} \\",
    r"    \end{tabular*}\vspace{-7pt}",
    r"}",
    r"\newcommand{\resumeProjectHeading}[2]{",
    r"    \item",
    r"    \begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}",
    r"      \small#1 & #2 \\",
    r"    \end{tabular*}\vspace{2pt}",
    r"}",
    r"\renewcommand\labelitemii{$\vcenter{\hbox{\tiny$\bullet$}}$}",
    r"\newcommand{\resumeSubheadingSingleLine}[2]{",
    r"  \vspace{-2pt}\item",
    r"    \begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}",
    r"      \textbf{#1} & #2 \\",
    r"    \end{tabular*}\vspace{-7pt}",
    r"}",
    r"\setlist[itemize]{itemsep=0pt, topsep=3pt, parsep=0pt, partopsep=0pt, leftmargin=0.15in}",
    r"\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.15in, label={}]}",
    r"\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}",
    r"\newcommand{\resumeItemListStart}{\begin{itemize}[itemsep=2pt]}",
    r"\newcommand{\resumeItemListEnd}{\end{itemize}}",
];

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::sections::{render_summary, SectionKind};

    #[test]
    fn test_unpinned_height_uses_letter_text_block() {
        let doc = assemble(&[], None, &PageGeometry::default());
        assert!(doc.contains("textheight=10.00in"));
        assert!(!doc.contains("paperheight"));
    }

    #[test]
    fn test_pinned_height_sets_paper_and_text_height() {
        let doc = assemble(&[], Some(13.0), &PageGeometry::default());
        assert!(doc.contains("paperheight=13.00in"));
        assert!(doc.contains("textheight=12.00in"));
        assert!(doc.contains("left=0.50in"));
    }

    #[test]
    fn test_font_size_comes_from_geometry() {
        let compact = PageGeometry {
            font_size_pt: 10,
            ..PageGeometry::default()
        };
        let doc = assemble(&[], None, &compact);
        assert!(doc.starts_with(r"\documentclass[letterpaper,10pt]{article}"));
    }

    #[test]
    fn test_fragments_sit_between_document_markers() {
        let summary = render_summary("Builder.").expect("summary");
        assert_eq!(summary.kind, SectionKind::Summary);
        let doc = assemble(&[summary], None, &PageGeometry::default());

        let begin = doc.find(r"\begin{document}").expect("begin");
        let body = doc.find(r"\section*{Summary}").expect("summary");
        let end = doc.find(r"\end{document}").expect("end");
        assert!(begin < body && body < end);
        assert!(doc.trim_end().ends_with(r"\end{document}"));
    }

    #[test]
    fn test_preamble_defines_every_macro_renderers_use() {
        let doc = assemble(&[], None, &PageGeometry::default());
        for name in [
            "resumeItem",
            "resumeParagraph",
            "resumeSubheading",
            "resumeSubSubheading",
            "resumeProjectHeading",
            "resumeSubheadingSingleLine",
            "resumeSubHeadingListStart",
            "resumeItemListStart",
        ] {
            assert!(
                doc.contains(&format!("\\newcommand{{\\{name}}}")),
                "missing macro {name}"
            );
        }
    }
}
