use crate::models::ReportArtifact;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

/// Errors raised while rendering the report document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const FONT_SIZE_PT: f32 = 9.0;
const LINE_HEIGHT_MM: f32 = 4.5;
// Helvetica at 9pt fits roughly this many characters across an A4 body.
const WRAP_COLUMNS: usize = 105;

/// Reduce the bureau's HTML report body to plain text lines.
///
/// The embedded markup is presentation-only; dropping the tags and keeping
/// the text preserves every fact in the report. Block-level closers become
/// line breaks so the layout stays readable.
fn markup_to_lines(markup: &str) -> Vec<String> {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    let mut tag = String::new();

    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let lower = tag.trim_start_matches('/').to_ascii_lowercase();
                if matches!(
                    lower.split_whitespace().next().unwrap_or(""),
                    "br" | "p" | "div" | "tr" | "table" | "h1" | "h2" | "h3" | "li" | "hr"
                ) {
                    text.push('\n');
                }
            }
            _ if in_tag => tag.push(c),
            _ => text.push(c),
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    decoded
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .flat_map(|l| wrap_line(&l, WRAP_COLUMNS))
        .collect()
}

fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    if line.chars().count() <= columns {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > columns {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Render the bureau report markup into a PDF artifact.
///
/// Deterministic local computation: same markup, same bytes-wise layout.
/// Uses the builtin Helvetica so no font files are required at runtime.
pub fn render_report(markup: &str, file_name: &str) -> Result<ReportArtifact, RenderError> {
    let lines = markup_to_lines(markup);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Credit Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for line in &lines {
        if y < MARGIN_MM {
            let (page, layer_idx) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(layer_idx);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        layer.use_text(line.clone(), FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    let bytes = doc.save_to_bytes()?;

    Ok(ReportArtifact {
        bytes,
        content_type: "application/pdf",
        file_name: file_name.to_string(),
    })
}
