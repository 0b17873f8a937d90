//! Menu text extraction from the bar's PDF menu.
//!
//! The menu is read once at startup and baked into every system prompt.

use std::any::Any;
use std::panic::catch_unwind;
use std::path::Path;

use crate::{config::NO_MENU_TEXT, error::SommelierError};

/// Extract the text of every page in the PDF at `path`.
///
/// # Errors
/// Returns [`SommelierError::Pdf`] when the file cannot be parsed or holds no text,
/// and [`SommelierError::Io`] when it cannot be read.
pub fn load_menu_text(path: impl AsRef<Path>) -> Result<String, SommelierError> {
    let bytes = std::fs::read(path.as_ref())?;
    extract_menu_text(&bytes)
}

/// Extract menu text from an in-memory PDF.
///
/// The extractor panics on some malformed documents (e.g. a font referenced
/// by a content stream but missing from `/Resources`); such panics are
/// reported as [`SommelierError::Pdf`].
pub fn extract_menu_text(bytes: &[u8]) -> Result<String, SommelierError> {
    let text = catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|payload| {
            SommelierError::Pdf(format!("PDF extractor panicked: {}", panic_message(&*payload)))
        })?
        .map_err(|e| SommelierError::Pdf(e.to_string()))?;

    let text = normalize_menu_text(&text);
    if text.is_empty() {
        return Err(SommelierError::Pdf("PDF contains no extractable text".to_string()));
    }
    Ok(text)
}

/// Load the menu, degrading to [`NO_MENU_TEXT`] on any failure.
pub fn load_menu_text_or_fallback(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match load_menu_text(path) {
        Ok(text) => {
            tracing::info!(path = %path.display(), chars = text.len(), "menu loaded");
            text
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Error reading menu PDF: {}", e);
            NO_MENU_TEXT.to_string()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

/// Trim each line and drop blank ones; page breaks become single newlines.
fn normalize_menu_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back() {
        let text = load_menu_text_or_fallback("/nonexistent/menu.pdf");
        assert_eq!(text, NO_MENU_TEXT);
    }

    #[test]
    fn garbage_bytes_are_a_pdf_error() {
        let err = extract_menu_text(b"not a pdf").unwrap_err();
        assert!(matches!(err, SommelierError::Pdf(_)));
    }

    /// One-page PDF whose content stream selects `/F9`, which `/Resources` lacks.
    fn pdf_with_missing_font() -> Vec<u8> {
        let content = "BT /F9 12 Tf 72 712 Td (Hello) Tj ET";
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn missing_font_falls_back_instead_of_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.pdf");
        std::fs::write(&path, pdf_with_missing_font()).unwrap();

        let err = load_menu_text(&path).unwrap_err();
        assert!(matches!(err, SommelierError::Pdf(_)), "got: {err}");
        assert_eq!(load_menu_text_or_fallback(&path), NO_MENU_TEXT);
    }

    #[test]
    fn panic_payloads_are_readable() {
        let payload = catch_unwind(|| panic!("bad font {}", 9)).unwrap_err();
        assert_eq!(panic_message(&*payload), "bad font 9");
    }

    #[test]
    fn normalize_drops_blank_lines() {
        let text = normalize_menu_text("  Reds \n\n\n  Malbec  12\n\x0c\nWhites");
        assert_eq!(text, "Reds\nMalbec  12\nWhites");
    }
}
