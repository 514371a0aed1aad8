//! Turning the display region into a writable document.

use std::path::Path;

use codegram_render::RenderTarget;

/// Document format written by `generate` and `:save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentFormat {
    /// Bare SVG. Placeholders have no SVG form.
    Svg,
    /// Standalone HTML page embedding the display region.
    Html,
}

impl DocumentFormat {
    /// Infer the format from a file extension, defaulting to SVG.
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
                Self::Html
            }
            _ => Self::Svg,
        }
    }
}

/// Render the display region as a document, if it has a form in `format`.
pub(crate) fn document(target: &RenderTarget, format: DocumentFormat) -> Option<String> {
    match (format, target) {
        (_, RenderTarget::Blank) | (DocumentFormat::Svg, RenderTarget::Placeholder(_)) => None,
        (DocumentFormat::Svg, RenderTarget::Artifact(svg)) => Some(svg.clone()),
        (DocumentFormat::Html, target) => Some(format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>codegram</title></head>\n<body>\n{}\n</body>\n</html>\n",
            target.content()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegram_render::placeholder_html;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_path() {
        let svg = DocumentFormat::from_path(Path::new("out.svg"));
        let html = DocumentFormat::from_path(Path::new("out.HTML"));
        let bare = DocumentFormat::from_path(Path::new("out"));

        assert_eq!(svg, DocumentFormat::Svg);
        assert_eq!(html, DocumentFormat::Html);
        assert_eq!(bare, DocumentFormat::Svg);
    }

    #[test]
    fn test_svg_document_is_the_artifact() {
        let target = RenderTarget::Artifact("<svg></svg>".to_owned());
        assert_eq!(
            document(&target, DocumentFormat::Svg),
            Some("<svg></svg>".to_owned())
        );
    }

    #[test]
    fn test_placeholder_has_no_svg_form() {
        let target = RenderTarget::Placeholder(placeholder_html("boom"));
        assert_eq!(document(&target, DocumentFormat::Svg), None);
    }

    #[test]
    fn test_html_document_embeds_placeholder() {
        let target = RenderTarget::Placeholder(placeholder_html("boom"));
        let html = document(&target, DocumentFormat::Html).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Failed to render diagram: boom"));
    }

    #[test]
    fn test_blank_target_has_no_document() {
        assert_eq!(document(&RenderTarget::Blank, DocumentFormat::Html), None);
    }
}
