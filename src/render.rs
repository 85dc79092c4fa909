//! Presentación: bloques de fuentes, escape HTML y volcado de la página a texto.

use crate::models::{SourceCitation, SourceMetadata};
use crate::page::Page;

pub const NO_ANSWER: &str = "(No answer)";
pub const UNKNOWN_SOURCE: &str = "uploaded document";
const MISSING_ID: &str = "?";

/// Una cita ya resuelta para mostrarse. El fragmento se guarda sin escapar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    pub id: String,
    pub display_name: String,
    pub page: Option<i64>,
    pub snippet: String,
}

impl SourceBlock {
    pub fn from_citation(citation: &SourceCitation) -> Self {
        Self {
            id: citation
                .id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| MISSING_ID.to_string()),
            display_name: display_name(citation.metadata.as_ref()).to_string(),
            page: citation.page,
            snippet: citation.snippet.clone().unwrap_or_default(),
        }
    }

    /// ` | page N`, o vacío si la cita no trae página.
    pub fn page_suffix(&self) -> String {
        self.page.map(|p| format!(" | page {p}")).unwrap_or_default()
    }

    /// `Source 1 — doc.pdf | page 3`
    pub fn meta_line(&self) -> String {
        format!("Source {} — {}{}", self.id, self.display_name, self.page_suffix())
    }

    pub fn snippet_html(&self) -> String {
        escape_html(&self.snippet)
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"source\">\
             <div class=\"meta\"><strong>Source {}</strong> — {}{}</div>\
             <div class=\"snippet\">{}</div>\
             </div>",
            escape_html(&self.id),
            escape_html(&self.display_name),
            self.page_suffix(),
            self.snippet_html()
        )
    }
}

/// `metadata.source`, luego `metadata.file`, luego el rótulo genérico.
/// Las cadenas vacías cuentan como ausentes.
pub fn display_name(metadata: Option<&SourceMetadata>) -> &str {
    metadata
        .and_then(|m| {
            [m.source.as_deref(), m.file.as_deref()]
                .into_iter()
                .flatten()
                .find(|name| !name.is_empty())
        })
        .unwrap_or(UNKNOWN_SOURCE)
}

/// Escapa los cinco caracteres reservados de HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

pub fn sources_html(blocks: &[SourceBlock]) -> String {
    blocks.iter().map(SourceBlock::to_html).collect()
}

/// Vuelca la página a texto plano para la consola.
pub fn render_text(page: &Page) -> String {
    let mut out = String::new();

    let zone = if page.dropzone_active { " [activa]" } else { "" };
    let selected = page
        .file_input
        .first()
        .map(|f| f.name().to_string())
        .unwrap_or_else(|| "(ninguno)".to_string());
    out.push_str(&format!("Fichero{zone}: {selected}\n"));
    if !page.upload_status.is_empty() {
        out.push_str(&format!("Estado: {}\n", page.upload_status));
    }
    if !page.question.is_empty() {
        out.push_str(&format!("Pregunta: {}\n", page.question));
    }
    if page.loading_visible {
        out.push_str("Cargando…\n");
    }
    if !page.answer.is_empty() {
        out.push_str(&format!("Respuesta: {}\n", page.answer));
    }
    for block in &page.sources {
        out.push_str(&format!("  {}\n", block.meta_line()));
        if !block.snippet.is_empty() {
            out.push_str(&format!("    {}\n", block.snippet));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CitationId;
    use serde_json::json;

    fn citation(value: serde_json::Value) -> SourceCitation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn escapes_all_reserved_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_html("sin marcas"), "sin marcas");
    }

    #[test]
    fn display_name_precedence() {
        let both = SourceMetadata {
            source: Some("doc.pdf".into()),
            file: Some("otro.pdf".into()),
            ..Default::default()
        };
        assert_eq!(display_name(Some(&both)), "doc.pdf");

        let file_only = SourceMetadata {
            file: Some("otro.pdf".into()),
            ..Default::default()
        };
        assert_eq!(display_name(Some(&file_only)), "otro.pdf");

        let empty_source = SourceMetadata {
            source: Some(String::new()),
            file: Some("otro.pdf".into()),
            ..Default::default()
        };
        assert_eq!(display_name(Some(&empty_source)), "otro.pdf");

        assert_eq!(display_name(Some(&SourceMetadata::default())), UNKNOWN_SOURCE);
        assert_eq!(display_name(None), UNKNOWN_SOURCE);
    }

    #[test]
    fn block_with_page_and_markup_snippet() {
        let block = SourceBlock::from_citation(&citation(json!({
            "id": 1,
            "snippet": "<b>x</b>",
            "page": 3,
            "metadata": { "source": "doc.pdf" }
        })));

        assert_eq!(block.id, "1");
        assert_eq!(block.meta_line(), "Source 1 — doc.pdf | page 3");
        assert_eq!(block.snippet_html(), "&lt;b&gt;x&lt;/b&gt;");

        let html = block.to_html();
        assert!(html.contains("<strong>Source 1</strong> — doc.pdf | page 3"));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn page_zero_is_still_shown() {
        let block = SourceBlock::from_citation(&citation(json!({ "id": 4, "page": 0 })));
        assert_eq!(block.page_suffix(), " | page 0");
    }

    #[test]
    fn block_without_optional_fields() {
        let block = SourceBlock::from_citation(&SourceCitation {
            id: Some(CitationId::Text("a".into())),
            ..Default::default()
        });
        assert_eq!(block.meta_line(), "Source a — uploaded document");
        assert_eq!(block.snippet, "");

        let block = SourceBlock::from_citation(&SourceCitation::default());
        assert_eq!(block.id, "?");
    }

    #[test]
    fn sources_html_keeps_order() {
        let blocks: Vec<_> = [1, 2, 3]
            .into_iter()
            .map(|id| SourceBlock::from_citation(&citation(json!({ "id": id }))))
            .collect();
        let html = sources_html(&blocks);
        let first = html.find("Source 1").unwrap();
        let second = html.find("Source 2").unwrap();
        let third = html.find("Source 3").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn text_render_while_loading() {
        let page = Page {
            question: "¿de qué trata?".into(),
            loading_visible: true,
            ..Default::default()
        };
        let text = render_text(&page);
        assert!(text.contains("Pregunta: ¿de qué trata?\n"));
        assert!(text.contains("Cargando…"));
        assert!(!text.contains("Respuesta"));
    }

    #[test]
    fn text_render_of_answer_and_sources() {
        let page = Page {
            answer: "42".into(),
            sources: vec![SourceBlock {
                id: "1".into(),
                display_name: "doc.pdf".into(),
                page: None,
                snippet: "fragmento".into(),
            }],
            ..Default::default()
        };
        let text = render_text(&page);
        assert!(text.contains("Respuesta: 42"));
        assert!(text.contains("Source 1 — doc.pdf\n"));
        assert!(text.contains("    fragmento"));
        assert!(!text.contains("Cargando"));
    }
}
