//! Modelos de dominio (fichero seleccionado y cuerpos JSON de la API del servidor RAG).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Nombre usado cuando la ruta no tiene componente de fichero.
const FALLBACK_FILE_NAME: &str = "uploaded_file";

/// Fichero elegido por el usuario (selector o arrastrar y soltar).
/// El contenido no se lee hasta que se pulsa "subir".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content: FileContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        Self {
            name,
            content: FileContent::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: FileContent::Memory(Arc::from(bytes.into())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            FileContent::Path(path) => Some(path),
            FileContent::Memory(_) => None,
        }
    }

    /// Lee el contenido completo del fichero.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.content {
            FileContent::Path(path) => tokio::fs::read(path).await,
            FileContent::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Acuse de recibo de `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub message: String,
    pub file: String,
    pub chunks: u64,
}

/// Cuerpo de `POST /api/ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskPayload {
    pub question: String,
}

/// Respuesta de `POST /api/ask`. Ambos campos son opcionales en el cable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskResult {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<SourceCitation>>,
}

impl AskResult {
    pub fn sources(&self) -> &[SourceCitation] {
        self.sources.as_deref().unwrap_or_default()
    }
}

/// Un pasaje citado por el servidor como apoyo de la respuesta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    #[serde(default)]
    pub id: Option<CitationId>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub metadata: Option<SourceMetadata>,
}

/// El servidor numera las fuentes, pero acepta también identificadores de texto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CitationId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for CitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Procedencia del pasaje. Las claves adicionales del cargador se conservan en `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cuerpo de error de FastAPI (`{"detail": ...}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// El detalle como texto. Los errores de validación llegan como lista y se muestran en JSON.
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ask_result_tolerates_missing_fields() {
        let result: AskResult = serde_json::from_value(json!({ "status": "ok" })).unwrap();
        assert_eq!(result.answer, None);
        assert!(result.sources().is_empty());

        let result: AskResult =
            serde_json::from_value(json!({ "answer": null, "sources": null })).unwrap();
        assert!(result.sources().is_empty());
    }

    #[test]
    fn citation_keeps_loader_metadata() {
        let citation: SourceCitation = serde_json::from_value(json!({
            "id": 2,
            "page": null,
            "metadata": { "source": "/tmp/tmpx1", "page": 4, "author": "ACME" },
            "snippet": "texto"
        }))
        .unwrap();

        assert_eq!(citation.id.as_ref().map(ToString::to_string).as_deref(), Some("2"));
        assert_eq!(citation.page, None);
        let metadata = citation.metadata.unwrap();
        assert_eq!(metadata.source.as_deref(), Some("/tmp/tmpx1"));
        assert_eq!(metadata.extra.get("author"), Some(&json!("ACME")));
    }

    #[test]
    fn citation_id_may_be_text() {
        let citation: SourceCitation =
            serde_json::from_value(json!({ "id": "doc-7#3" })).unwrap();
        assert_eq!(citation.id.unwrap().to_string(), "doc-7#3");
    }

    #[test]
    fn upload_result_ignores_status_field() {
        let result: UploadResult = serde_json::from_value(json!({
            "status": "ok",
            "message": "Index built successfully",
            "chunks": 12,
            "file": "a.pdf"
        }))
        .unwrap();
        assert_eq!(result.chunks, 12);
        assert_eq!(result.file, "a.pdf");
    }

    #[test]
    fn error_detail_variants() {
        let body: ErrorBody = serde_json::from_value(json!({ "detail": "bad question" })).unwrap();
        assert_eq!(body.detail_message().as_deref(), Some("bad question"));

        let body: ErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.detail_message(), None);

        let body: ErrorBody =
            serde_json::from_value(json!({ "detail": [{ "loc": ["body"], "msg": "field required" }] }))
                .unwrap();
        assert!(body.detail_message().unwrap().contains("field required"));
    }

    #[test]
    fn selected_file_name_from_path() {
        let file = SelectedFile::from_path("/home/ana/informes/a.pdf");
        assert_eq!(file.name(), "a.pdf");
        assert!(file.path().is_some());
    }

    #[tokio::test]
    async fn in_memory_file_reads_back() {
        let file = SelectedFile::from_bytes("notas.txt", b"hola".to_vec());
        assert_eq!(file.read().await.unwrap(), b"hola");
        assert!(file.path().is_none());
    }
}
