//! Estado de la página (equivalente al DOM) que el controlador actualiza y publica.

use crate::models::SelectedFile;
use crate::render::{sources_html, SourceBlock};

/// Estado visible de la página que maneja el controlador.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Indicación visual de arrastre sobre la zona de soltar.
    pub dropzone_active: bool,
    /// Contenido del selector de ficheros nativo.
    pub file_input: Vec<SelectedFile>,
    pub upload_status: String,
    pub question: String,
    pub loading_visible: bool,
    pub answer: String,
    pub sources: Vec<SourceBlock>,
}

impl Page {
    pub fn sources_html(&self) -> String {
        sources_html(&self.sources)
    }
}
