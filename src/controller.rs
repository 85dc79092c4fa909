//! Controlador de la página de subida y preguntas.
//!
//! Cada acción del usuario llega como un [`UiEvent`] a [`UploadAskController::dispatch`].
//! Los eventos se procesan de uno en uno (`&mut self`); las llamadas de red no
//! tienen timeout, no se reintentan y no se protegen contra envíos duplicados.
//!
//! Cada cambio de la página se publica en un canal `watch`, también mientras
//! una llamada está en curso (estado "subiendo", indicador de carga).

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    backend::Backend,
    models::SelectedFile,
    page::Page,
    render::{SourceBlock, NO_ANSWER},
};

pub const CHOOSE_FILE_PROMPT: &str = "Please choose a file first.";
pub const UPLOADING_STATUS: &str = "Uploading & indexing…";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const ASK_FAILED: &str = "Ask failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Clic sobre la zona de soltar.
    DropzoneClick,
    /// Cambio en el selector de ficheros nativo.
    FilesChosen(Vec<SelectedFile>),
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Vec<SelectedFile>),
    /// Nuevo valor del campo de la pregunta.
    QuestionInput(String),
    UploadClick,
    AskClick,
}

/// Lo que el anfitrión debe hacer tras un evento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Cancelar el tratamiento por defecto del navegador (arrastre).
    PreventDefault,
    OpenFileChooser,
}

pub struct UploadAskController<B> {
    backend: B,
    page: Page,
    selected: Option<SelectedFile>,
    updates: watch::Sender<Page>,
}

impl<B: Backend> UploadAskController<B> {
    pub fn new(backend: B) -> Self {
        let (updates, _) = watch::channel(Page::default());
        Self {
            backend,
            page: Page::default(),
            selected: None,
            updates,
        }
    }

    /// Recibe la página cada vez que cambia, incluidos los estados intermedios.
    pub fn subscribe(&self) -> watch::Receiver<Page> {
        self.updates.subscribe()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn dispatch(&mut self, event: UiEvent) -> Effect {
        let effect = self.handle(event).await;
        self.publish();
        effect
    }

    fn publish(&self) {
        self.updates.send_if_modified(|shown| {
            if *shown == self.page {
                return false;
            }
            *shown = self.page.clone();
            true
        });
    }

    async fn handle(&mut self, event: UiEvent) -> Effect {
        match event {
            UiEvent::DropzoneClick => Effect::OpenFileChooser,
            UiEvent::FilesChosen(files) => {
                self.selected = files.first().cloned();
                self.page.file_input = files;
                if let Some(file) = &self.selected {
                    self.page.upload_status = format!("Selected: {}", file.name());
                }
                Effect::None
            }
            UiEvent::DragEnter | UiEvent::DragOver => {
                self.page.dropzone_active = true;
                Effect::PreventDefault
            }
            UiEvent::DragLeave => {
                self.page.dropzone_active = false;
                Effect::PreventDefault
            }
            UiEvent::Drop(files) => {
                self.page.dropzone_active = false;
                if let Some(first) = files.first() {
                    self.page.upload_status = format!("Selected: {}", first.name());
                    self.selected = Some(first.clone());
                    // El selector nativo queda sincronizado con lo soltado.
                    self.page.file_input = files;
                }
                Effect::PreventDefault
            }
            UiEvent::QuestionInput(text) => {
                self.page.question = text;
                Effect::None
            }
            UiEvent::UploadClick => {
                self.upload().await;
                Effect::None
            }
            UiEvent::AskClick => {
                self.ask().await;
                Effect::None
            }
        }
    }

    async fn upload(&mut self) {
        let Some(file) = self.selected.clone() else {
            self.page.upload_status = CHOOSE_FILE_PROMPT.to_string();
            return;
        };

        self.page.upload_status = UPLOADING_STATUS.to_string();
        self.publish();
        info!("Subiendo {} para indexar", file.name());

        self.page.upload_status = match self.backend.upload(&file).await {
            Ok(result) => {
                info!("{} indexado en {} chunks", result.file, result.chunks);
                format!(
                    "✅ {}. File: {} | Chunks: {}",
                    result.message, result.file, result.chunks
                )
            }
            Err(err) => {
                warn!("Error al subir {}: {}", file.name(), err);
                format!("❌ {}", err.reason(UPLOAD_FAILED))
            }
        };
    }

    async fn ask(&mut self) {
        let question = self.page.question.trim().to_string();
        if question.is_empty() {
            debug!("Pregunta vacía, no se envía");
            return;
        }

        self.page.loading_visible = true;
        self.page.answer.clear();
        self.page.sources.clear();
        self.publish();

        match self.backend.ask(&question).await {
            Ok(result) => {
                self.page.answer = result
                    .answer
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .unwrap_or(NO_ANSWER)
                    .to_string();
                self.page.sources = result.sources().iter().map(SourceBlock::from_citation).collect();
                info!("Respuesta recibida con {} fuentes", self.page.sources.len());
            }
            Err(err) => {
                warn!("Error en la consulta: {}", err);
                self.page.answer = format!("❌ {}", err.reason(ASK_FAILED));
            }
        }

        self.page.loading_visible = false;
    }
}
