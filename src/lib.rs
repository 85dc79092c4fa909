//! Cliente de subida de documentos y preguntas contra un servidor RAG.

pub mod backend;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod models;
pub mod page;
pub mod render;

pub use backend::{Backend, HttpBackend};
pub use controller::{Effect, UiEvent, UploadAskController};
pub use error::ClientError;
pub use models::SelectedFile;
pub use page::Page;
