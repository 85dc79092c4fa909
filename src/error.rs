//! Errores de las operaciones contra el servidor RAG.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Respuesta no-2xx. `detail` es el mensaje del servidor, si lo envió.
    #[error("el servidor respondió {status}")]
    Server {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("respuesta JSON no válida: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Texto que se muestra al usuario: el `detail` del servidor, el mensaje
    /// genérico de la operación si el servidor no dio detalle, o el mensaje
    /// del propio error de transporte.
    pub fn reason(&self, generic: &str) -> String {
        match self {
            Self::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Server { detail: None, .. } => generic.to_string(),
            other => other.to_string(),
        }
    }
}
