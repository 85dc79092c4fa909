//! Acceso a los dos endpoints del servidor RAG (`/api/upload` y `/api/ask`).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    config::{endpoint_url, ClientConfig},
    error::ClientError,
    models::{AskPayload, AskResult, ErrorBody, SelectedFile, UploadResult},
};

pub const UPLOAD_PATH: &str = "api/upload";
pub const ASK_PATH: &str = "api/ask";

/// Nombre del campo multipart que espera el servidor.
pub const UPLOAD_FIELD: &str = "file";

/// Las dos operaciones remotas que usa el controlador.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadResult, ClientError>;
    async fn ask(&self, question: &str) -> Result<AskResult, ClientError>;
}

/// Implementación HTTP con `reqwest`. Sin timeout ni reintentos.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    upload_url: Url,
    ask_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &Url) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            upload_url: endpoint_url(base_url, UPLOAD_PATH)?,
            ask_url: endpoint_url(base_url, ASK_PATH)?,
        })
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            upload_url: cfg.endpoint(UPLOAD_PATH)?,
            ask_url: cfg.endpoint(ASK_PATH)?,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadResult, ClientError> {
        let bytes = file.read().await?;
        let mime = mime_guess::from_path(file.name()).first_or_octet_stream();
        debug!(
            "POST {} ({}, {} bytes, {})",
            self.upload_url,
            file.name(),
            bytes.len(),
            mime
        );

        let part = Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(mime.essence_str())?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let res = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        decode(res).await
    }

    async fn ask(&self, question: &str) -> Result<AskResult, ClientError> {
        debug!("POST {} ({} caracteres)", self.ask_url, question.len());
        let res = self
            .client
            .post(self.ask_url.clone())
            .json(&AskPayload {
                question: question.to_string(),
            })
            .send()
            .await?;
        decode(res).await
    }
}

/// Convierte la respuesta en `T` o, si no es 2xx, en `ClientError::Server`
/// con el `detail` del cuerpo. Un cuerpo de error que no es JSON es un
/// `ClientError::Decode`; uno vacío cuenta como error sin detalle.
async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    let body = res.bytes().await?;

    if !status.is_success() {
        let detail = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice::<ErrorBody>(&body)?.detail_message()
        };
        debug!("Respuesta {} del servidor: {:?}", status, detail);
        return Err(ClientError::Server { status, detail });
    }

    Ok(serde_json::from_slice(&body)?)
}
