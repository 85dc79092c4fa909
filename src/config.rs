//! Carga y gestión de configuración del cliente (servidor RAG + arranque).

use std::env;
use anyhow::{anyhow, Result};
use url::Url;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Configuración completa del cliente.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub server_url: Url,
    pub open_browser: bool,
}

impl ClientConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let server_url =
            env::var("RAG_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let open_browser = match env::var("RAG_OPEN_BROWSER") {
            Ok(value) => parse_flag(&value)?,
            Err(_) => false,
        };

        Ok(Self {
            server_url: parse_server_url(&server_url)?,
            open_browser,
        })
    }

    /// URL completa de un endpoint relativo (`api/upload`, `api/ask`).
    /// Conserva el prefijo de ruta de la URL base, si lo hay.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        endpoint_url(&self.server_url, path)
    }
}

pub fn parse_server_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| anyhow!("RAG_SERVER_URL no es una URL válida: {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(anyhow!("Esquema no soportado en RAG_SERVER_URL: {other}")),
    }
    // Sin la barra final, `join` sustituiría el último segmento de la ruta.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub fn endpoint_url(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| anyhow!("No se pudo construir la URL de {path}: {e}"))
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow!("Valor no válido para RAG_OPEN_BROWSER: {other}")),
    }
}
