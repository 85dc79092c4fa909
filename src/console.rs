//! Órdenes de la consola: cada línea escrita se traduce a eventos de la página.

use anyhow::{anyhow, Result};

use crate::controller::UiEvent;
use crate::models::SelectedFile;

pub const HELP: &str = "\
Órdenes:
  choose <ruta>        elegir un fichero (selector)
  click                clic en la zona de soltar
  drag-enter | drag-over | drag-leave
  drop <ruta>...       soltar uno o varios ficheros (\"entre comillas\" si llevan espacios)
  question <texto>     escribir la pregunta
  ask [texto]          preguntar (con el texto dado o el ya escrito)
  upload               subir e indexar el fichero elegido
  show                 mostrar la página
  open                 abrir la página web del servidor
  help                 esta ayuda
  quit                 salir";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Events(Vec<UiEvent>),
    Show,
    Open,
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "" => Command::Empty,
        "choose" => {
            if rest.is_empty() {
                return Err(anyhow!("Uso: choose <ruta>"));
            }
            Command::Events(vec![UiEvent::FilesChosen(vec![SelectedFile::from_path(rest)])])
        }
        "click" => Command::Events(vec![UiEvent::DropzoneClick]),
        "drag-enter" => Command::Events(vec![UiEvent::DragEnter]),
        "drag-over" => Command::Events(vec![UiEvent::DragOver]),
        "drag-leave" => Command::Events(vec![UiEvent::DragLeave]),
        "drop" => {
            let files = split_paths(rest)?
                .into_iter()
                .map(SelectedFile::from_path)
                .collect();
            Command::Events(vec![UiEvent::Drop(files)])
        }
        "question" => Command::Events(vec![UiEvent::QuestionInput(rest.to_string())]),
        "ask" if rest.is_empty() => Command::Events(vec![UiEvent::AskClick]),
        "ask" => Command::Events(vec![
            UiEvent::QuestionInput(rest.to_string()),
            UiEvent::AskClick,
        ]),
        "upload" => Command::Events(vec![UiEvent::UploadClick]),
        "show" => Command::Show,
        "open" => Command::Open,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(anyhow!("Orden desconocida: {other} (escribe 'help')")),
    };
    Ok(command)
}

/// Separa rutas por espacios; las comillas dobles agrupan una ruta con espacios.
fn split_paths(rest: &str) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in rest.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    paths.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if quoted {
        return Err(anyhow!("Falta cerrar las comillas en: {rest}"));
    }
    if pending {
        paths.push(current);
    }
    Ok(paths)
}

/// Un selector nativo sólo entrega ficheros existentes; la consola exige lo mismo.
pub fn check_files(events: &[UiEvent]) -> Result<()> {
    for event in events {
        let files = match event {
            UiEvent::FilesChosen(files) | UiEvent::Drop(files) => files,
            _ => continue,
        };
        for path in files.iter().filter_map(SelectedFile::path) {
            if !path.is_file() {
                return Err(anyhow!("No es un fichero: {}", path.display()));
            }
        }
    }
    Ok(())
}
