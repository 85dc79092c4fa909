use anyhow::Result;
use docqa_console::{
    config::ClientConfig,
    console::{self, Command},
    controller::UPLOADING_STATUS,
    render, Effect, HttpBackend, UploadAskController,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Cargar .env e inicializar logging (a stderr, para no mezclarlo con la página)
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // 2. Cargar configuración
    let cfg = ClientConfig::from_env()?;
    info!("Servidor RAG: {}", cfg.server_url);

    // 3. Crear el controlador de la página
    let backend = HttpBackend::from_config(&cfg)?;
    let mut controller = UploadAskController::new(backend);

    // Los estados intermedios (subiendo, cargando) se muestran mientras dura la llamada.
    let mut pages = controller.subscribe();
    tokio::spawn(async move {
        while pages.changed().await.is_ok() {
            let page = pages.borrow_and_update().clone();
            if page.loading_visible || page.upload_status == UPLOADING_STATUS {
                print!("{}", render::render_text(&page));
                std::io::stdout().flush().ok();
            }
        }
    });

    if cfg.open_browser {
        open_in_browser(&cfg);
    }

    // 4. Bucle de órdenes
    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match console::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Help => println!("{}", console::HELP),
            Command::Show => print!("{}", render::render_text(controller.page())),
            Command::Open => open_in_browser(&cfg),
            Command::Quit => break,
            Command::Events(events) => {
                if let Err(e) = console::check_files(&events) {
                    println!("{e}");
                    continue;
                }
                for event in events {
                    if controller.dispatch(event).await == Effect::OpenFileChooser {
                        println!("Usa 'choose <ruta>' para elegir un fichero.");
                    }
                }
                print!("{}", render::render_text(controller.page()));
            }
        }
    }

    info!("✅ Consola cerrada.");
    Ok(())
}

fn open_in_browser(cfg: &ClientConfig) {
    // El servidor sirve su propio frontend en la raíz.
    if webbrowser::open(cfg.server_url.as_str()).is_err() {
        warn!(
            "No se pudo abrir el navegador. Por favor, accede a {} manualmente.",
            cfg.server_url
        );
    }
}
