// Módulos de la aplicación
mod api;
mod app_state;
mod codegen;
mod config;
mod crawler;
mod github;
mod language;
mod models;
mod planner;
mod publish;
mod store;
mod templates;

use crate::{
    app_state::AppState,
    publish::DisabledPublisher,
    store::{InMemoryStore, Post},
};
use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Cargar .env e inicializar logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Cargar configuración
    let cfg = config::AppConfig::from_env().context("Error al cargar la configuración")?;
    info!(
        "API de GitHub: {} (profundidad máxima de crawl: {})",
        cfg.github_api_url, cfg.crawl_max_depth
    );

    // Crear canal para la señal de apagado.
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    // 3. Crear estado compartido de la aplicación
    let app_state = AppState::new(
        cfg.clone(),
        Arc::new(DisabledPublisher),
        Arc::new(InMemoryStore::with_records(vec![Post::new(
            "1",
            "¡Bienvenido al generador de tests!",
        )])),
        Some(shutdown_tx),
    );

    // 4. Configurar el router de la API y el servicio de ficheros estáticos
    let app = Router::new()
        .merge(api::create_router(app_state))
        .fallback_service(ServeDir::new(&cfg.frontend_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // 5. Iniciar el servidor
    let listener = tokio::net::TcpListener::bind(&cfg.server_addr)
        .await
        .with_context(|| format!("No se pudo escuchar en {}", cfg.server_addr))?;
    let server_url = format!("http://{}", cfg.server_addr);
    info!("🚀 Servidor escuchando en {}", &server_url);

    if cfg.open_browser && webbrowser::open(&server_url).is_err() {
        info!("No se pudo abrir el navegador. Por favor, accede a {} manualmente.", server_url);
    }

    // Configurar el apagado ordenado.
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            info!("Señal de apagado recibida, iniciando cierre del servidor.");
        })
        .await
        .context("Error en el servidor HTTP")?;

    info!("✅ Servidor cerrado correctamente.");
    Ok(())
}
