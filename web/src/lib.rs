use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use domain::EventStore;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
pub(crate) mod params;
mod router;

pub use error::{Error, Result};
pub use router::define_routes;

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(config: Config, event_store: Arc<dyn EventStore>) -> Self {
        Self {
            config,
            event_store,
        }
    }

    pub fn event_store_ref(&self) -> &dyn EventStore {
        self.event_store.as_ref()
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state.config.interface.as_deref().unwrap_or("127.0.0.1");
    let server_url = format!("{host}:{}", app_state.config.port);

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    info!("Server starting... listening for connections on http://{server_url}");
    info!("CORS allowed origins: {:?}", app_state.config.allowed_origins);

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let listener = TcpListener::bind(&server_url).await?;

    axum::serve(listener, define_routes(app_state).layer(cors_layer)).await
}
