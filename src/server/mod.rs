mod health;
mod ring;

use crate::{render::CanvasSize, ring::RingSession, server::health::*};
use actix_cors::Cors;
use actix_web::{App, HttpServer, web::Data};
use std::{net::TcpListener, sync::Arc};
use tokio::sync::Mutex;
use utoipa::OpenApi;
use utoipa_actix_web::AppExt;
use utoipa_swagger_ui::SwaggerUi;

pub type AppState = Arc<AppStateInner>;

#[derive(Debug)]
pub struct AppStateInner {
    pub ring: Mutex<RingSession>,
    /// Used when a drawing request doesn't give its own size
    pub default_canvas: CanvasSize,
}

impl AppStateInner {
    pub fn new(default_canvas: CanvasSize) -> Self {
        Self {
            ring: Mutex::new(RingSession::new()),
            default_canvas,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "health", description = "Health-related endpoints."),
        (name = "ring", description = "Ring state, nodes and drawing.")
    )
)]
pub struct ApiDoc;

pub async fn start_server(state: AppState, listener: TcpListener) -> std::io::Result<()> {
    let data = Data::new(state);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["Content-Type"])
            .max_age(60 * 60 * 12);

        App::new()
            .wrap(cors)
            .into_utoipa_app()
            .openapi(ApiDoc::openapi())
            .service(home)
            .service(health)
            .configure(ring::configure_routes)
            .app_data(data.clone())
            .openapi_service(|api| {
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api/openapi.json", api)
            })
            .into_app()
    })
    .listen(listener)
    .expect("Failed to bind port")
    .run()
    .await
}

#[cfg(test)]
pub async fn start_server_test() -> u16 {
    let state = AppStateInner::new(CanvasSize::DEFAULT);

    let listener = TcpListener::bind("0.0.0.0:0").expect("failed to bind to random port");
    let port = listener
        .local_addr()
        .expect("failed to get local addr")
        .port();

    tokio::spawn(async {
        start_server(Arc::new(state), listener).await.unwrap();
    });

    port
}
