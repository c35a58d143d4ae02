pub mod analytics;
pub mod client;
pub mod configuration;
pub mod domain;
pub mod email_client;
mod error;
pub mod metrics;
pub mod routes;
pub mod service;
pub mod state;
pub mod telemetry;

use anyhow::Context;
use axum::{body::Body, Router, Server};
use configuration::Settings;
use http::Request;
use metrics::ContactMetrics;
use state::{AppState, MailService};
use std::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

#[derive(Debug)]
pub struct App {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl App {
    /// Bind the listener and wire up all services from `settings`.
    ///
    /// Incomplete mail settings do not stop the app from starting. Contact
    /// submissions are answered with a configuration error until they are
    /// fixed.
    pub fn build(settings: Settings) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(settings.application().address())
            .with_context(|| format!("Failed to bind {}", settings.application().address()))?;
        let port = listener.local_addr()?.port();

        let mail = match MailService::from_settings(
            settings.email(),
            settings.application().site_name(),
        ) {
            Ok(mail) => Some(mail),
            Err(e) => {
                tracing::warn!(
                    error.message = %e,
                    "Mail settings are incomplete, contact submissions will be refused"
                );
                None
            }
        };
        let tracking_tag = settings
            .analytics()
            .tracking_tag()
            .context("Invalid analytics settings")?;

        let app_state = AppState::new(mail, ContactMetrics::new()?, tracking_tag);

        Ok(Self {
            port,
            listener,
            router: Self::build_router(app_state),
        })
    }

    /// The port the app is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve the app until the server is stopped.
    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Server running at {}", self.listener.local_addr()?);

        Server::from_tcp(self.listener)?
            .serve(self.router.into_make_service())
            .await?;
        Ok(())
    }

    /// Build the router for the application.
    fn build_router(app_state: AppState) -> Router {
        Router::new()
            .nest("/health", routes::health::create_router())
            .nest("/contact", routes::contact::create_router())
            .nest("/analytics", routes::analytics::create_router())
            .nest("/metrics", metrics::create_router())
            .with_state(app_state)
            .nest("/docs", routes::docs::create_router())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(
                        TraceLayer::new_for_http()
                            .make_span_with(|request: &Request<Body>| {
                                let request_id = request
                                    .headers()
                                    .get("x-request-id")
                                    .and_then(|id| id.to_str().ok())
                                    .unwrap_or_default();
                                tracing::info_span!(
                                    "request",
                                    %request_id,
                                    method = %request.method(),
                                    uri = %request.uri(),
                                )
                            })
                            .on_request(DefaultOnRequest::new().level(Level::INFO))
                            .on_response(DefaultOnResponse::new().level(Level::INFO)),
                    )
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }
}
