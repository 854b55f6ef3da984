pub mod auth;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod openapi;
pub mod registry;
pub mod scanner;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::feed::NotificationFeed;
use crate::handlers::{
    book_class, cancel_booking, cancel_booking_by_class, create_class, delete_booking,
    delete_class, healthz_live, healthz_ready, list_classes, list_notifications,
    mark_notification_read, my_bookings, not_found, root, update_class,
};
use crate::ledger::BookingLedger;
use crate::openapi::ApiDoc;
use crate::registry::ClassRegistry;
use crate::scanner::ReminderScanner;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub registry: Arc<ClassRegistry>,
    pub ledger: Arc<BookingLedger>,
    pub feed: Arc<NotificationFeed>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let registry = Arc::new(ClassRegistry::new());
        let feed = Arc::new(NotificationFeed::new());
        let ledger = Arc::new(BookingLedger::new(registry.clone(), feed.clone()));
        Self {
            settings,
            registry,
            ledger,
            feed,
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::new(settings);

    let scanner = ReminderScanner::new(
        state.ledger.clone(),
        state.registry.clone(),
        state.feed.clone(),
    );
    let scanner_handle = scanner.spawn(Duration::from_secs(state.settings.reminder_interval_secs));

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting FitTime Booking API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scanner_handle.abort();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let classes = Router::new()
        .route("/", post(create_class).get(list_classes))
        .route("/{id}", put(update_class).delete(delete_class));

    let bookings = Router::new()
        .route("/my-bookings", get(my_bookings))
        .route("/book-class", post(book_class))
        .route("/{id}/cancel", put(cancel_booking))
        .route("/class/{class_id}/cancel", put(cancel_booking_by_class))
        .route("/{id}", delete(delete_booking));

    let notifications = Router::new()
        .route("/", get(list_notifications))
        .route("/{id}/read", put(mark_notification_read));

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .nest("/api/classes", classes)
        .nest("/api/bookings", bookings)
        .nest("/api/notifications", notifications)
        .fallback(not_found)
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
