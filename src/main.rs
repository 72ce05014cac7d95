use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vendor_recs::config::{LoggingSettings, Settings, StoreBackend};
use vendor_recs::core::Ranker;
use vendor_recs::routes::{self, recommendations::AppState};
use vendor_recs::services::{DataStore, PostgresClient, Recommender, RestClient, RestTables, SessionVerifier};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&logging.level))
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

async fn build_store(settings: &Settings) -> std::io::Result<DataStore> {
    let store = &settings.data_store;
    let missing = |section: &str| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("data_store.{} section is required for the selected backend", section),
        )
    };

    match store.backend {
        StoreBackend::Rest => {
            let rest = store.rest.as_ref().ok_or_else(|| missing("rest"))?;
            let tables = RestTables {
                vendors: store.vendors_table.clone(),
                profiles: store.profiles_table.clone(),
            };
            let client = RestClient::new(rest.url.clone(), rest.api_key.clone(), tables)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            info!("REST data store client initialized ({})", rest.url);
            Ok(DataStore::Rest(client))
        }
        StoreBackend::Postgres => {
            let pg = store.postgres.as_ref().ok_or_else(|| missing("postgres"))?;
            let client = PostgresClient::from_settings(
                &pg.url,
                pg.max_connections,
                pg.min_connections,
                pg.acquire_timeout_secs,
                pg.idle_timeout_secs,
            )
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
            .with_tables(store.vendors_table.clone(), store.profiles_table.clone());
            info!(
                "PostgreSQL client initialized (max: {} connections)",
                pg.max_connections.unwrap_or(10)
            );
            Ok(DataStore::Postgres(client))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default()
        .with_env_overrides();
    init_logging(&logging);

    info!("Starting vendor recommendation service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    let store = Arc::new(build_store(&settings).await.map_err(|e| {
        error!("Failed to initialize data store: {}", e);
        e
    })?);

    let recs = &settings.recommendations;
    let ranker = Ranker::new(recs.default_limit, recs.category_limit, recs.max_limit);
    info!("Ranker initialized: {:?}", ranker);

    let verifier = match &settings.auth.jwt_secret {
        Some(secret) => {
            info!("Bearer token verification enabled");
            Some(Arc::new(SessionVerifier::new(secret, settings.auth.audience.as_deref())))
        }
        None => {
            info!("No JWT secret configured, all callers are anonymous");
            None
        }
    };

    let app_state = AppState {
        store: Arc::clone(&store),
        recommender: Recommender::new(store, ranker),
        verifier,
        default_categories: recs.default_categories.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .client_request_timeout(Duration::from_secs(30))
    .bind((host, port))?
    .run()
    .await
}
