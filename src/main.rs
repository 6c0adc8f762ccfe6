//! Employee Manager Gateway
//!
//! REST gateway for Employee and Department records with SQLite persistence,
//! plus server-rendered admin list and detail views.

mod api;
mod client;
mod config;
mod db;
mod errors;
mod models;
mod store;
mod views;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use client::{EntityApi, HttpEmployeeApi};
use config::Config;
use db::Repository;
use models::Employee;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    /// Where the admin pages read employees from.
    pub employees: Arc<dyn EntityApi<Employee>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Employee Manager Gateway");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Application name: {}", config.app_name);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let employees: Arc<dyn EntityApi<Employee>> = match HttpEmployeeApi::from_config(&config)? {
        Some(api) => {
            tracing::info!("Admin pages read from {:?}", config.api_base_url);
            Arc::new(api)
        }
        None => repo.clone(),
    };

    // Create application state
    let state = AppState {
        repo,
        employees,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Departments
        .route(
            "/departments",
            get(api::list_departments).post(api::create_department),
        )
        .route(
            "/departments/{id}",
            get(api::get_department)
                .put(api::update_department)
                .patch(api::patch_department)
                .delete(api::delete_department),
        )
        // Employees
        .route(
            "/employees",
            get(api::list_employees).post(api::create_employee),
        )
        .route(
            "/employees/{id}",
            get(api::get_employee)
                .put(api::update_employee)
                .patch(api::patch_employee)
                .delete(api::delete_employee),
        );

    // Admin pages
    let page_routes = Router::new()
        .route(views::EMPLOYEE_ROUTE, get(api::employee_list_page))
        .route("/employee/{id}", get(api::employee_detail_page));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
