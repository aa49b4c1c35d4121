use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use entity::employees;
use platform_api::{ApiError, ApiResult};
use platform_db::DbPool;
use sea_orm::{ConnectionTrait, Statement};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::AppConfig,
    service::{EmployeeService, NewEmployee, ServiceError},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub employees: EmployeeService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Arc<AppConfig>) -> Self {
        Self {
            employees: EmployeeService::new(pool.clone()),
            pool,
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/{id}",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeePayload {
    first_name: String,
    last_name: String,
    email: String,
}

impl From<EmployeePayload> for NewEmployee {
    fn from(value: EmployeePayload) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            dup @ ServiceError::DuplicateEmail(_) => ApiError::Conflict(dup.to_string()),
            ServiceError::Db(db) => ApiError::internal(db.into()),
        }
    }
}

async fn create_employee_handler(
    State(state): State<AppState>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<(StatusCode, Json<employees::Model>)> {
    let created = state.employees.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_employees_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<employees::Model>>> {
    Ok(Json(state.employees.list().await?))
}

async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<employees::Model>> {
    let found = state.employees.find(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(found))
}

async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<Json<employees::Model>> {
    state.employees.find(id).await?.ok_or(ApiError::NotFound)?;
    let updated = state
        .employees
        .update(employees::Model {
            id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
        })
        .await?;
    Ok(Json(updated))
}

async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.employees.delete(id).await?;
    Ok(StatusCode::OK)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.pool.get_database_backend();
    let db_ok = state
        .pool
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
