//! HTTP server for the order management API.
//!
//! This module provides the router and thin request handlers; the endpoint
//! logic lives in the `apis` modules.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::Json,
	routing::{get, put},
	Router,
};
use crate::apis;
use order_config::ServerConfig;
use order_core::{Health, OrderLifecycle};
use order_storage::StorageService;
use order_types::{
	CreateOrderRequest, Order, OrderStatus, ProblemDetail, StatusUpdateRequest,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// The order lifecycle engine.
	pub lifecycle: Arc<OrderLifecycle>,
	/// Storage service, probed by the health endpoint.
	pub storage: Arc<StorageService>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for all endpoints.
pub async fn start_server(
	server_config: ServerConfig,
	lifecycle: Arc<OrderLifecycle>,
	storage: Arc<StorageService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app_state = AppState { lifecycle, storage };

	// Build the router with /api base path
	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/ping", get(handle_ping))
				.route("/health", get(handle_health))
				.route("/orders", get(handle_list_orders).post(handle_create_order))
				.route("/orders/{id}", get(handle_get_order))
				.route("/orders/{id}/status", put(handle_update_status))
				.route("/orders/{id}/status/next", get(handle_next_statuses)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", server_config.host, server_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Order API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles GET /api/ping requests.
async fn handle_ping() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

/// Handles GET /api/health requests.
async fn handle_health(State(state): State<AppState>) -> Json<Health> {
	Json(apis::health::check(&state.storage).await)
}

/// Handles GET /api/orders requests.
async fn handle_list_orders(
	State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, ProblemDetail> {
	apis::orders::list_orders(&state.lifecycle).await.map(Json)
}

/// Handles POST /api/orders requests.
async fn handle_create_order(
	State(state): State<AppState>,
	payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ProblemDetail> {
	let Json(request) = payload.map_err(reject_body)?;
	let order = apis::orders::create_order(&state.lifecycle, request).await?;
	Ok((StatusCode::CREATED, Json(order)))
}

/// Handles GET /api/orders/{id} requests.
async fn handle_get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Order>, ProblemDetail> {
	apis::orders::get_order(&state.lifecycle, &id).await.map(Json)
}

/// Handles PUT /api/orders/{id}/status requests.
async fn handle_update_status(
	Path(id): Path<String>,
	State(state): State<AppState>,
	payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Order>, ProblemDetail> {
	let Json(request) = payload.map_err(reject_body)?;
	apis::status::update_status(&state.lifecycle, &id, request)
		.await
		.map(Json)
}

/// Handles GET /api/orders/{id}/status/next requests.
async fn handle_next_statuses(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Vec<OrderStatus>>, ProblemDetail> {
	apis::status::next_statuses(&state.lifecycle, &id)
		.await
		.map(Json)
}

/// Maps a JSON extractor rejection (malformed body, missing or unrecognized
/// fields such as `targetStatus`) to a 400 problem detail.
fn reject_body(rejection: JsonRejection) -> ProblemDetail {
	tracing::debug!("Rejected request body: {}", rejection.body_text());
	ProblemDetail::validation(rejection.body_text(), None)
}
