//! HTTP server for the bakery API.
//!
//! Routes live under `/api`. Callers authenticate with `Authorization: Bearer <token>`;
//! requests without a credential run as anonymous callers.

use axum::{
	extract::{
		rejection::{JsonRejection, PathRejection, QueryRejection},
		DefaultBodyLimit, FromRequestParts, Path, Query, State,
	},
	http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
	response::{IntoResponse, Json},
	routing::{get, post, put},
	Router,
};
use bakery_config::{ApiConfig, CorsConfig};
use bakery_core::BakeryEngine;
use bakery_types::{
	APIError, CakeRequest, ContactRequest, CreateOrderRequest, Identity, ListQuery,
	UpdateStatusRequest,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{Any, CorsLayer},
	limit::RequestBodyLimitLayer,
	map_response_body::MapResponseBodyLayer,
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the bakery engine for processing requests.
	pub engine: Arc<BakeryEngine>,
}

/// The resolved identity of the caller.
pub struct Caller(pub Identity);

impl FromRequestParts<AppState> for Caller {
	type Rejection = APIError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, APIError> {
		let credential = bearer_token(&parts.headers);
		let identity = state.engine.resolve_identity(credential).await?;
		Ok(Caller(identity))
	}
}

/// Extracts the token from an `Authorization: Bearer` header.
///
/// A header with any other scheme counts as a presented credential, so it resolves to
/// a guest rather than an anonymous caller.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(header::AUTHORIZATION)?;
	let value = value.to_str().unwrap_or("");
	Some(
		value
			.strip_prefix("Bearer ")
			.map(str::trim)
			.unwrap_or(value),
	)
}

fn cors_layer(cors: Option<&CorsConfig>) -> Result<CorsLayer, Box<dyn std::error::Error>> {
	let Some(cors) = cors else {
		return Ok(CorsLayer::permissive());
	};

	let origins = cors
		.allowed_origins
		.iter()
		.map(|o| o.parse::<HeaderValue>())
		.collect::<Result<Vec<_>, _>>()?;
	let mut layer = CorsLayer::new().allow_origin(origins);

	layer = if cors.allowed_methods.is_empty() {
		layer.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
	} else {
		let methods = cors
			.allowed_methods
			.iter()
			.map(|m| m.parse::<Method>())
			.collect::<Result<Vec<_>, _>>()?;
		layer.allow_methods(methods)
	};

	layer = if cors.allowed_headers.is_empty() {
		layer.allow_headers(Any)
	} else {
		let headers = cors
			.allowed_headers
			.iter()
			.map(|h| h.parse::<HeaderName>())
			.collect::<Result<Vec<_>, _>>()?;
		layer.allow_headers(headers)
	};

	Ok(layer)
}

/// Builds the router with every `/api` route and middleware.
pub fn build_router(
	api_config: &ApiConfig,
	engine: Arc<BakeryEngine>,
) -> Result<Router, Box<dyn std::error::Error>> {
	let app_state = AppState { engine };

	let api = Router::new()
		.route("/cakes", get(handle_list_cakes))
		.route("/cakes/{id}", get(handle_get_cake))
		.route("/customizations", get(handle_list_customizations))
		.route("/orders", post(handle_create_order))
		.route("/orders/my-orders", get(handle_my_orders))
		.route("/orders/{id}", get(handle_get_order))
		.route("/contact", post(handle_contact))
		.route("/admin/dashboard/stats", get(handle_dashboard_stats))
		.route("/admin/orders", get(handle_admin_orders))
		.route("/admin/orders/{id}/status", put(handle_update_status))
		.route("/admin/users", get(handle_admin_users))
		.route("/admin/cakes", get(handle_admin_cakes).post(handle_create_cake))
		.route(
			"/admin/cakes/{id}",
			put(handle_update_cake).delete(handle_delete_cake),
		);

	Ok(Router::new()
		.nest("/api", api)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(api_config.timeout_seconds)))
				.layer(cors_layer(api_config.cors.as_ref())?)
				.layer(MapResponseBodyLayer::new(axum::body::Body::new))
				.layer(DefaultBodyLimit::disable())
				.layer(RequestBodyLimitLayer::new(api_config.max_request_size)),
		)
		.with_state(app_state))
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<BakeryEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(&api_config, engine)?;

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Bakery API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

fn bad_body(rejection: JsonRejection) -> APIError {
	tracing::debug!("Rejected request body: {}", rejection.body_text());
	if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
		return APIError::payload_too_large(rejection.body_text());
	}
	APIError::bad_request(rejection.body_text())
}

fn bad_path(rejection: PathRejection) -> APIError {
	APIError::bad_request(rejection.body_text())
}

fn bad_query(rejection: QueryRejection) -> APIError {
	APIError::bad_request(rejection.body_text())
}

/// Handles GET /api/cakes requests.
async fn handle_list_cakes(State(state): State<AppState>) -> Result<impl IntoResponse, APIError> {
	Ok(Json(crate::apis::catalog::list_cakes(&state.engine).await?))
}

/// Handles GET /api/cakes/{id} requests.
async fn handle_get_cake(
	State(state): State<AppState>,
	id: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Path(id) = id.map_err(bad_path)?;
	Ok(Json(crate::apis::catalog::get_cake(&state.engine, id).await?))
}

/// Handles GET /api/customizations requests.
async fn handle_list_customizations(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, APIError> {
	Ok(Json(
		crate::apis::catalog::list_customizations(&state.engine).await?,
	))
}

/// Handles POST /api/orders requests.
async fn handle_create_order(
	State(state): State<AppState>,
	Caller(identity): Caller,
	body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Json(request) = body.map_err(bad_body)?;
	let order = crate::apis::orders::create_order(&state.engine, &identity, request).await?;
	Ok((StatusCode::CREATED, Json(order)))
}

/// Handles GET /api/orders/my-orders requests.
async fn handle_my_orders(
	State(state): State<AppState>,
	Caller(identity): Caller,
) -> Result<impl IntoResponse, APIError> {
	Ok(Json(
		crate::apis::orders::my_orders(&state.engine, &identity).await?,
	))
}

/// Handles GET /api/orders/{id} requests.
async fn handle_get_order(
	State(state): State<AppState>,
	Caller(identity): Caller,
	id: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Path(id) = id.map_err(bad_path)?;
	Ok(Json(
		crate::apis::orders::get_order(&state.engine, &identity, id).await?,
	))
}

/// Handles POST /api/contact requests.
async fn handle_contact(
	State(state): State<AppState>,
	body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Json(request) = body.map_err(bad_body)?;
	Ok(Json(crate::apis::contact::submit(&state.engine, request).await?))
}

/// Handles GET /api/admin/dashboard/stats requests.
async fn handle_dashboard_stats(
	State(state): State<AppState>,
	Caller(identity): Caller,
) -> Result<impl IntoResponse, APIError> {
	Ok(Json(
		crate::apis::admin::dashboard_stats(&state.engine, &identity).await?,
	))
}

/// Handles GET /api/admin/orders requests.
async fn handle_admin_orders(
	State(state): State<AppState>,
	Caller(identity): Caller,
	query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Query(query) = query.map_err(bad_query)?;
	Ok(Json(
		crate::apis::admin::list_orders(&state.engine, &identity, &query).await?,
	))
}

/// Handles PUT /api/admin/orders/{id}/status requests.
async fn handle_update_status(
	State(state): State<AppState>,
	Caller(identity): Caller,
	id: Result<Path<u64>, PathRejection>,
	body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Path(id) = id.map_err(bad_path)?;
	let Json(request) = body.map_err(bad_body)?;
	Ok(Json(
		crate::apis::admin::update_status(&state.engine, &identity, id, request).await?,
	))
}

/// Handles GET /api/admin/users requests.
async fn handle_admin_users(
	State(state): State<AppState>,
	Caller(identity): Caller,
	query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Query(query) = query.map_err(bad_query)?;
	Ok(Json(
		crate::apis::admin::list_users(&state.engine, &identity, &query).await?,
	))
}

/// Handles GET /api/admin/cakes requests.
async fn handle_admin_cakes(
	State(state): State<AppState>,
	Caller(identity): Caller,
) -> Result<impl IntoResponse, APIError> {
	Ok(Json(
		crate::apis::admin::list_cakes(&state.engine, &identity).await?,
	))
}

/// Handles POST /api/admin/cakes requests.
async fn handle_create_cake(
	State(state): State<AppState>,
	Caller(identity): Caller,
	body: Result<Json<CakeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Json(request) = body.map_err(bad_body)?;
	let created = crate::apis::admin::create_cake(&state.engine, &identity, request).await?;
	Ok((StatusCode::CREATED, Json(created)))
}

/// Handles PUT /api/admin/cakes/{id} requests.
async fn handle_update_cake(
	State(state): State<AppState>,
	Caller(identity): Caller,
	id: Result<Path<u64>, PathRejection>,
	body: Result<Json<CakeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Path(id) = id.map_err(bad_path)?;
	let Json(request) = body.map_err(bad_body)?;
	Ok(Json(
		crate::apis::admin::update_cake(&state.engine, &identity, id, request).await?,
	))
}

/// Handles DELETE /api/admin/cakes/{id} requests.
async fn handle_delete_cake(
	State(state): State<AppState>,
	Caller(identity): Caller,
	id: Result<Path<u64>, PathRejection>,
) -> Result<impl IntoResponse, APIError> {
	let Path(id) = id.map_err(bad_path)?;
	Ok(Json(
		crate::apis::admin::delete_cake(&state.engine, &identity, id).await?,
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::factory_registry::build_engine_from_config;
	use axum::body::Body;
	use axum::http::Request;
	use bakery_account::NewUser;
	use bakery_catalog::{CakeDraft, CatalogStore, CustomizationCatalog, OptionDraft};
	use bakery_config::ConfigBuilder;
	use chrono::{Days, Utc};
	use rust_decimal::dec;
	use serde_json::{json, Value};
	use tower::ServiceExt;

	struct TestApp {
		router: Router,
		admin_token: String,
		user_token: String,
	}

	fn api_config() -> ApiConfig {
		ApiConfig {
			enabled: true,
			host: "127.0.0.1".into(),
			port: 0,
			timeout_seconds: 5,
			max_request_size: 16 * 1024,
			cors: None,
		}
	}

	async fn app() -> TestApp {
		let engine = Arc::new(build_engine_from_config(ConfigBuilder::new().build()).unwrap());
		let directory = engine.directory();
		for (name, email, is_admin) in [
			("Olive", "olive@example.com", true),
			("Emma", "emma@example.com", false),
		] {
			directory
				.register_user(NewUser {
					name: name.into(),
					email: email.into(),
					phone: None,
					is_admin,
				})
				.await
				.unwrap();
		}
		engine
			.catalog()
			.upsert_cake(CakeDraft {
				id: None,
				name: "Vanilla Bliss".into(),
				description: String::new(),
				unit_price: dec!(40.00),
				image_url: None,
			})
			.await
			.unwrap();
		engine
			.catalog()
			.upsert_option(OptionDraft {
				id: None,
				category: "topping".into(),
				name: "Sprinkles".into(),
				price: dec!(5.00),
				active: true,
				per_unit: false,
				description: None,
			})
			.await
			.unwrap();

		TestApp {
			admin_token: directory.issue_token("olive@example.com").await.unwrap(),
			user_token: directory.issue_token("emma@example.com").await.unwrap(),
			router: build_router(&api_config(), engine).unwrap(),
		}
	}

	async fn send(
		app: &TestApp,
		method: Method,
		uri: &str,
		token: Option<&str>,
		body: Option<Value>,
	) -> (StatusCode, Value) {
		let mut request = Request::builder().method(method).uri(uri);
		if let Some(token) = token {
			request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
		}
		let request = match body {
			Some(body) => request
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(body.to_string()))
				.unwrap(),
			None => request.body(Body::empty()).unwrap(),
		};
		let response = app.router.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let value = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap_or(Value::Null)
		};
		(status, value)
	}

	fn order_body() -> Value {
		// Two days out so the test does not depend on the time of day
		let date = Utc::now().date_naive() + Days::new(2);
		json!({
			"cake_id": 1,
			"quantity": 2,
			"customer_name": "Emma Johnson",
			"customer_email": "emma@example.com",
			"customer_phone": "555-123-4567",
			"delivery_date": date.format("%Y-%m-%d").to_string(),
			"customizations": [1],
			"total_price": "0.01"
		})
	}

	#[test]
	fn test_bearer_token() {
		let mut headers = HeaderMap::new();
		assert_eq!(bearer_token(&headers), None);
		headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
		assert_eq!(bearer_token(&headers), Some("abc"));
		headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
		assert_eq!(bearer_token(&headers), Some("Basic abc"));
	}

	#[tokio::test]
	async fn test_public_catalog() {
		let app = app().await;
		let (status, cakes) = send(&app, Method::GET, "/api/cakes", None, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(cakes[0]["name"], "Vanilla Bliss");

		let (status, _) = send(&app, Method::GET, "/api/cakes/7", None, None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);

		let (status, _) = send(&app, Method::GET, "/api/cakes/abc", None, None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);

		let (status, options) = send(&app, Method::GET, "/api/customizations", None, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(options.as_array().unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_guest_order_flow() {
		let app = app().await;
		let (status, order) = send(&app, Method::POST, "/api/orders", None, Some(order_body())).await;
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(order["total_price"], "85.00");
		assert_eq!(order["status"], "pending");
		assert_eq!(order["cake_name"], "Vanilla Bliss");
		assert!(order["owner_id"].is_null());

		let (status, body) = send(&app, Method::GET, "/api/orders/1", None, None).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);
		assert_eq!(body["error"], "UNAUTHENTICATED");

		let (status, _) =
			send(&app, Method::GET, "/api/orders/1", Some(&app.user_token), None).await;
		assert_eq!(status, StatusCode::FORBIDDEN);

		let (status, _) =
			send(&app, Method::GET, "/api/orders/1", Some(&app.admin_token), None).await;
		assert_eq!(status, StatusCode::OK);
	}

	#[tokio::test]
	async fn test_my_orders() {
		let app = app().await;
		send(&app, Method::POST, "/api/orders", Some(&app.user_token), Some(order_body())).await;
		send(&app, Method::POST, "/api/orders", None, Some(order_body())).await;

		let (status, orders) =
			send(&app, Method::GET, "/api/orders/my-orders", Some(&app.user_token), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(orders.as_array().unwrap().len(), 1);
		assert_eq!(orders[0]["owner_id"], 2);

		let (status, _) =
			send(&app, Method::GET, "/api/orders/my-orders", Some("forged"), None).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_validation_errors() {
		let app = app().await;
		let mut body = order_body();
		body["delivery_date"] = json!("2020-01-01");
		let (status, error) = send(&app, Method::POST, "/api/orders", None, Some(body)).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(error["error"], "INVALID_INPUT");

		let (status, _) = send(&app, Method::POST, "/api/orders", None, Some(json!([1, 2]))).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_admin_status_updates() {
		let app = app().await;
		send(&app, Method::POST, "/api/orders", None, Some(order_body())).await;
		let uri = "/api/admin/orders/1/status";

		let (status, _) = send(
			&app,
			Method::PUT,
			uri,
			Some(&app.user_token),
			Some(json!({ "status": "confirmed" })),
		)
		.await;
		assert_eq!(status, StatusCode::FORBIDDEN);

		let (status, _) = send(
			&app,
			Method::PUT,
			uri,
			Some(&app.admin_token),
			Some(json!({ "status": "shipped" })),
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

		let (status, body) = send(
			&app,
			Method::PUT,
			uri,
			Some(&app.admin_token),
			Some(json!({ "status": "completed" })),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["order"]["status"], "completed");

		let (status, body) = send(
			&app,
			Method::PUT,
			uri,
			Some(&app.admin_token),
			Some(json!({ "status": "pending" })),
		)
		.await;
		assert_eq!(status, StatusCode::CONFLICT);
		assert_eq!(body["error"], "INVALID_TRANSITION");
		assert_eq!(body["details"]["from"], "completed");
	}

	#[tokio::test]
	async fn test_admin_listings() {
		let app = app().await;
		send(&app, Method::POST, "/api/orders", Some(&app.user_token), Some(order_body())).await;
		send(&app, Method::POST, "/api/orders", None, Some(order_body())).await;

		let (status, stats) = send(
			&app,
			Method::GET,
			"/api/admin/dashboard/stats",
			Some(&app.admin_token),
			None,
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(stats["total_orders"], 2);
		assert_eq!(stats["orders_by_status"]["pending"], 2);
		assert_eq!(stats["orders_by_status"]["completed"], 0);

		let (status, page) = send(
			&app,
			Method::GET,
			"/api/admin/orders?page=1&per_page=1",
			Some(&app.admin_token),
			None,
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(page["total"], 2);
		assert_eq!(page["pages"], 2);
		assert_eq!(page["orders"][0]["user_email"], "Guest");

		let (status, _) = send(
			&app,
			Method::GET,
			"/api/admin/orders?status=lost",
			Some(&app.admin_token),
			None,
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

		let (status, users) =
			send(&app, Method::GET, "/api/admin/users", Some(&app.admin_token), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(users["total"], 2);

		let (status, _) =
			send(&app, Method::GET, "/api/admin/users", Some(&app.user_token), None).await;
		assert_eq!(status, StatusCode::FORBIDDEN);
	}

	#[tokio::test]
	async fn test_delete_cake_with_orders() {
		let app = app().await;
		send(&app, Method::POST, "/api/orders", None, Some(order_body())).await;
		let (status, body) = send(
			&app,
			Method::DELETE,
			"/api/admin/cakes/1",
			Some(&app.admin_token),
			None,
		)
		.await;
		assert_eq!(status, StatusCode::CONFLICT);
		assert_eq!(body["error"], "CONFLICT");
	}

	#[tokio::test]
	async fn test_admin_cake_management() {
		let app = app().await;
		let lemon = json!({
			"name": "Lemon Delight",
			"description": "Zesty lemon sponge",
			"price": "42.50"
		});

		let (status, _) =
			send(&app, Method::POST, "/api/admin/cakes", Some(&app.user_token), Some(lemon.clone()))
				.await;
		assert_eq!(status, StatusCode::FORBIDDEN);
		let (status, _) = send(&app, Method::POST, "/api/admin/cakes", None, Some(lemon.clone())).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);

		let (status, body) = send(
			&app,
			Method::POST,
			"/api/admin/cakes",
			Some(&app.admin_token),
			Some(json!({ "description": "No name", "price": "10.00" })),
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["error"], "INVALID_INPUT");

		let (status, body) =
			send(&app, Method::POST, "/api/admin/cakes", Some(&app.admin_token), Some(lemon)).await;
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(body["message"], "Cake created successfully");
		assert_eq!(body["cake"]["id"], 2);
		assert_eq!(body["cake"]["unit_price"], "42.50");

		let (status, body) = send(
			&app,
			Method::PUT,
			"/api/admin/cakes/2",
			Some(&app.admin_token),
			Some(json!({ "price": "39.00" })),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["message"], "Cake updated successfully");
		assert_eq!(body["cake"]["name"], "Lemon Delight");
		assert_eq!(body["cake"]["unit_price"], "39.00");

		let (status, _) = send(
			&app,
			Method::PUT,
			"/api/admin/cakes/9",
			Some(&app.admin_token),
			Some(json!({ "price": "39.00" })),
		)
		.await;
		assert_eq!(status, StatusCode::NOT_FOUND);

		let (status, cakes) =
			send(&app, Method::GET, "/api/admin/cakes", Some(&app.admin_token), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(cakes[0]["name"], "Lemon Delight");
		assert_eq!(cakes[1]["name"], "Vanilla Bliss");

		let (status, _) =
			send(&app, Method::GET, "/api/admin/cakes", Some(&app.user_token), None).await;
		assert_eq!(status, StatusCode::FORBIDDEN);
	}

	#[tokio::test]
	async fn test_contact() {
		let app = app().await;
		let (status, body) = send(
			&app,
			Method::POST,
			"/api/contact",
			None,
			Some(json!({ "name": "Ava", "email": "ava@example.com", "message": "Hi" })),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert!(body["message"].as_str().unwrap().starts_with("Thank you"));

		let (status, _) = send(
			&app,
			Method::POST,
			"/api/contact",
			None,
			Some(json!({ "name": "Ava", "email": "ava@example.com" })),
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	}

	#[tokio::test]
	async fn test_body_limit() {
		let app = app().await;
		let mut body = order_body();
		body["special_requests"] = json!("x".repeat(32 * 1024));
		let (status, _) = send(&app, Method::POST, "/api/orders", None, Some(body)).await;
		assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
	}
}
