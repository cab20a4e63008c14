// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{AuthenticatedUser, Role},
    models::{
        AccessTokenResponse, CreateOrderRequest, LoginRequest, OrderView, SignUpRequest,
        TokenPairResponse, UpdateOrderRequest, UpdateOrderStatusRequest, UserSummary,
    },
    orders::{OrderStatus, PizzaSize},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod orders;

pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/me", get(auth::current_user))
        .route("/all", get(auth::list_users));

    let order_routes = Router::new()
        .route("/order", post(orders::create_order))
        .route("/all", get(orders::list_all_orders))
        .route("/{order_id}", get(orders::get_order))
        .route("/user/orders", get(orders::list_my_orders))
        .route("/user/order/{order_id}", get(orders::get_my_order))
        .route("/order/update/{order_id}", patch(orders::update_order))
        .route("/order/status/{order_id}", put(orders::update_order_status))
        .route("/order/delete/{order_id}", delete(orders::delete_order));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/orders", order_routes);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Bearer token security scheme for the Swagger UI "Authorize" button.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pizza Delivery API",
        description = "Customer sign-up, JWT sessions and the pizza order lifecycle."
    ),
    paths(
        auth::sign_up,
        auth::login,
        auth::refresh,
        auth::current_user,
        auth::list_users,
        orders::create_order,
        orders::list_all_orders,
        orders::get_order,
        orders::list_my_orders,
        orders::get_my_order,
        orders::update_order,
        orders::update_order_status,
        orders::delete_order,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SignUpRequest,
            LoginRequest,
            TokenPairResponse,
            AccessTokenResponse,
            UserSummary,
            AuthenticatedUser,
            Role,
            CreateOrderRequest,
            UpdateOrderRequest,
            UpdateOrderStatusRequest,
            OrderView,
            OrderStatus,
            PizzaSize,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Sign-up, login and token refresh"),
        (name = "Orders", description = "Pizza order lifecycle"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
