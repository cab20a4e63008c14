// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order endpoints.
//!
//! Handlers only translate between HTTP and [`crate::orders::OrderService`];
//! every ownership and role decision is made there.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateOrderRequest, OrderView, UpdateOrderRequest, UpdateOrderStatusRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/orders/order",
    request_body = CreateOrderRequest,
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Order placed in PENDING status", body = OrderView),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 422, description = "Quantity below 1")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>), ApiError> {
    let order = state.order_service().create(&user, request)?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// List every order in the system. Staff only.
#[utoipa::path(
    get,
    path = "/api/orders/all",
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All orders", body = [OrderView]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Caller is not staff")
    )
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let orders = state.order_service().list_all(&user)?;
    Ok(Json(orders.into_iter().map(OrderView::from).collect()))
}

/// Fetch an order. Visible to its owner and to staff.
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    params(("order_id" = u64, Path, description = "Order identifier")),
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Order", body = OrderView),
        (status = 403, description = "Caller is neither the owner nor staff"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderView>, ApiError> {
    let order = state.order_service().get(&user, order_id)?;
    Ok(Json(order.into()))
}

#[utoipa::path(
    get,
    path = "/api/orders/user/orders",
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's orders", body = [OrderView]),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn list_my_orders(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let orders = state.order_service().list_mine(&user)?;
    Ok(Json(orders.into_iter().map(OrderView::from).collect()))
}

/// Fetch one of the caller's orders. Other users' orders read as 404.
#[utoipa::path(
    get,
    path = "/api/orders/user/order/{order_id}",
    params(("order_id" = u64, Path, description = "Order identifier")),
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Order", body = OrderView),
        (status = 404, description = "No such order among the caller's orders")
    )
)]
pub async fn get_my_order(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderView>, ApiError> {
    let order = state.order_service().get_mine(&user, order_id)?;
    Ok(Json(order.into()))
}

/// Change quantity and/or size. Owner only, while the order is pending.
#[utoipa::path(
    patch,
    path = "/api/orders/order/update/{order_id}",
    params(("order_id" = u64, Path, description = "Order identifier")),
    request_body = UpdateOrderRequest,
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 202, description = "Order updated", body = OrderView),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is no longer pending"),
        (status = 422, description = "Quantity below 1")
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(order_id): Path<u64>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>), ApiError> {
    let order = state
        .order_service()
        .update_content(&user, order_id, request)?;
    Ok((StatusCode::ACCEPTED, Json(order.into())))
}

/// Move an order to a new status. Staff only.
#[utoipa::path(
    put,
    path = "/api/orders/order/status/{order_id}",
    params(("order_id" = u64, Path, description = "Order identifier")),
    request_body = UpdateOrderStatusRequest,
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Status changed", body = OrderView),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(order_id): Path<u64>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderView>, ApiError> {
    let order = state
        .order_service()
        .update_status(&user, order_id, request.order_status)?;
    Ok(Json(order.into()))
}

/// Delete an order. Owner only, while the order is pending.
#[utoipa::path(
    delete,
    path = "/api/orders/order/delete/{order_id}",
    params(("order_id" = u64, Path, description = "Order identifier")),
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is no longer pending")
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(order_id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.order_service().delete(&user, order_id)?;
    Ok(StatusCode::NO_CONTENT)
}
