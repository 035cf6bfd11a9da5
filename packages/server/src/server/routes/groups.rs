use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::groups::{Group, GroupStatus, Order, OrderInput};
use crate::domains::menus::activities::normalize_value;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateGroupInput {
    /// Restaurant record as edited by the coordinator; normalized before storing
    pub restaurant: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct CreateGroupResponse {
    pub group_id: String,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub current_orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: GroupStatus,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaymentInput {
    pub amount: u32,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub order: Order,
    /// Paid at least the order total
    pub settled: bool,
}

pub async fn create_group_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<CreateGroupInput>, JsonRejection>,
) -> Result<Json<CreateGroupResponse>, ApiError> {
    let Json(input) = payload?;
    let restaurant = normalize_value(&input.restaurant, None);
    let group = state.server_deps.groups.create(restaurant).await?;

    tracing::info!(group_id = %group.id, restaurant = %group.restaurant.name, "Group created");
    Ok(Json(CreateGroupResponse { group_id: group.id }))
}

pub async fn get_group_handler(
    Extension(state): Extension<AxumAppState>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let group = state.server_deps.groups.get(&group_id).await?;
    Ok(Json(group))
}

pub async fn submit_order_handler(
    Extension(state): Extension<AxumAppState>,
    Path(group_id): Path<String>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let Json(input) = payload?;
    if input.member_name.trim().is_empty() {
        return Err(ApiError::BadRequest("member_name is required".to_string()));
    }

    let current_orders = state
        .server_deps
        .groups
        .append_order(&group_id, input)
        .await?;

    Ok(Json(OrdersResponse {
        success: true,
        current_orders,
    }))
}

pub async fn update_status_handler(
    Extension(state): Extension<AxumAppState>,
    Path(group_id): Path<String>,
    payload: Result<Json<StatusInput>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(input) = payload?;
    state
        .server_deps
        .groups
        .set_status(&group_id, input.status)
        .await?;

    tracing::info!(group_id = %group_id, status = ?input.status, "Group status updated");
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn delete_order_handler(
    Extension(state): Extension<AxumAppState>,
    Path((group_id, order_id)): Path<(String, String)>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let current_orders = state
        .server_deps
        .groups
        .delete_order(&group_id, &order_id)
        .await?;

    Ok(Json(OrdersResponse {
        success: true,
        current_orders,
    }))
}

pub async fn set_paid_amount_handler(
    Extension(state): Extension<AxumAppState>,
    Path((group_id, order_id)): Path<(String, String)>,
    payload: Result<Json<PaymentInput>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(input) = payload?;
    let order = state
        .server_deps
        .groups
        .set_paid_amount(&group_id, &order_id, input.amount)
        .await?;

    let settled = order.is_settled();
    tracing::info!(group_id = %group_id, order_id = %order.id, settled, "Payment recorded");

    Ok(Json(PaymentResponse {
        success: true,
        order,
        settled,
    }))
}
