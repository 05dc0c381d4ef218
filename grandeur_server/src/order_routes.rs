//----------------------------------------------   Orders  ----------------------------------------------------

use actix_web::{web, HttpResponse};
use grandeur_engine::{
    db_types::{OrderId, Role},
    shop_objects::{OrderQueryFilter, PageInfo, Pagination},
    OrderApi,
    OrderManagement,
};
use log::*;
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{OrderListQuery, OrderStatusUpdateRequest},
    errors::ServerError,
    route,
};

route!(my_order_stats => Get "/stats" impl OrderManagement where requires [Role::Customer]);
pub async fn my_order_stats<B: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let stats = api.order_stats_for_user(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats })))
}

route!(my_orders => Get "" impl OrderManagement where requires [Role::Customer]);
pub async fn my_orders<B: OrderManagement>(
    claims: JwtClaims,
    query: web::Query<OrderListQuery>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    let pagination = Pagination::new(query.page, query.limit);
    let mut filter = OrderQueryFilter::default().with_user_id(claims.user_id()).with_pagination(pagination);
    if let Some(status) = query.status.as_deref() {
        let status =
            status.parse().map_err(|_| ServerError::InvalidRequest("Invalid order status".to_string()))?;
        filter = filter.with_status(status);
    }
    let (orders, total) = api.search_orders(filter).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "orders": orders, "pagination": PageInfo::new(total, pagination) },
    })))
}

route!(order_details => Get "/{order_id}" impl OrderManagement where requires [Role::Customer]);
pub async fn order_details<B: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<String>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reference = OrderId(path.into_inner());
    let order = api
        .order_for_user(&reference, claims.user_id())
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("Order not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": order })))
}

route!(order_tracking => Get "/{order_id}/tracking" impl OrderManagement where requires [Role::Customer]);
pub async fn order_tracking<B: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<String>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reference = OrderId(path.into_inner());
    let events = api.tracking_for_user(&reference, claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": events })))
}

route!(cancel_order => Patch "/{order_id}/cancel" impl OrderManagement where requires [Role::Customer]);
pub async fn cancel_order<B: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<String>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reference = OrderId(path.into_inner());
    let order = api.cancel_order(&reference, claims.user_id()).await?;
    info!("💻️ Order {} cancelled by its owner", order.order_id);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Order cancelled successfully",
        "data": order,
    })))
}

//----------------------------------------------   Admin  ----------------------------------------------------
route!(all_orders => Get "/admin/all" impl OrderManagement where requires [Role::Admin]);
pub async fn all_orders<B: OrderManagement>(
    query: web::Query<OrderListQuery>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    let pagination = Pagination::new(query.page, query.limit);
    let mut filter = OrderQueryFilter::default().with_pagination(pagination);
    if let Some(status) = query.status.as_deref() {
        let status =
            status.parse().map_err(|_| ServerError::InvalidRequest("Invalid order status".to_string()))?;
        filter = filter.with_status(status);
    }
    let (orders, total) = api.search_orders(filter).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "orders": orders, "pagination": PageInfo::new(total, pagination) },
    })))
}

route!(admin_order_stats => Get "/admin/stats" impl OrderManagement where requires [Role::Admin]);
pub async fn admin_order_stats<B: OrderManagement>(api: web::Data<OrderApi<B>>) -> Result<HttpResponse, ServerError> {
    let stats = api.admin_order_stats().await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats })))
}

route!(update_order_status => Patch "/admin/{order_id}/status" impl OrderManagement where requires [Role::Admin]);
pub async fn update_order_status<B: OrderManagement>(
    path: web::Path<String>,
    body: web::Json<OrderStatusUpdateRequest>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reference = OrderId(path.into_inner());
    let status = body
        .into_inner()
        .status
        .ok_or_else(|| ServerError::InvalidRequest("Invalid order status".to_string()))?;
    let order = api.update_order_status(&reference, &status).await?;
    info!("💻️ Order {} status updated to {}", order.order_id, order.status);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Order status updated successfully",
        "data": order,
    })))
}
