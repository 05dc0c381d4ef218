//----------------------------------------------   Cart & wishlist  ----------------------------------------------------

use actix_web::{web, HttpResponse};
use grandeur_engine::{db_types::Role, CartApi, CartManagement};
use log::*;
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{AddToCartRequest, RemoveCartItemRequest, UpdateCartRequest, WishlistAddRequest},
    errors::ServerError,
    route,
};

route!(add_to_cart => Post "" impl CartManagement where requires [Role::Customer]);
pub async fn add_to_cart<B: CartManagement>(
    claims: JwtClaims,
    body: web::Json<AddToCartRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let product_id =
        req.productid.ok_or_else(|| ServerError::InvalidRequest("Product ID is required!".to_string()))?;
    let (line, is_new) = api
        .add_to_cart(claims.user_id(), product_id, req.quantity.unwrap_or(1), req.size, req.color)
        .await?;
    let message =
        if is_new { "Item added to cart successfully" } else { "Cart quantity updated successfully" };
    Ok(HttpResponse::Created().json(json!({ "success": true, "message": message, "data": line })))
}

route!(get_cart => Get "/{userid}" impl CartManagement where requires [Role::Customer]);
pub async fn get_cart<B: CartManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    check_cart_owner(&claims, user_id)?;
    let (items, total) = api.cart(user_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Cart fetched successfully",
        "data": { "items": items, "total": total },
    })))
}

route!(update_cart => Patch "" impl CartManagement where requires [Role::Customer]);
pub async fn update_cart<B: CartManagement>(
    claims: JwtClaims,
    body: web::Json<UpdateCartRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let product_id =
        req.productid.ok_or_else(|| ServerError::InvalidRequest("Product ID is required!".to_string()))?;
    let line = api.update_cart_line(claims.user_id(), product_id, req.quantity, req.size, req.color).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Cart updated successfully",
        "data": line,
    })))
}

route!(remove_cart_item => Delete "/{userid}" impl CartManagement where requires [Role::Customer]);
pub async fn remove_cart_item<B: CartManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<RemoveCartItemRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    check_cart_owner(&claims, user_id)?;
    let product_id = body
        .into_inner()
        .productid
        .ok_or_else(|| ServerError::InvalidRequest("Product ID is required!".to_string()))?;
    api.remove_from_cart(user_id, product_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Cart item deleted successfully" })))
}

fn check_cart_owner(claims: &JwtClaims, user_id: i64) -> Result<(), ServerError> {
    if claims.user_id() != user_id {
        warn!("🛒️ User {} attempted to access the cart of user {user_id}", claims.user_id());
        return Err(ServerError::InsufficientPermissions(
            "Access denied. You can only access your own cart.".to_string(),
        ));
    }
    Ok(())
}

//----------------------------------------------   Wishlist  ----------------------------------------------------
route!(get_wishlist => Get "" impl CartManagement where requires [Role::Customer]);
pub async fn get_wishlist<B: CartManagement>(
    claims: JwtClaims,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let wishlist = api.wishlist(claims.user_id()).await?;
    let items: Vec<_> = wishlist
        .into_iter()
        .map(|(entry, product)| json!({ "id": entry.id, "addedAt": entry.created_at, "product": product }))
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": { "items": items } })))
}

route!(add_to_wishlist => Post "" impl CartManagement where requires [Role::Customer]);
pub async fn add_to_wishlist<B: CartManagement>(
    claims: JwtClaims,
    body: web::Json<WishlistAddRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = body
        .into_inner()
        .product_id
        .ok_or_else(|| ServerError::InvalidRequest("Product ID is required".to_string()))?;
    let entry = api.add_to_wishlist(claims.user_id(), product_id).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Added to wishlist successfully",
        "data": entry,
    })))
}

route!(clear_wishlist => Delete "/clear" impl CartManagement where requires [Role::Customer]);
pub async fn clear_wishlist<B: CartManagement>(
    claims: JwtClaims,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let removed = api.clear_wishlist(claims.user_id()).await?;
    debug!("🤍️ Cleared {removed} wishlist item(s) for user {}", claims.user_id());
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Wishlist cleared successfully" })))
}

route!(remove_from_wishlist => Delete "/{product_id}" impl CartManagement where requires [Role::Customer]);
pub async fn remove_from_wishlist<B: CartManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    api.remove_from_wishlist(claims.user_id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Removed from wishlist successfully" })))
}
