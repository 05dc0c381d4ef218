//----------------------------------------------   Addresses  ----------------------------------------------------

use actix_web::{web, HttpResponse};
use grandeur_engine::{
    db_types::{AddressUpdate, NewAddress, Role},
    AccountApi,
    AddressManagement,
};
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{AddressCreateRequest, AddressUpdateRequest},
    errors::ServerError,
    route,
};

route!(get_addresses => Get "" impl AddressManagement where requires [Role::Customer]);
pub async fn get_addresses<B: AddressManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let addresses = api.addresses(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": addresses })))
}

route!(create_address => Post "" impl AddressManagement where requires [Role::Customer]);
pub async fn create_address<B: AddressManagement>(
    claims: JwtClaims,
    body: web::Json<AddressCreateRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let address = match (req.label, req.full_name, req.phone, req.line1, req.city, req.state, req.postal_code) {
        (Some(label), Some(full_name), Some(phone), Some(line1), Some(city), Some(state), Some(postal_code))
            if ![&label, &full_name, &phone, &line1, &city, &state, &postal_code]
                .iter()
                .any(|s| s.trim().is_empty()) =>
        {
            NewAddress {
                label,
                full_name,
                phone,
                line1,
                line2: req.line2,
                city,
                state,
                postal_code,
                country: req.country.unwrap_or_else(|| "Nigeria".to_string()),
                is_default: req.is_default,
            }
        },
        _ => {
            return Err(ServerError::InvalidRequest("Please provide all required fields".to_string()));
        },
    };
    let address = api.create_address(claims.user_id(), address).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Address created successfully",
        "data": address,
    })))
}

route!(update_address => Patch "/{address_id}" impl AddressManagement where requires [Role::Customer]);
pub async fn update_address<B: AddressManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<AddressUpdateRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let update = AddressUpdate {
        label: req.label,
        full_name: req.full_name,
        phone: req.phone,
        line1: req.line1,
        line2: req.line2,
        city: req.city,
        state: req.state,
        postal_code: req.postal_code,
        country: req.country,
    };
    let address = api.update_address(claims.user_id(), path.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Address updated successfully",
        "data": address,
    })))
}

route!(delete_address => Delete "/{address_id}" impl AddressManagement where requires [Role::Customer]);
pub async fn delete_address<B: AddressManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    api.delete_address(claims.user_id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Address deleted successfully" })))
}

route!(set_default_address => Patch "/{address_id}/set-default" impl AddressManagement where requires [Role::Customer]);
pub async fn set_default_address<B: AddressManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let address = api.set_default_address(claims.user_id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Default address updated successfully",
        "data": address,
    })))
}
