//----------------------------------------------   Catalog  ----------------------------------------------------

use actix_web::{web, HttpResponse};
use grandeur_common::Naira;
use grandeur_engine::{
    db_types::{NewProduct, NewReview, Role},
    CatalogApi,
    CatalogManagement,
};
use log::*;
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{
        CategoryCreateRequest,
        CategoryDeleteRequest,
        CategoryUpdateRequest,
        ProductCreateRequest,
        ProductDeleteRequest,
        ProductUpdateRequest,
        ReviewCreateRequest,
    },
    errors::ServerError,
    route,
    routes::required,
};

//----------------------------------------------   Categories  ----------------------------------------------------
route!(create_category => Post "" impl CatalogManagement where requires [Role::Admin]);
pub async fn create_category<B: CatalogManagement>(
    body: web::Json<CategoryCreateRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let name = required(body.into_inner().name, "Category name is required!")?;
    let category = api.create_category(&name).await?;
    info!("📇️ Category '{}' created", category.name);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Category created successfully",
        "data": category,
    })))
}

route!(list_categories => Get "" impl CatalogManagement);
pub async fn list_categories<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let categories = api.categories().await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Categories retrieved successfully",
        "data": categories,
    })))
}

route!(category_by_name => Get "/{name}" impl CatalogManagement);
pub async fn category_by_name<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let name = path.into_inner();
    let category = api
        .category_by_name(&name)
        .await?
        .ok_or_else(|| ServerError::InvalidRequest("Category not found!".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Category retrieved successfully",
        "data": category,
    })))
}

route!(update_category => Patch "" impl CatalogManagement where requires [Role::Admin]);
pub async fn update_category<B: CatalogManagement>(
    body: web::Json<CategoryUpdateRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let category = api.update_category(req.id, &req.name).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Category updated successfully",
        "data": category,
    })))
}

route!(delete_category => Delete "" impl CatalogManagement where requires [Role::Admin]);
pub async fn delete_category<B: CatalogManagement>(
    body: web::Json<CategoryDeleteRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let category = api.delete_category(body.into_inner().id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Category deleted successfully",
        "data": category,
    })))
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(create_product => Post "" impl CatalogManagement where requires [Role::Admin]);
pub async fn create_product<B: CatalogManagement>(
    body: web::Json<ProductCreateRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let missing = |key: &str| ServerError::InvalidRequest(format!("Missing required field: {key}"));
    let name = req.name.filter(|s| !s.is_empty()).ok_or_else(|| missing("name"))?;
    let description = req.description.filter(|s| !s.is_empty()).ok_or_else(|| missing("description"))?;
    let price = req.price.ok_or_else(|| missing("price"))?;
    let currency = req.currency.filter(|s| !s.is_empty()).ok_or_else(|| missing("currency"))?;
    let sizes = req.sizes.ok_or_else(|| missing("sizes"))?;
    let default_size = req.default_size.filter(|s| !s.is_empty()).ok_or_else(|| missing("defaultSize"))?;
    let colors = req.colors.ok_or_else(|| missing("colors"))?;
    let default_color = req.default_color.filter(|s| !s.is_empty()).ok_or_else(|| missing("defaultColor"))?;
    let subcategory = req.subcategory.filter(|s| !s.is_empty()).ok_or_else(|| missing("subcategory"))?;
    let category_id = req.category_id.ok_or_else(|| missing("categoryId"))?;

    if price <= 0.0 {
        return Err(ServerError::InvalidRequest("Invalid price value".to_string()));
    }
    let price = Naira::try_from(price).map_err(|_| ServerError::InvalidRequest("Invalid price value".to_string()))?;

    let product = NewProduct {
        name,
        description,
        price,
        currency,
        image: req.image.unwrap_or_default(),
        sizes,
        default_size,
        colors,
        default_color,
        subcategory,
        tags: req.tags.unwrap_or_default(),
        rating: req.rating.unwrap_or(0.0),
        discount: req.discount.unwrap_or(0),
        stock: req.stock.unwrap_or(0),
        best_seller: req.best_seller,
        new_arrival: req.new_arrival,
        category_id,
    };
    let product = api.create_product(product).await?;
    info!("📇️ Product '{}' created with id {}", product.name, product.id);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Product created successfully!",
        "data": product,
    })))
}

route!(list_products => Get "" impl CatalogManagement);
pub async fn list_products<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Products retrieved successfully",
        "data": products,
    })))
}

route!(product_by_id => Get "/{id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path
        .into_inner()
        .parse::<i64>()
        .map_err(|_| ServerError::InvalidRequest("Invalid product ID!".to_string()))?;
    let product =
        api.product_by_id(id).await?.ok_or_else(|| ServerError::NoRecordFound("Product not found!".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Product retrieved successfully",
        "data": product,
    })))
}

route!(update_product => Patch "" impl CatalogManagement where requires [Role::Admin]);
pub async fn update_product<B: CatalogManagement>(
    body: web::Json<ProductUpdateRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let product = api.update_product(req.id, req.value).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Product updated successfully!",
        "data": product,
    })))
}

route!(delete_product => Delete "" impl CatalogManagement where requires [Role::Admin]);
pub async fn delete_product<B: CatalogManagement>(
    body: web::Json<ProductDeleteRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.delete_product(body.into_inner().id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Product deleted successfully",
        "data": product,
    })))
}

//----------------------------------------------   Reviews  ----------------------------------------------------
route!(create_review => Post "" impl CatalogManagement where requires [Role::Customer]);
pub async fn create_review<B: CatalogManagement>(
    claims: JwtClaims,
    body: web::Json<ReviewCreateRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let rating = req.rating.filter(|r| (1..=5).contains(r)).ok_or_else(|| {
        ServerError::InvalidRequest("Rating must be between 1 and 5".to_string())
    })?;
    let order_id = req.order_id.ok_or_else(|| ServerError::InvalidRequest("Order ID is required".to_string()))?;
    let product_id =
        req.product_id.ok_or_else(|| ServerError::InvalidRequest("Product ID is required".to_string()))?;
    let review = NewReview {
        user_id: claims.user_id(),
        product_id,
        order_id,
        rating,
        comment: req.comment.unwrap_or_default(),
        images: req.images,
    };
    let review = api.create_review(review).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Review created successfully",
        "data": review,
    })))
}

route!(product_reviews => Get "/product/{product_id}" impl CatalogManagement);
pub async fn product_reviews<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reviews = api.reviews_for_product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": reviews })))
}

route!(my_reviews => Get "/user" impl CatalogManagement where requires [Role::Customer]);
pub async fn my_reviews<B: CatalogManagement>(
    claims: JwtClaims,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reviews = api.reviews_for_user(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": reviews })))
}
