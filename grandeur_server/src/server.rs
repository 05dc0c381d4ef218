use std::time::Duration;

use actix_web::{guard, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use flutterwave_tools::FlutterwaveApi;
use grandeur_engine::{AccountApi, CartApi, CatalogApi, CheckoutApi, OrderApi, SqliteDatabase};

use crate::{
    address_routes::{
        CreateAddressRoute,
        DeleteAddressRoute,
        GetAddressesRoute,
        SetDefaultAddressRoute,
        UpdateAddressRoute,
    },
    auth::TokenIssuer,
    cart_routes::{
        AddToCartRoute,
        AddToWishlistRoute,
        ClearWishlistRoute,
        GetCartRoute,
        GetWishlistRoute,
        RemoveCartItemRoute,
        RemoveFromWishlistRoute,
        UpdateCartRoute,
    },
    catalog_routes::{
        CategoryByNameRoute,
        CreateCategoryRoute,
        CreateProductRoute,
        CreateReviewRoute,
        DeleteCategoryRoute,
        DeleteProductRoute,
        ListCategoriesRoute,
        ListProductsRoute,
        MyReviewsRoute,
        ProductByIdRoute,
        ProductReviewsRoute,
        UpdateCategoryRoute,
        UpdateProductRoute,
    },
    config::ServerConfig,
    errors::ServerError,
    integrations::flutterwave::create_event_handlers,
    middleware::SignatureMiddlewareFactory,
    order_routes::{
        AdminOrderStatsRoute,
        AllOrdersRoute,
        CancelOrderRoute,
        MyOrderStatsRoute,
        MyOrdersRoute,
        OrderDetailsRoute,
        OrderTrackingRoute,
        UpdateOrderStatusRoute,
    },
    payment_routes::{payment_webhook, InitializePaymentRoute, VerifyPaymentRoute},
    routes::{
        health,
        AllUsersRoute,
        ChangePasswordRoute,
        LoginRoute,
        MyProfileRoute,
        RegisterRoute,
        UpdateProfileRoute,
        UserStatsRoute,
    },
};

/// The header the gateway uses to carry its webhook signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "verif-hash";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway =
        FlutterwaveApi::new(config.flutterwave.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = create_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: FlutterwaveApi,
    producers: grandeur_engine::events::EventProducers,
) -> Result<actix_web::dev::Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let checkout_api = CheckoutApi::new(db.clone(), producers.clone());
        let account_api = AccountApi::new(db.clone(), producers.clone());
        let cart_api = CartApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let order_api = OrderApi::new(db.clone());
        let token_issuer = TokenIssuer::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("grandeur::access_log"))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(account_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(order_api))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(config.flutterwave.clone()))
            .app_data(web::Data::new(token_issuer));

        let users = web::scope("/api/users")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(MyProfileRoute::<SqliteDatabase>::new())
            .service(UpdateProfileRoute::<SqliteDatabase>::new())
            .service(ChangePasswordRoute::<SqliteDatabase>::new())
            .service(AllUsersRoute::<SqliteDatabase>::new())
            .service(UserStatsRoute::<SqliteDatabase>::new());
        let categories = web::scope("/api/categories")
            .service(CreateCategoryRoute::<SqliteDatabase>::new())
            .service(ListCategoriesRoute::<SqliteDatabase>::new())
            .service(UpdateCategoryRoute::<SqliteDatabase>::new())
            .service(DeleteCategoryRoute::<SqliteDatabase>::new())
            .service(CategoryByNameRoute::<SqliteDatabase>::new());
        let products = web::scope("/api/products")
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(ListProductsRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new());
        let cart = web::scope("/api/cart")
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(UpdateCartRoute::<SqliteDatabase>::new())
            .service(GetCartRoute::<SqliteDatabase>::new())
            .service(RemoveCartItemRoute::<SqliteDatabase>::new());
        let payment = web::scope("/api/payment")
            .service(InitializePaymentRoute::<SqliteDatabase, SqliteDatabase, FlutterwaveApi>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase, SqliteDatabase, FlutterwaveApi>::new())
            .service(
                web::resource("/webhook")
                    .name("payment_webhook")
                    .guard(guard::Post())
                    .wrap(SignatureMiddlewareFactory::new(WEBHOOK_SIGNATURE_HEADER, config.webhook_secret.clone()))
                    .to(payment_webhook::<SqliteDatabase>),
            );
        let addresses = web::scope("/api/addresses")
            .service(GetAddressesRoute::<SqliteDatabase>::new())
            .service(CreateAddressRoute::<SqliteDatabase>::new())
            .service(SetDefaultAddressRoute::<SqliteDatabase>::new())
            .service(UpdateAddressRoute::<SqliteDatabase>::new())
            .service(DeleteAddressRoute::<SqliteDatabase>::new());
        let orders = web::scope("/api/orders")
            .service(MyOrderStatsRoute::<SqliteDatabase>::new())
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            .service(AdminOrderStatsRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(OrderTrackingRoute::<SqliteDatabase>::new())
            .service(CancelOrderRoute::<SqliteDatabase>::new())
            .service(OrderDetailsRoute::<SqliteDatabase>::new());
        let wishlist = web::scope("/api/wishlist")
            .service(GetWishlistRoute::<SqliteDatabase>::new())
            .service(AddToWishlistRoute::<SqliteDatabase>::new())
            .service(ClearWishlistRoute::<SqliteDatabase>::new())
            .service(RemoveFromWishlistRoute::<SqliteDatabase>::new());
        let reviews = web::scope("/api/reviews")
            .service(CreateReviewRoute::<SqliteDatabase>::new())
            .service(ProductReviewsRoute::<SqliteDatabase>::new())
            .service(MyReviewsRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(users)
            .service(categories)
            .service(products)
            .service(cart)
            .service(payment)
            .service(addresses)
            .service(orders)
            .service(wishlist)
            .service(reviews)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
