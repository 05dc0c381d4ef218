//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don't block execution.
use actix_web::{get, web, HttpResponse, Responder};
use grandeur_engine::{
    db_types::{NewUser, Role, UserProfileUpdate},
    shop_objects::{PageInfo, Pagination, UserQueryFilter},
    AccountApi,
    AccountManagement,
};
use log::*;
use serde_json::json;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, UserListQuery},
    errors::ServerError,
    helpers::{is_valid_email, validate_password_strength},
};

const BCRYPT_COST: u32 = 10;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:expr),*]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:expr),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(json!({ "success": true, "message": "Server is running" }))
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(register => Post "/register" impl AccountManagement);
/// Route handler for user registration.
///
/// Validates the submitted fields the same way the storefront does (presence, email shape, password strength,
/// matching confirmation), hashes the password and creates the account. Registration always produces a `Customer`;
/// admin accounts are promoted directly in the database. On success the user is logged in immediately: the response
/// carries a fresh access token along with the sanitized user record.
pub async fn register<B: AccountManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AccountApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let firstname = required(req.firstname, "First name is required!")?;
    let lastname = required(req.lastname, "Last name is required!")?;
    let email = required(req.email, "Missing email field!")?;
    let phone = required(req.phone, "Missing phone number field!")?;
    let address = required(req.address, "Missing address field!")?;
    let password = required(req.password, "Missing password field!")?;
    let confirmpassword = required(req.confirmpassword, "Missing confirm password field!")?;

    if !is_valid_email(&email) {
        return Err(ServerError::InvalidRequest("Invalid email format!".to_string()));
    }
    validate_password_strength(&password)?;
    if password != confirmpassword {
        return Err(ServerError::InvalidRequest("Password and confirm password do not match!".to_string()));
    }
    let password_hash =
        bcrypt::hash(&password, BCRYPT_COST).map_err(|e| ServerError::BackendError(format!("Hashing failed: {e}")))?;
    let new_user = NewUser {
        firstname,
        lastname,
        email,
        phone: Some(phone),
        address: Some(address),
        password_hash,
        image: None,
    };
    let user = api.register(new_user).await?;
    let token = signer.issue_token(&user).map_err(ServerError::AuthenticationError)?;
    info!("💻️ New user registered: {}", user.email);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User created successfully! Check your email for verification.",
        "token": token,
        "data": user,
    })))
}

route!(login => Post "/login" impl AccountManagement);
pub async fn login<B: AccountManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AccountApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let email = required(req.email, "Email field is not provided!")?;
    let password = required(req.password, "Password field is not provided!")?;

    // Same response for unknown email and wrong password, so the endpoint does not leak which emails exist
    let invalid = || ServerError::InvalidRequest("Invalid email or password!".to_string());
    let creds = api.credentials(&email).await?.ok_or_else(invalid)?;
    let valid = bcrypt::verify(&password, &creds.password_hash)
        .map_err(|e| ServerError::BackendError(format!("Password verification failed: {e}")))?;
    if !valid {
        debug!("💻️ Failed login attempt for {email}");
        return Err(invalid());
    }
    let user = api.user_by_email(&email).await?.ok_or_else(invalid)?;
    let token = signer.issue_token(&user).map_err(ServerError::AuthenticationError)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "data": user,
    })))
}

route!(my_profile => Get "/profile" impl AccountManagement where requires [Role::Customer]);
pub async fn my_profile<B: AccountManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user = api
        .user_by_id(claims.user_id())
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("User not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": user })))
}

route!(update_profile => Patch "/profile" impl AccountManagement where requires [Role::Customer]);
pub async fn update_profile<B: AccountManagement>(
    claims: JwtClaims,
    body: web::Json<UpdateProfileRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let update = UserProfileUpdate {
        firstname: req.firstname,
        lastname: req.lastname,
        phone: req.phone,
        address: req.address,
        image: req.image,
    };
    let user = api.update_profile(claims.user_id(), update).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "data": user,
    })))
}

route!(change_password => Post "/change-password" impl AccountManagement where requires [Role::Customer]);
pub async fn change_password<B: AccountManagement>(
    claims: JwtClaims,
    body: web::Json<ChangePasswordRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let (current, new) = match (req.current_password, req.new_password) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => {
            return Err(ServerError::InvalidRequest("Please provide both current and new password".to_string()));
        },
    };
    let creds = api
        .credentials(&claims.email)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("User not found".to_string()))?;
    let valid = bcrypt::verify(&current, &creds.password_hash)
        .map_err(|e| ServerError::BackendError(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(ServerError::InvalidRequest("Current password is incorrect".to_string()));
    }
    validate_password_strength(&new)?;
    let password_hash =
        bcrypt::hash(&new, BCRYPT_COST).map_err(|e| ServerError::BackendError(format!("Hashing failed: {e}")))?;
    api.update_password(claims.user_id(), &password_hash).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Password changed successfully" })))
}

route!(all_users => Get "/admin/all" impl AccountManagement where requires [Role::Admin]);
pub async fn all_users<B: AccountManagement>(
    query: web::Query<UserListQuery>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    let pagination = Pagination::new(query.page, query.limit);
    let filter = UserQueryFilter {
        role: query.role.as_deref().and_then(|r| r.parse().ok()),
        search: query.search,
        pagination: Some(pagination),
    };
    let (users, total) = api.search_users(filter).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "users": users, "pagination": PageInfo::new(total, pagination) },
    })))
}

route!(user_stats => Get "/admin/stats" impl AccountManagement where requires [Role::Admin]);
pub async fn user_stats<B: AccountManagement>(api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError> {
    let stats = api.user_stats().await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats })))
}

/// Unwraps a required request field, or produces the storefront's "missing field" message for it.
pub(crate) fn required(field: Option<String>, message: &str) -> Result<String, ServerError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ServerError::InvalidRequest(message.to_string())),
    }
}
