use crate::{
    auth::{AuthenticatedUserId, LoginRequest, MeResponse, RegisterRequest, TokenService},
    error::AppError,
    services::accounts,
    store::Store,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new account and returns it without the password hash.
///
/// ## Responses:
/// - `201 Created`: the new `User`.
/// - `400 Bad Request`: missing field, invalid email, short password, or the
///   email is already registered.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = accounts::register(store.get_ref(), register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Authenticates a user and returns `{token, userId}`.
/// Wrong credentials answer `400 Bad Request`.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = accounts::login(store.get_ref(), &tokens, login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Returns the id of the authenticated caller.
#[get("/me")]
pub async fn me(user: AuthenticatedUserId) -> impl Responder {
    HttpResponse::Ok().json(MeResponse { user_id: user.0 })
}
