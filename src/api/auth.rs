use crate::auth::{create_token, Claims};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ServiceError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::services::accounts;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Bad request"),
        (status = 409, description = "User already exists")
    ),
    tag = "auth"
)]
pub async fn signup(
    req: web::Json<SignupRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ServiceError> {
    let user = accounts::signup(pool.get_ref(), &req).await?;

    let claims = Claims::new(user.id, user.username.clone(), config.jwt.expiration_hours);
    let token = create_token(&claims, &config.jwt.secret)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    req: web::Json<LoginRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ServiceError> {
    // Unknown username and wrong password produce the same response.
    let user = accounts::authenticate(pool.get_ref(), &req.username, &req.password)
        .await?
        .ok_or(ServiceError::InvalidCredentials)?;

    let claims = Claims::new(user.id, user.username.clone(), config.jwt.expiration_hours);
    let token = create_token(&claims, &config.jwt.secret)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.into(),
    }))
}
