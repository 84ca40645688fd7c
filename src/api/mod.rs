pub mod auth;
pub mod messages;
pub mod users;

use crate::models::{
    AuthResponse, LoginRequest, MessageResponse, NewMessageRequest, SignupRequest,
    UpdateProfileRequest, UserProfileResponse, UserResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth endpoints
        auth::signup,
        auth::login,
        // User endpoints
        users::list_users,
        users::show_user,
        users::list_following,
        users::list_followers,
        users::list_likes,
        users::follow_user,
        users::stop_following,
        users::add_like,
        users::delete_like,
        users::update_profile,
        users::delete_account,
        // Message endpoints
        messages::create_message,
        messages::show_message,
        messages::delete_message,
        messages::timeline,
    ),
    components(schemas(
        // Auth schemas
        SignupRequest,
        LoginRequest,
        AuthResponse,
        // User schemas
        UserResponse,
        UserProfileResponse,
        UpdateProfileRequest,
        // Message schemas
        NewMessageRequest,
        MessageResponse,
        // Query schemas
        users::UserQuery,
    )),
    tags(
        (name = "auth", description = "Signup and login endpoints"),
        (name = "users", description = "User, follow and like endpoints"),
        (name = "messages", description = "Message endpoints"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

use utoipa::Modify;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
