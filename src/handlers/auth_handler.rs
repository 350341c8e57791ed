use std::sync::Arc;

use actix_web::{get, http::header::LOCATION, http::StatusCode, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{authenticate, SESSION_ROLE_COOKIE},
    errors::{AppError, LOGIN_PATH},
    models::dto::request::LoginRequest,
    views::{View, ViewPayload, KEY_ROLE, KEY_TOKEN, KEY_USER_ID},
};

const MISSING_CREDENTIALS: &str = "Email and password are required";

#[get("/login")]
pub async fn login_page(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let rendered = state.renderer.render(View::Login, &ViewPayload::new())?;
    Ok(rendered.respond(StatusCode::OK))
}

/// Failures re-render the login view with an `Error` entry and set no cookies.
#[post("/login")]
pub async fn login(
    state: web::Data<Arc<AppState>>,
    form: web::Form<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    if form.validate().is_err() {
        return login_error(&state, MISSING_CREDENTIALS);
    }

    let identity = match authenticate(state.verifier.as_ref(), form.email.trim(), &form.password).await {
        Ok(identity) => identity,
        Err(e) => {
            log::warn!("Login rejected: {}", e);
            return login_error(&state, e.user_message());
        }
    };

    log::info!(
        "Login succeeded for user_id={} with role {}",
        identity.user_id,
        identity.role
    );

    let payload = ViewPayload::new()
        .with(KEY_ROLE, identity.role.as_str())
        .with(KEY_TOKEN, identity.token.clone().unwrap_or_default())
        .with(KEY_USER_ID, identity.user_id.as_str());
    let rendered = state.renderer.render(View::Dashboard, &payload)?;

    let mut response = rendered.respond(StatusCode::OK);
    for cookie in state.session_issuer.issue(&identity) {
        response
            .add_cookie(&cookie)
            .map_err(|e| AppError::InternalError(format!("Failed to set session cookie: {}", e)))?;
    }

    Ok(response)
}

fn login_error(state: &AppState, message: &str) -> Result<HttpResponse, AppError> {
    let rendered = state.renderer.render(View::Login, &ViewPayload::error(message))?;
    Ok(rendered.respond(StatusCode::OK))
}

#[get("/logout")]
pub async fn logout(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let mut response = HttpResponse::SeeOther();
    response.insert_header((LOCATION, LOGIN_PATH));

    for cookie in state.session_issuer.revoke() {
        response.cookie(cookie);
    }

    response.finish()
}

/// The raw role attribute, unchecked. An empty cookie is still a cookie.
#[get("/whoami")]
pub async fn whoami(req: HttpRequest) -> HttpResponse {
    match req.cookie(SESSION_ROLE_COOKIE) {
        Some(role) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(role.value().to_string()),
        None => HttpResponse::Unauthorized()
            .content_type("text/plain; charset=utf-8")
            .body("non-auth"),
    }
}
