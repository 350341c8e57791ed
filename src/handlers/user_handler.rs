use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{AuthGate, SessionContext},
    errors::AppError,
    models::dto::request::RoleChangeRequest,
};

#[post("/promote-user", wrap = "AuthGate::admin()")]
pub async fn promote_user(
    state: web::Data<Arc<AppState>>,
    session: SessionContext,
    form: web::Form<RoleChangeRequest>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    form.validate()?;

    let actor = session.actor()?;
    state.role_service.promote(&actor, form.email.trim()).await?;

    Ok(plain_text("User promoted to super_user"))
}

#[post("/demote-user", wrap = "AuthGate::admin()")]
pub async fn demote_user(
    state: web::Data<Arc<AppState>>,
    session: SessionContext,
    form: web::Form<RoleChangeRequest>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    form.validate()?;

    let actor = session.actor()?;
    state.role_service.demote(&actor, form.email.trim()).await?;

    Ok(plain_text("User demoted to user"))
}

fn plain_text(message: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(message)
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let db_ok = match &state.db {
        Some(db) => db.health_check().await.is_ok(),
        None => true,
    };

    let response = serde_json::json!({
        "status": if db_ok { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "mongodb": if db_ok { "ok" } else { "error" }
        }
    });

    if db_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
