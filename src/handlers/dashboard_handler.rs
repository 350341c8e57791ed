use std::sync::Arc;

use actix_web::{get, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AuthGate, SessionAttributes, SessionContext},
    errors::AppError,
    views::{View, ViewPayload, KEY_ROLE, KEY_TOKEN, KEY_USER_ID},
};

#[get("/dashboard", wrap = "AuthGate::super_user()")]
pub async fn dashboard(
    state: web::Data<Arc<AppState>>,
    session: SessionContext,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user_id = session.user_id()?;
    let role = session.0.role.map(|r| r.as_str()).unwrap_or_default();
    // local logins carry no token
    let token = SessionAttributes::from_request(&req).token.unwrap_or_default();

    let payload = ViewPayload::new()
        .with(KEY_ROLE, role)
        .with(KEY_TOKEN, token)
        .with(KEY_USER_ID, user_id);

    let rendered = state.renderer.render(View::Dashboard, &payload)?;
    Ok(rendered.respond(StatusCode::OK))
}
