use std::sync::Arc;

use actix_web::{http::header::LOCATION, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AuthGate, SessionContext},
    errors::AppError,
    models::dto::request::CreateQuizRequest,
};

#[post("/create-quiz", wrap = "AuthGate::super_user()")]
pub async fn create_quiz(
    state: web::Data<Arc<AppState>>,
    session: SessionContext,
    form: web::Form<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = session.user_id()?;
    state
        .quiz_service
        .create_quiz(form.into_inner(), user_id)
        .await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((LOCATION, "/dashboard"))
        .finish())
}
