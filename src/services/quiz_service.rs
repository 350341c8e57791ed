use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::AppResult,
    models::{domain::Quiz, dto::request::CreateQuizRequest},
    repositories::QuizRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest, created_by: &str) -> AppResult<Quiz> {
        request.validate()?;

        let quiz = Quiz::new(
            request.title.trim(),
            request.theme.trim(),
            request.difficulty.trim(),
            created_by,
        );
        let quiz = self.repository.create(quiz).await?;

        log::info!("user_id={} created quiz {}", created_by, quiz.quiz_id);
        Ok(quiz)
    }
}
