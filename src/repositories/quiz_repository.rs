use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use super::user_repository::is_duplicate_key;
use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Stores a new quiz. A repeated `quiz_id` is `AppError::AlreadyExists`.
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    quizzes: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            quizzes: db.get_collection(collection_name),
        }
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        match self.quizzes.insert_one(&quiz).await {
            Ok(_) => Ok(quiz),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.quiz_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let unique_id = IndexOptions::builder()
            .unique(true)
            .name("quiz_id_unique".to_string())
            .build();

        self.quizzes
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "quiz_id": 1 })
                    .options(unique_id)
                    .build(),
            )
            .await?;
        log::info!("Ensured unique index on quizzes.quiz_id");

        Ok(())
    }
}
