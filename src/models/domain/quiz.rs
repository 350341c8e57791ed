use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub quiz_id: String,
    pub title: String,
    pub theme: String,
    pub difficulty: String,
    pub question_count: i32, // questions are attached later through the backend API
    pub creation_date: DateTime<Utc>,
    pub created_by: String, // user_id of the session that created it
}

impl Quiz {
    pub fn new(title: &str, theme: &str, difficulty: &str, created_by: &str) -> Self {
        Quiz {
            quiz_id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            theme: theme.to_string(),
            difficulty: difficulty.to_string(),
            question_count: 0,
            creation_date: Utc::now(),
            created_by: created_by.to_string(),
        }
    }
}
