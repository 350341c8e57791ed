//! Hand-off point to whatever produces the pages.
//!
//! Handlers only ever build a flat key-value payload; turning it into markup is
//! the renderer's job. The default renderer emits the payload as JSON.

use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use serde::Serialize;

use crate::errors::{AppError, AppResult};

pub const KEY_ERROR: &str = "Error";
pub const KEY_ROLE: &str = "Role";
pub const KEY_TOKEN: &str = "Token";
pub const KEY_USER_ID: &str = "UserID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViewPayload(BTreeMap<&'static str, String>);

impl ViewPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(key, value.into());
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new().with(KEY_ERROR, message)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub content_type: &'static str,
    pub body: String,
}

impl RenderedView {
    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponseBuilder::new(status)
            .content_type(self.content_type)
            .body(self.body)
    }
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: View, payload: &ViewPayload) -> AppResult<RenderedView>;
}

#[derive(Serialize)]
struct JsonView<'a> {
    view: View,
    data: &'a ViewPayload,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViewRenderer;

impl ViewRenderer for JsonViewRenderer {
    fn render(&self, view: View, payload: &ViewPayload) -> AppResult<RenderedView> {
        let body = serde_json::to_string(&JsonView { view, data: payload })
            .map_err(|e| AppError::InternalError(format!("Failed to render view: {}", e)))?;

        Ok(RenderedView {
            content_type: "application/json",
            body,
        })
    }
}
