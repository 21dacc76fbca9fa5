//! `reqwest` implementation of [`TodoApi`].

use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use thiserror::Error;
use todolist_model::{ApiError, NewTodo, Todo, TodoApi, TodoId, TodoPatch};

/// Errors building an [`HttpTodoApi`]
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The base URL does not parse or cannot carry a path
    #[error("invalid API base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The URL as configured
        url: String,
        /// What was wrong with it
        reason: String,
    },

    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Talks to the todo REST API over HTTP
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    todos: Url,
}

impl HttpTodoApi {
    /// Creates a client for the API rooted at `config.api_url`
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError`] if the URL is unusable or the client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, HttpClientError> {
        let invalid = |reason: String| HttpClientError::InvalidBaseUrl {
            url: config.api_url.clone(),
            reason,
        };

        let mut todos = Url::parse(&config.api_url).map_err(|e| invalid(e.to_string()))?;
        todos
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("todos");

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, todos })
    }

    fn todo_url(&self, id: &TodoId) -> Url {
        let mut url = self.todos.clone();
        // `todos` was checked to be a base URL in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }
        url
    }

    /// Turns non-2xx responses into [`ApiError::Status`]
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                message: Some(message),
                ..
            })
            | Ok(ErrorBody {
                error: Some(message),
                ..
            }) => message,
            _ => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn transport(error: reqwest::Error) -> ApiError {
    if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        ApiError::Network(error.to_string())
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self
            .client
            .get(self.todos.clone())
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?.json().await.map_err(transport)
    }

    #[tracing::instrument(skip(self, new_todo), fields(title = %new_todo.title))]
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, ApiError> {
        let response = self
            .client
            .post(self.todos.clone())
            .json(&new_todo)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?.json().await.map_err(transport)
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.todo_url(id))
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.todo_url(id))
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }
}
