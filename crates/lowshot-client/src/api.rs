//! HTTP implementation of [`IBenchmarkApi`].

use std::time::Duration;

use serde_json::{json, Value};

use lowshot_core::config::ApiConfig;
use lowshot_core::constants::{HEADER_SESSION_TOKEN, HEADER_USER_SECRET};
use lowshot_core::errors::ApiError;
use lowshot_core::models::{
    DataSplit, LabelRecord, PredictionBatch, SessionStatus, SessionToken, TaskMetadata,
};
use lowshot_core::traits::IBenchmarkApi;

use crate::response;
use crate::retry::{retry_with_backoff, RetryPolicy};

fn transport_err(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            reason: err.to_string(),
        }
    } else {
        ApiError::ConnectionFailed {
            reason: err.to_string(),
        }
    }
}

/// Blocking client for the benchmark service.
///
/// Immutable after construction, so a single instance can back any
/// number of sequential sessions. Auth headers are composed per call
/// from the stored secret and the caller's token.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    team_secret: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(transport_err)?;
        Ok(Self {
            http,
            base_url: config.environment.base_url().to_string(),
            team_secret: config.team_secret.clone(),
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str, token: Option<&SessionToken>) -> Result<(u16, Value), ApiError> {
        tracing::debug!("api: GET {path}");
        let mut request = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header(HEADER_USER_SECRET, &self.team_secret);
        if let Some(token) = token {
            request = request.header(HEADER_SESSION_TOKEN, token.as_str());
        }
        let resp = request.send().map_err(transport_err)?;
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().map_err(|e| ApiError::Protocol {
            message: format!("response is not JSON: {e}"),
        })?;
        Ok((status, body))
    }

    fn post(
        &self,
        path: &str,
        payload: &Value,
        token: Option<&SessionToken>,
    ) -> Result<(u16, Value), ApiError> {
        tracing::debug!("api: POST {path}");
        let mut request = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header(HEADER_USER_SECRET, &self.team_secret)
            .json(payload);
        if let Some(token) = token {
            request = request.header(HEADER_SESSION_TOKEN, token.as_str());
        }
        let resp = request.send().map_err(transport_err)?;
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().map_err(|e| ApiError::Protocol {
            message: format!("response is not JSON: {e}"),
        })?;
        Ok((status, body))
    }
}

impl IBenchmarkApi for ApiClient {
    fn list_tasks(&self) -> Result<Vec<String>, ApiError> {
        retry_with_backoff(&self.retry, ApiError::is_transient, || {
            let (status, body) = self.get("/list_tasks", None)?;
            response::parse_task_list(status, &body)
        })
    }

    fn task_metadata(&self, task_id: &str) -> Result<TaskMetadata, ApiError> {
        retry_with_backoff(&self.retry, ApiError::is_transient, || {
            let (status, body) = self.get(&format!("/task_metadata/{task_id}"), None)?;
            response::ensure_success(status, &body)?;
            let mut meta: TaskMetadata = response::decode_field(&body, "task_metadata")?;
            meta.task_id = task_id.to_string();
            Ok(meta)
        })
    }

    fn start_session(
        &self,
        task_id: &str,
        session_name: &str,
        data_split: DataSplit,
    ) -> Result<SessionToken, ApiError> {
        let payload = json!({
            "session_name": session_name,
            "data_type": data_split.to_string(),
            "task_id": task_id,
        });
        retry_with_backoff(&self.retry, ApiError::is_transient, || {
            let (status, body) = self.post("/auth/create_session", &payload, None)?;
            response::ensure_success(status, &body)?;
            response::decode_field(&body, "session_token")
        })
    }

    fn session_status(&self, token: &SessionToken) -> Result<SessionStatus, ApiError> {
        retry_with_backoff(&self.retry, ApiError::is_transient, || {
            let (status, body) = self.get("/session_status", Some(token))?;
            response::ensure_success(status, &body)?;
            response::decode_field(&body, "Session_Status")
        })
    }

    fn seed_labels(&self, token: &SessionToken) -> Result<Vec<LabelRecord>, ApiError> {
        let (status, body) = self.get("/seed_labels", Some(token))?;
        response::parse_seed_labels(status, &body)
    }

    fn submit_predictions(
        &self,
        token: &SessionToken,
        predictions: &PredictionBatch,
    ) -> Result<(), ApiError> {
        let payload = json!({ "predictions": predictions });
        retry_with_backoff(&self.retry, ApiError::is_transient, || {
            let (status, body) = self.post("/submit_predictions", &payload, Some(token))?;
            response::handle_submit(status, &body)
        })
    }

    fn query_labels(
        &self,
        token: &SessionToken,
        item_ids: &[String],
    ) -> Result<Vec<LabelRecord>, ApiError> {
        let payload = json!({ "example_ids": item_ids });
        retry_with_backoff(&self.retry, ApiError::is_transient, || {
            let (status, body) = self.post("/query_labels", &payload, Some(token))?;
            response::ensure_success(status, &body)?;
            response::decode_field(&body, "Labels")
        })
    }
}
