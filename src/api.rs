use std::future::Future;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::{DeadlineError, Result};
use crate::models::{encode_date_for_sending, Deadline, DeadlineId, ValidDraft};

const LIST_PATH: &str = "api/deadline/all";
const CREATE_PATH: &str = "api/deadline/create";
const UPDATE_PATH: &str = "api/deadline/update";
const DELETE_PATH: &str = "api/deadline/delete";

/// The remote deadline service.
///
/// A call resolves to `Ok` only when the server confirmed the operation.
pub trait DeadlineApi: Send + Sync {
    /// Fetches every deadline.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Deadline>>> + Send;

    /// Creates a deadline and returns it with its server-assigned id.
    fn create(&self, draft: &ValidDraft) -> impl Future<Output = Result<Deadline>> + Send;

    /// Overwrites title, description and due date of `deadline.id`.
    fn update(&self, deadline: &Deadline) -> impl Future<Output = Result<()>> + Send;

    fn delete(&self, id: DeadlineId) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    title: &'a str,
    description: &'a str,
    end_date: String,
}

/// [`DeadlineApi`] over HTTP + JSON.
#[derive(Debug, Clone)]
pub struct HttpDeadlineApi {
    client: Client,
    base_url: String,
}

impl HttpDeadlineApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        HttpDeadlineApi { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl DeadlineApi for HttpDeadlineApi {
    async fn list_all(&self) -> Result<Vec<Deadline>> {
        let url = self.endpoint(LIST_PATH);
        debug!(%url, "listing deadlines");
        let response = self.client.get(&url).send().await?;
        let body = expect_ok("list", response)?.text().await?;
        let deadlines: Vec<Deadline> = serde_json::from_str(&body)?;
        debug!(count = deadlines.len(), "deadlines listed");
        Ok(deadlines)
    }

    async fn create(&self, draft: &ValidDraft) -> Result<Deadline> {
        let url = self.endpoint(CREATE_PATH);
        let request = CreateRequest {
            title: draft.title(),
            description: draft.description(),
            end_date: encode_date_for_sending(draft.end_date()),
        };
        debug!(%url, end_date = %request.end_date, "creating deadline");
        let response = self.client.post(&url).json(&request).send().await?;
        let body = expect_ok("create", response)?.text().await?;
        let created: Deadline = serde_json::from_str(&body)?;
        debug!(id = %created.id, "deadline created");
        Ok(created)
    }

    async fn update(&self, deadline: &Deadline) -> Result<()> {
        let url = self.endpoint(UPDATE_PATH);
        debug!(%url, id = %deadline.id, "updating deadline");
        let response = self.client.patch(&url).json(deadline).send().await?;
        expect_ok("update", response)?;
        Ok(())
    }

    async fn delete(&self, id: DeadlineId) -> Result<()> {
        let url = self.endpoint(DELETE_PATH);
        debug!(%url, %id, "deleting deadline");
        let response = self.client.delete(&url).json(&id).send().await?;
        expect_ok("delete", response)?;
        Ok(())
    }
}

fn expect_ok(operation: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        Ok(response)
    } else {
        Err(DeadlineError::Status {
            operation,
            status: status.as_u16(),
        })
    }
}
