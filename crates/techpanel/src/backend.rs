//! The backend routes the panel talks to.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PanelError;
use crate::form::{parse_history, HistoryEntry, ReplaceForm, SelectData};
use crate::http::{AdminClient, GetOutcome, PostOutcome};

/// Admin command that reloads the dropdown sources on the server.
pub const UPDATE_SELECT_DATA: &str = "updateSelectData";

#[async_trait]
pub trait FormBackend: Send + Sync {
    /// `GET /getData`.
    async fn select_data(&self) -> Result<SelectData, PanelError>;

    /// `GET /getHistoryData`.
    async fn history(&self) -> Result<Vec<HistoryEntry>, PanelError>;

    /// `POST /postSetData` for a new form, `POST /postEditData` when the form
    /// carries an id.
    async fn submit(&self, form: ReplaceForm) -> PostOutcome;

    /// `POST /postDeleteData`.
    async fn delete(&self, id: i64) -> PostOutcome;

    /// `GET /internal/admin`.
    async fn admin(&self, token: String, command: String) -> GetOutcome;
}

pub type SharedBackend = Arc<dyn FormBackend>;

#[derive(Serialize)]
struct WithInitData<'a, T: Serialize> {
    #[serde(flatten)]
    payload: &'a T,
    #[serde(rename = "initData")]
    init_data: &'a str,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "initData")]
    init_data: &'a str,
}

/// [`FormBackend`] over HTTP.
pub struct HttpBackend {
    client: AdminClient,
    init_data: String,
}

impl HttpBackend {
    pub fn new(client: AdminClient, init_data: impl Into<String>) -> Self {
        Self {
            client,
            init_data: init_data.into(),
        }
    }

    pub fn shared(self) -> SharedBackend {
        Arc::new(self)
    }
}

#[async_trait]
impl FormBackend for HttpBackend {
    async fn select_data(&self) -> Result<SelectData, PanelError> {
        let outcome = self.client.send_get("/getData", "").await;
        if !outcome.success {
            return Err(PanelError::Request(outcome.response));
        }
        Ok(serde_json::from_str(&outcome.response_body)?)
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, PanelError> {
        let query = format!("initData={}", urlencoding::encode(&self.init_data));
        let outcome = self.client.send_get("/getHistoryData", &query).await;
        if !outcome.success {
            return Err(PanelError::Request(outcome.response));
        }
        Ok(parse_history(&outcome.response_body)?)
    }

    async fn submit(&self, form: ReplaceForm) -> PostOutcome {
        let path = if form.id.is_some() {
            "/postEditData"
        } else {
            "/postSetData"
        };
        let body = WithInitData {
            payload: &form,
            init_data: &self.init_data,
        };
        self.client.send_post(path, &body).await
    }

    async fn delete(&self, id: i64) -> PostOutcome {
        let body = DeleteRequest {
            id,
            init_data: &self.init_data,
        };
        self.client.send_post("/postDeleteData", &body).await
    }

    async fn admin(&self, token: String, command: String) -> GetOutcome {
        self.client.admin_command(&token, &command).await
    }
}
