use async_trait::async_trait;
use tracker_types::{CellAddress, CellConflict, CellValue, UpdateCellRequest, UpdateCellResponse};

use crate::config::TabularConfig;
use crate::error::TabularError;

/// Result of one `PUT /cell/...` round trip that produced an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum CellWriteOutcome {
    /// The backend persisted `new_value`, possibly normalized.
    Committed { new_value: CellValue },
    /// Any non-success status. Usually a lost update (409) carrying the
    /// stored value, but every failure status lands here.
    Rejected { status: u16, conflict: CellConflict },
}

/// Backend endpoint for single-cell updates.
#[async_trait(?Send)]
pub trait CellApi {
    async fn put_cell(
        &self,
        address: &CellAddress,
        request: &UpdateCellRequest,
    ) -> Result<CellWriteOutcome, TabularError>;
}

#[derive(Debug, Clone)]
pub struct HttpCellApi {
    endpoint: String,
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::Client,
}

impl HttpCellApi {
    pub fn new(config: &TabularConfig) -> Self {
        Self {
            endpoint: config.endpoint(),
            #[cfg(not(target_arch = "wasm32"))]
            client: reqwest::Client::new(),
        }
    }

    pub fn cell_url(&self, address: &CellAddress) -> String {
        format!("{}/{}", self.endpoint, address.path())
    }
}

fn rejected(status: u16, body: Result<CellConflict, TabularError>) -> CellWriteOutcome {
    let conflict = body.unwrap_or_else(|e| {
        tracing::debug!(status, "Failure body is not a conflict payload: {e}");
        CellConflict::default()
    });
    CellWriteOutcome::Rejected { status, conflict }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl CellApi for HttpCellApi {
    async fn put_cell(
        &self,
        address: &CellAddress,
        request: &UpdateCellRequest,
    ) -> Result<CellWriteOutcome, TabularError> {
        use gloo_net::http::Request;

        let url = self.cell_url(address);

        // `json` also sets `Content-Type: application/json`.
        let response = Request::put(&url).json(request)?.send().await?;

        if !response.ok() {
            let status = response.status();
            let body = response.json::<CellConflict>().await.map_err(TabularError::from);
            return Ok(rejected(status, body));
        }

        let data: UpdateCellResponse = response.json().await?;
        Ok(CellWriteOutcome::Committed {
            new_value: data.new_value,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl CellApi for HttpCellApi {
    async fn put_cell(
        &self,
        address: &CellAddress,
        request: &UpdateCellRequest,
    ) -> Result<CellWriteOutcome, TabularError> {
        let url = self.cell_url(address);

        // `json` also sets `Content-Type: application/json`.
        let response = self.client.put(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<CellConflict>().await.map_err(TabularError::from);
            return Ok(rejected(status.as_u16(), body));
        }

        let data: UpdateCellResponse = response.json().await?;
        Ok(CellWriteOutcome::Committed {
            new_value: data.new_value,
        })
    }
}
