use async_trait::async_trait;
use mlb_contracts::{CellKey, ControllerError, Offset};
use mlb_core::OffsetSink;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// An `OffsetSink` adapter that posts outbound offset updates to a
/// downstream collaborator over HTTP, per §6's "OffsetSink endpoint" boot
/// configuration (default port 5150) and "action ID" passthrough.
pub struct HttpOffsetSink {
    client: reqwest::Client,
    endpoint_url: String,
    ric_action_id: i32,
}

impl HttpOffsetSink {
    pub fn new(client: reqwest::Client, endpoint: &str, ric_action_id: i32) -> Self {
        Self {
            client,
            endpoint_url: format!("https://{endpoint}/offsets"),
            ric_action_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireOffsetUpdate<'a> {
    cell: &'a CellKey,
    node_id: &'a str,
    offset_db: i32,
    ric_action_id: i32,
}

#[async_trait]
impl OffsetSink for HttpOffsetSink {
    async fn emit(
        &self,
        target: &CellKey,
        serving_node_id: &str,
        offset: Offset,
        token: CancellationToken,
    ) -> Result<(), ControllerError> {
        let body = WireOffsetUpdate {
            cell: target,
            node_id: serving_node_id,
            offset_db: offset.db(),
            ric_action_id: self.ric_action_id,
        };

        let request = self.client.post(&self.endpoint_url).json(&body).send();
        let response = tokio::select! {
            result = request => result,
            _ = token.cancelled() => return Err(ControllerError::Cancelled),
        }
        .map_err(|e| ControllerError::Unavailable(format!("OffsetSink request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ControllerError::Unavailable(format!(
                "OffsetSink returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
