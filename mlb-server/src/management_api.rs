//! The management-API surface: three JSON endpoints over the axum router
//! backed directly by the `Manager`'s store handles (§6).
//!
//! `GET /v1/parameters`, `PUT /v1/parameters` and `GET /v1/ocn` are a
//! direct restatement of the original gRPC service's three RPCs as a JSON
//! API — the teacher's stack has no `tonic` precedent, but a mature `axum`
//! JSON-handler idiom throughout its own route modules (see DESIGN.md).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use mlb_contracts::Parameters;
use mlb_core::Manager;
use tracing::warn;

#[derive(Clone)]
struct ApiState {
    manager: Arc<Manager>,
}

pub fn router(manager: Arc<Manager>) -> Router {
    Router::new()
        .route("/v1/parameters", get(get_parameters).put(set_parameters))
        .route("/v1/ocn", get(get_ocn))
        .with_state(ApiState { manager })
}

/// `GetParameters()` — §6.1.
async fn get_parameters(State(state): State<ApiState>) -> impl IntoResponse {
    match state.manager.get_parameters() {
        Ok(params) => Json(params).into_response(),
        Err(e) => {
            warn!("GetParameters failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// `SetParameters(...)` — §6.2. Every sub-`Put` is attempted regardless of
/// earlier failures; a single failure yields `success=false` without
/// rollback, never an HTTP error status.
async fn set_parameters(
    State(state): State<ApiState>,
    Json(params): Json<Parameters>,
) -> impl IntoResponse {
    Json(state.manager.set_parameters(params))
}

/// `GetOcn()` — §6.3. Outer and inner `CellKey`s are rendered as
/// `"NodeID:PlmnID:CellID:CellObjID"` strings, offsets as signed dB
/// integers, per the wire contract.
async fn get_ocn(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.manager.get_ocn();
    let wire: HashMap<String, HashMap<String, i32>> = snapshot
        .into_iter()
        .map(|(outer, row)| {
            let inner = row
                .into_iter()
                .map(|(inner, offset)| (inner.to_string(), offset.db()))
                .collect();
            (outer.to_string(), inner)
        })
        .collect();
    Json(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use mlb_core::ports::{Snapshot, TopoSource};
    use mlb_core::{BootParameters, OffsetSink};
    use async_trait::async_trait;
    use mlb_contracts::{CellKey, ControllerError, Offset};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    struct EmptyTopoSource;

    #[async_trait]
    impl TopoSource for EmptyTopoSource {
        async fn fetch_snapshot(
            &self,
            _token: CancellationToken,
        ) -> Result<Snapshot, ControllerError> {
            Ok(Snapshot::default())
        }
    }

    struct NoopSink;

    #[async_trait]
    impl OffsetSink for NoopSink {
        async fn emit(
            &self,
            _target: &CellKey,
            _serving_node_id: &str,
            _offset: Offset,
            _token: CancellationToken,
        ) -> Result<(), ControllerError> {
            Ok(())
        }
    }

    fn harness() -> Arc<Manager> {
        Arc::new(Manager::new(
            BootParameters::default(),
            Arc::new(EmptyTopoSource),
            Arc::new(NoopSink),
        ))
    }

    #[tokio::test]
    async fn get_parameters_returns_boot_defaults() {
        let app = router(harness());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/parameters")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let params: Parameters = serde_json::from_slice(&body).unwrap();
        assert_eq!(params.delta_ocn, 3);
    }

    #[tokio::test]
    async fn set_parameters_round_trips_through_get() {
        let app = router(harness());
        let target = Parameters {
            interval: 5,
            overload_threshold: 90,
            target_threshold: 10,
            delta_ocn: 2,
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/v1/parameters")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&target).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/parameters")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let params: Parameters = serde_json::from_slice(&body).unwrap();
        assert_eq!(params, target);
    }

    #[tokio::test]
    async fn get_ocn_renders_stringified_keys() {
        let manager = harness();
        let a = CellKey::new("node1", "315010", "a", "obj-a");
        let b = CellKey::new("node1", "315010", "b", "obj-b");
        manager.ocn.ensure_outer(&a);
        manager.ocn.put_inner(&a, b.clone(), Offset::ZERO).unwrap();

        let app = router(manager);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/ocn")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let wire: HashMap<String, HashMap<String, i32>> = serde_json::from_slice(&body).unwrap();
        assert_eq!(wire[&a.to_string()][&b.to_string()], 0);
    }
}
