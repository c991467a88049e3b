use std::sync::Arc;

use mlb_contracts::{ParameterName, Parameters, SetParametersResult};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::controller::Controller;
use crate::monitor::Monitor;
use crate::ports::{OffsetSink, TopoSource};
use crate::stores::{NeighborStore, OcnStore, ParameterStore, UeCountStore};

/// Boot-time parameter seeds handed to the manager: CLI-supplied defaults
/// plus the configuration collaborator's resolved interval (§4.4, §6).
#[derive(Debug, Clone, Copy)]
pub struct BootParameters {
    pub interval_secs: i64,
    pub overload_threshold: i64,
    pub target_threshold: i64,
    pub delta_ocn: i64,
}

impl Default for BootParameters {
    /// `delta_ocn` defaults to 3 and `interval` to 10, per §6.
    fn default() -> Self {
        Self {
            interval_secs: 10,
            overload_threshold: 0,
            target_threshold: 0,
            delta_ocn: 3,
        }
    }
}

/// Owns the stores and wires Monitor/Controller together. Hands shared
/// store handles to the management-API collaborator and runs the
/// controller until cancellation (§4.4).
pub struct Manager {
    pub neighbors: Arc<NeighborStore>,
    pub ue_counts: Arc<UeCountStore>,
    pub ocn: Arc<OcnStore>,
    pub parameters: Arc<ParameterStore>,
    controller: Arc<Controller>,
}

impl Manager {
    pub fn new(
        boot: BootParameters,
        topo_source: Arc<dyn TopoSource>,
        offset_sink: Arc<dyn OffsetSink>,
    ) -> Self {
        let neighbors = Arc::new(NeighborStore::new());
        let ue_counts = Arc::new(UeCountStore::new());
        let ocn = Arc::new(OcnStore::new());
        let parameters = Arc::new(ParameterStore::seeded(
            boot.interval_secs,
            boot.overload_threshold,
            boot.target_threshold,
            boot.delta_ocn,
        ));

        let monitor = Monitor::new(topo_source, neighbors.clone(), ue_counts.clone(), ocn.clone());
        let controller = Arc::new(Controller::new(
            monitor,
            parameters.clone(),
            neighbors.clone(),
            ue_counts.clone(),
            ocn.clone(),
            offset_sink,
        ));

        Self {
            neighbors,
            ue_counts,
            ocn,
            parameters,
            controller,
        }
    }

    /// Spawns the controller tick loop, returning its join handle.
    /// Callers run this concurrently with the management-API server and
    /// select on both, terminating on whichever finishes or on the
    /// cancellation token.
    pub fn spawn_controller(&self, token: CancellationToken) -> JoinHandle<()> {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            info!("controller tick loop starting");
            controller.run(token).await;
            info!("controller tick loop stopped");
        })
    }

    /// `GetParameters` — reads the current parameter registry.
    pub fn get_parameters(&self) -> Result<Parameters, mlb_contracts::ControllerError> {
        Ok(Parameters {
            interval: self.parameters.get(ParameterName::Interval)? as i32,
            overload_threshold: self.parameters.get(ParameterName::OverloadThreshold)? as i32,
            target_threshold: self.parameters.get(ParameterName::TargetThreshold)? as i32,
            delta_ocn: self.parameters.get(ParameterName::DeltaOcn)? as i32,
        })
    }

    /// `SetParameters` — every sub-`Put` is attempted regardless of
    /// earlier failures; overall success is the conjunction of all four
    /// (§6). This differs deliberately from the upstream implementation's
    /// short-circuit-on-first-failure behavior; see DESIGN.md.
    pub fn set_parameters(&self, params: Parameters) -> SetParametersResult {
        let results = [
            self.parameters
                .update(ParameterName::Interval, params.interval as i64),
            self.parameters
                .update(ParameterName::OverloadThreshold, params.overload_threshold as i64),
            self.parameters
                .update(ParameterName::TargetThreshold, params.target_threshold as i64),
            self.parameters
                .update(ParameterName::DeltaOcn, params.delta_ocn as i64),
        ];
        SetParametersResult {
            success: results.iter().all(Result::is_ok),
        }
    }

    /// `GetOcn` — a full snapshot of the Ocn matrix.
    pub fn get_ocn(&self) -> std::collections::HashMap<mlb_contracts::CellKey, std::collections::HashMap<mlb_contracts::CellKey, mlb_contracts::Offset>> {
        self.ocn.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{Snapshot, TopoRecord};
    use async_trait::async_trait;

    struct EmptyTopoSource;

    #[async_trait]
    impl TopoSource for EmptyTopoSource {
        async fn fetch_snapshot(
            &self,
            _token: CancellationToken,
        ) -> Result<Snapshot, mlb_contracts::ControllerError> {
            Ok(Snapshot::default())
        }
    }

    struct NoopSink;

    #[async_trait]
    impl OffsetSink for NoopSink {
        async fn emit(
            &self,
            _target: &mlb_contracts::CellKey,
            _serving_node_id: &str,
            _offset: mlb_contracts::Offset,
            _token: CancellationToken,
        ) -> Result<(), mlb_contracts::ControllerError> {
            Ok(())
        }
    }

    #[allow(dead_code)]
    fn sample_snapshot() -> Snapshot {
        vec![TopoRecord::UeCount(
            mlb_contracts::CellKey::new("n", "p", "c", "o"),
            mlb_contracts::Measurement(1),
        )]
    }

    #[test]
    fn get_parameters_reflects_boot_defaults() {
        let manager = Manager::new(
            BootParameters::default(),
            Arc::new(EmptyTopoSource),
            Arc::new(NoopSink),
        );
        let params = manager.get_parameters().unwrap();
        assert_eq!(params.delta_ocn, 3);
        assert_eq!(params.interval, 10);
    }

    #[test]
    fn set_then_get_parameters_roundtrips() {
        let manager = Manager::new(
            BootParameters::default(),
            Arc::new(EmptyTopoSource),
            Arc::new(NoopSink),
        );
        let target = Parameters {
            interval: 5,
            overload_threshold: 90,
            target_threshold: 10,
            delta_ocn: 2,
        };
        let result = manager.set_parameters(target);
        assert!(result.success);
        assert_eq!(manager.get_parameters().unwrap(), target);
    }
}
