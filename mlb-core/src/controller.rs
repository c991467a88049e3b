use std::sync::Arc;
use std::time::Duration;

use mlb_contracts::{CellKey, ControllerError, Offset, ParameterName};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::monitor::Monitor;
use crate::ports::OffsetSink;
use crate::stores::{NeighborStore, OcnStore, ParameterStore, UeCountStore};

/// The timer-driven tick loop and per-cell adjustment policy (§4.3).
pub struct Controller {
    monitor: Monitor,
    parameters: Arc<ParameterStore>,
    neighbors: Arc<NeighborStore>,
    ue_counts: Arc<UeCountStore>,
    ocn: Arc<OcnStore>,
    offset_sink: Arc<dyn OffsetSink>,
}

impl Controller {
    pub fn new(
        monitor: Monitor,
        parameters: Arc<ParameterStore>,
        neighbors: Arc<NeighborStore>,
        ue_counts: Arc<UeCountStore>,
        ocn: Arc<OcnStore>,
        offset_sink: Arc<dyn OffsetSink>,
    ) -> Self {
        Self {
            monitor,
            parameters,
            neighbors,
            ue_counts,
            ocn,
            offset_sink,
        }
    }

    /// Runs the tick loop until `token` is cancelled. The interval is
    /// re-read from the parameter store every iteration so management-API
    /// changes take effect on the next tick (§4.3, §9).
    pub async fn run(&self, token: CancellationToken) {
        loop {
            if token.is_cancelled() {
                break;
            }

            let interval_secs = self
                .parameters
                .get(ParameterName::Interval)
                .unwrap_or_else(|e| {
                    error!("interval parameter unavailable ({e}); falling back to 10s");
                    10
                })
                .max(0) as u64;

            if sleep_or_cancel(Duration::from_secs(interval_secs), &token).await {
                break;
            }

            self.tick(token.clone()).await;
        }
    }

    /// One full tick: monitor, then evaluate and adjust every cell.
    async fn tick(&self, token: CancellationToken) {
        match self.monitor.run(token.clone()).await {
            Ok(()) => {}
            Err(ControllerError::EmptySource) => {
                warn!("TopoSource snapshot empty; skipping tick");
                return;
            }
            Err(e) => {
                error!("monitor failed: {e}; skipping tick");
                return;
            }
        }

        if token.is_cancelled() {
            return;
        }

        let (target_threshold, overload_threshold, delta_ocn) =
            match self.read_tick_parameters() {
                Ok(values) => values,
                Err(e) => {
                    error!("missing tick parameter: {e}; skipping tick");
                    return;
                }
            };

        let total_ues: i64 = self
            .ue_counts
            .snapshot_entries()
            .iter()
            .map(|(_, m)| m.value() as i64)
            .sum();

        let mut cells = self.ue_counts.snapshot_keys();
        cells.sort_by(|a, b| a.to_string().cmp(&b.to_string()));

        for cell in cells {
            if token.is_cancelled() {
                return;
            }
            if let Err(e) = self
                .process_cell(&cell, total_ues, target_threshold, overload_threshold, delta_ocn, &token)
                .await
            {
                error!("per-cell processing failed for {cell}: {e}; aborting remaining cells this tick");
                break;
            }
        }
    }

    fn read_tick_parameters(&self) -> Result<(i64, i64, i64), ControllerError> {
        let target = self.parameters.get(ParameterName::TargetThreshold)?;
        let overload = self.parameters.get(ParameterName::OverloadThreshold)?;
        let delta = self.parameters.get(ParameterName::DeltaOcn)?;
        Ok((target, overload, delta))
    }

    /// Classifies `cell` and applies the matching adjustment. See §4.3
    /// "Per-cell procedure".
    async fn process_cell(
        &self,
        cell: &CellKey,
        total_ues: i64,
        target_threshold: i64,
        overload_threshold: i64,
        delta_ocn: i64,
        token: &CancellationToken,
    ) -> Result<(), ControllerError> {
        if total_ues == 0 {
            return Ok(());
        }

        let n_c = self.ue_counts.get(cell)?.value() as i64;
        let load_c = 100 * n_c / total_ues;
        debug!(cell = %cell, load = load_c, "evaluated cell load");

        // The second conjunct is redundant unless target_threshold >
        // overload_threshold — a configuration the source does not reject.
        // Both checks are preserved per §9's open question.
        let under_loaded = load_c < target_threshold && load_c < overload_threshold;
        let overloaded = load_c > overload_threshold;

        if under_loaded {
            self.shed_to_neighbors(cell, delta_ocn, token).await?;
        } else if overloaded {
            self.reclaim_from_neighbors(cell, total_ues, target_threshold, delta_ocn, token)
                .await?;
        }

        Ok(())
    }

    async fn shed_to_neighbors(
        &self,
        cell: &CellKey,
        delta_ocn: i64,
        token: &CancellationToken,
    ) -> Result<(), ControllerError> {
        let neighbors = match self.neighbors.get(cell) {
            Ok(list) => list,
            Err(_) => {
                warn!(cell = %cell, "no neighbor list for under-loaded cell; nothing to adjust");
                return Ok(());
            }
        };

        for neighbor in neighbors.iter() {
            let current = self.ocn.get_inner(cell, neighbor).unwrap_or_default();
            let updated = current.decrement(delta_ocn.max(0) as u32);
            self.ocn.put_inner(cell, neighbor.clone(), updated)?;
            self.offset_sink
                .emit(neighbor, &cell.node_id, updated, token.clone())
                .await?;
        }
        Ok(())
    }

    async fn reclaim_from_neighbors(
        &self,
        cell: &CellKey,
        total_ues: i64,
        target_threshold: i64,
        delta_ocn: i64,
        token: &CancellationToken,
    ) -> Result<(), ControllerError> {
        let neighbors = match self.neighbors.get(cell) {
            Ok(list) => list,
            Err(_) => {
                warn!(cell = %cell, "no neighbor list for overloaded cell; nothing to adjust");
                return Ok(());
            }
        };

        for neighbor in neighbors.iter() {
            let n_neighbor = match self.ue_counts.get(neighbor) {
                Ok(m) => m.value() as i64,
                Err(_) => {
                    warn!(neighbor = %neighbor, "no UE count for neighbor; treating as 0");
                    0
                }
            };
            let load_neighbor = 100 * n_neighbor / total_ues;
            if load_neighbor >= target_threshold {
                continue;
            }

            let current = self.ocn.get_inner(cell, neighbor).unwrap_or_default();
            let updated = current.increment(delta_ocn.max(0) as u32);
            self.ocn.put_inner(cell, neighbor.clone(), updated)?;
            self.offset_sink
                .emit(neighbor, &cell.node_id, updated, token.clone())
                .await?;
        }
        Ok(())
    }
}

/// Races a sleep against cancellation, returning `true` if cancellation
/// won (§9 "Timer vs. cancellation").
async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = token.cancelled() => true,
    }
}
