//! Coalesces rapid weight edits into one database write per parameter.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storage::Database;
use storage::error::Result;
use storage::models::Parameter;
use storage::repository::parameter::ParameterRepository;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[async_trait]
pub trait WeightSink: Send + Sync + 'static {
    async fn write_weight(&self, parameter_id: Uuid, weight: f64) -> Result<()>;
}

#[async_trait]
impl WeightSink for Database {
    async fn write_weight(&self, parameter_id: Uuid, weight: f64) -> Result<()> {
        ParameterRepository::new(self.pool())
            .set_weight(parameter_id, weight)
            .await
    }
}

struct PendingWrite {
    weight: f64,
    generation: u64,
    handle: JoinHandle<()>,
}

/// Per-parameter debounce queue. A newer write for the same parameter
/// supersedes the older one, so the latest value always wins.
///
/// Writes run one at a time under `gate`. A task only writes if its
/// generation is still the pending one once it holds the gate, and
/// [`discard`](Self::discard) takes the gate before aborting, so a cancelled
/// write can never reach the database after the caller moves on.
#[derive(Clone)]
pub struct WeightWriteQueue {
    sink: Arc<dyn WeightSink>,
    delay: Duration,
    pending: Arc<Mutex<HashMap<Uuid, PendingWrite>>>,
    generation: Arc<AtomicU64>,
    gate: Arc<Mutex<()>>,
}

impl WeightWriteQueue {
    pub fn new(sink: Arc<dyn WeightSink>, delay: Duration) -> Self {
        Self {
            sink,
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Queues `weight` for `parameter_id`, replacing any value still waiting.
    pub async fn schedule(&self, parameter_id: Uuid, weight: f64) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let mut pending = self.pending.lock().await;

        // The superseded task may already be writing; it sees the new
        // generation and skips, or finishes before this one starts.
        if pending.remove(&parameter_id).is_some() {
            tracing::debug!(%parameter_id, "Superseded pending weight write");
        }

        let queue = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(queue.delay).await;
            queue.fire(parameter_id, weight, generation).await;
        });

        pending.insert(
            parameter_id,
            PendingWrite {
                weight,
                generation,
                handle,
            },
        );
    }

    async fn fire(&self, parameter_id: Uuid, weight: f64, generation: u64) {
        let _gate = self.gate.lock().await;
        if !self.is_current(parameter_id, generation).await {
            return;
        }

        if let Err(e) = self.sink.write_weight(parameter_id, weight).await {
            tracing::error!(%parameter_id, "Failed to persist weight {}: {}", weight, e);
        }

        let mut pending = self.pending.lock().await;
        if pending
            .get(&parameter_id)
            .is_some_and(|p| p.generation == generation)
        {
            pending.remove(&parameter_id);
        }
    }

    async fn is_current(&self, parameter_id: Uuid, generation: u64) -> bool {
        self.pending
            .lock()
            .await
            .get(&parameter_id)
            .is_some_and(|p| p.generation == generation)
    }

    /// Drops pending writes for the given parameters without running them.
    /// Waits for a write already in progress to finish first.
    pub async fn discard(&self, parameter_ids: &[Uuid]) {
        let _gate = self.gate.lock().await;
        let mut pending = self.pending.lock().await;
        for id in parameter_ids {
            if let Some(write) = pending.remove(id) {
                write.handle.abort();
            }
        }
    }

    /// Weights not yet written, keyed by parameter.
    pub async fn pending_weights(&self) -> HashMap<Uuid, f64> {
        self.pending
            .lock()
            .await
            .iter()
            .map(|(id, write)| (*id, write.weight))
            .collect()
    }

    /// Replaces stored weights with the ones still waiting to be written.
    pub async fn overlay(&self, params: &mut [Parameter]) {
        let pending = self.pending_weights().await;
        for param in params.iter_mut() {
            if let Some(weight) = pending.get(&param.parameter_id) {
                param.weight = *weight;
            }
        }
    }

    /// Writes every pending value immediately. Used on shutdown.
    pub async fn flush(&self) {
        let _gate = self.gate.lock().await;
        let drained: Vec<(Uuid, PendingWrite)> = self.pending.lock().await.drain().collect();
        for (parameter_id, write) in drained {
            write.handle.abort();
            if let Err(e) = self.sink.write_weight(parameter_id, write.weight).await {
                tracing::error!(%parameter_id, "Failed to flush weight {}: {}", write.weight, e);
            }
        }
    }
}
