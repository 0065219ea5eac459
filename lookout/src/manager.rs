//! Ownership of the active fire lookouts.
//!
//! The manager keys lookouts by [`ScoutId`], starts each lookout's trigger
//! task on insertion and cancels it on removal. All trigger tasks hang off one
//! root [`CancellationToken`], so [`LookoutManager::shutdown`] stops them all.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::context::LookoutContext;
use crate::fire::FireLookout;
use crate::scout::{ScoutId, ScoutParams};

/// Errors from manager operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// A lookout with this id is already managed.
    #[error("Lookout {0} already exists")]
    DuplicateId(ScoutId),
}

struct ManagedLookout {
    lookout: Arc<FireLookout>,
    cancel: CancellationToken,
    triggers: JoinHandle<()>,
}

/// Collection of fire lookouts sharing one [`LookoutContext`].
pub struct LookoutManager {
    ctx: Arc<LookoutContext>,
    shutdown: CancellationToken,
    lookouts: HashMap<ScoutId, ManagedLookout>,
}

impl LookoutManager {
    pub fn new(ctx: Arc<LookoutContext>) -> Self {
        Self {
            ctx,
            shutdown: CancellationToken::new(),
            lookouts: HashMap::new(),
        }
    }

    /// Creates a lookout, starts its triggers and requests an initial
    /// forecast and place refresh.
    ///
    /// Must be called from within a tokio runtime.
    pub fn add_lookout(&mut self, params: &ScoutParams) -> Result<Arc<FireLookout>, ManagerError> {
        let lookout = Arc::new(FireLookout::new(params, Arc::clone(&self.ctx)));
        let id = lookout.scout().id().clone();
        if self.lookouts.contains_key(&id) {
            return Err(ManagerError::DuplicateId(id));
        }

        let cancel = self.shutdown.child_token();
        let triggers = lookout.start_triggers(cancel.clone());

        let initial = Arc::clone(&lookout);
        tokio::spawn(async move { initial.scout().refresh().await });

        info!(scout = %id, name = %lookout.scout().name(), "lookout added");
        self.lookouts.insert(
            id,
            ManagedLookout {
                lookout: Arc::clone(&lookout),
                cancel,
                triggers,
            },
        );
        Ok(lookout)
    }

    pub fn get(&self, id: &ScoutId) -> Option<Arc<FireLookout>> {
        self.lookouts.get(id).map(|m| Arc::clone(&m.lookout))
    }

    /// Managed ids in sorted order.
    pub fn ids(&self) -> Vec<ScoutId> {
        let mut ids: Vec<ScoutId> = self.lookouts.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lookouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookouts.is_empty()
    }

    /// Removes a lookout and stops its triggers.
    pub fn remove(&mut self, id: &ScoutId) -> Option<Arc<FireLookout>> {
        let managed = self.lookouts.remove(id)?;
        managed.cancel.cancel();
        info!(scout = %id, "lookout removed");
        Some(managed.lookout)
    }

    /// Stops every trigger task and waits for them to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        for (id, managed) in self.lookouts.drain() {
            if let Err(e) = managed.triggers.await {
                debug!(scout = %id, error = %e, "trigger task ended abnormally");
            }
        }
        info!("lookout manager stopped");
    }
}

impl std::fmt::Debug for LookoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookoutManager")
            .field("lookouts", &self.ids())
            .finish_non_exhaustive()
    }
}
