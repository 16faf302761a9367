use std::sync::Arc;

use axum::extract::FromRef;

use crate::snapshot::Snapshot;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
}

impl AppState {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }
}

impl FromRef<AppState> for Arc<Snapshot> {
    fn from_ref(state: &AppState) -> Self {
        state.snapshot.clone()
    }
}
