use std::sync::Arc;

use crate::prediction::CareerPredictor;
use crate::store::TableStore;
use crate::views::Views;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Record store backend, selected by `STORE_BACKEND`.
    pub store: Arc<dyn TableStore>,
    pub predictor: Arc<CareerPredictor>,
    pub views: Arc<Views>,
}
