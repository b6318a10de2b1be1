use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use habitat_store::HierarchyStore;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handler;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HierarchyStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self { store }
    }

    /// Run `f` against the store on the blocking pool. Backends do
    /// synchronous I/O and must not stall the async workers.
    pub async fn blocking<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn HierarchyStore) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
    }
}

/// Build the axum router with all Habitat endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/buildings",
            get(handler::list_buildings).post(handler::create_building),
        )
        .route(
            "/buildings/:building_id",
            get(handler::get_building)
                .put(handler::update_building)
                .delete(handler::delete_building),
        )
        .route(
            "/buildings/:building_id/floors",
            get(handler::list_floors).post(handler::create_floor),
        )
        .route(
            "/buildings/:building_id/floors/:floor_id",
            get(handler::get_floor)
                .put(handler::update_floor)
                .delete(handler::delete_floor),
        )
        .route(
            "/buildings/:building_id/floors/:floor_id/rooms",
            get(handler::list_rooms).post(handler::create_room),
        )
        .route(
            "/buildings/:building_id/floors/:floor_id/rooms/:room_id",
            get(handler::get_room)
                .put(handler::update_room)
                .delete(handler::delete_room),
        )
        .route("/ping", get(handler::ping))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
