use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{self, AppState, SharedState};
use crate::api::instrument_handlers;
use crate::config::AppConfig;
use crate::store::traits::InstrumentStore;

pub fn create_router<S: InstrumentStore + 'static>() -> Router<SharedState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Instruments. PUT/PATCH without an id segment fall through to 405.
        .route(
            "/api/instruments",
            get(instrument_handlers::list_instruments::<S>)
                .post(instrument_handlers::create_instrument::<S>),
        )
        .route(
            "/api/instruments/:id",
            get(instrument_handlers::get_instrument::<S>)
                .put(instrument_handlers::update_instrument::<S>)
                .patch(instrument_handlers::partial_update_instrument::<S>)
                .delete(instrument_handlers::delete_instrument::<S>),
        )
}

/// Wire a store into a ready-to-serve router.
pub fn build_app<S: InstrumentStore + 'static>(store: Arc<S>, config: &AppConfig) -> Router {
    let state = Arc::new(AppState::new(store, config));
    create_router::<S>().with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryInstrumentStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        build_app(Arc::new(InMemoryInstrumentStore::new()), &AppConfig::default())
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_writes_without_id_segment_are_not_allowed() {
        for method in ["PUT", "PATCH"] {
            let request = Request::builder()
                .method(method)
                .uri("/api/instruments")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"id": 1, "name": "x"}"#))
                .unwrap();
            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[tokio::test]
    async fn test_patch_with_plain_text_is_unsupported() {
        let request = Request::builder()
            .method("PATCH")
            .uri("/api/instruments/1")
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"id": 1}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
