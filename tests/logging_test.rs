//! Integration tests for failure logging across the request path.

mod helpers;

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Records the target of every ERROR event.
#[derive(Clone, Default)]
struct ErrorTargets(Arc<Mutex<Vec<String>>>);

impl ErrorTargets {
    fn storefront(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|target| target.starts_with("storefront"))
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for ErrorTargets {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0
                .lock()
                .unwrap()
                .push(event.metadata().target().to_string());
        }
    }
}

#[tokio::test]
async fn test_server_error_logged_once() {
    let targets = ErrorTargets::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(targets.clone()));

    let app = helpers::TestApp::new().await;
    app.db.close().await;

    let response = app.request("GET", "/api/customer", None).await;

    response.assert_problem(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        targets.storefront(),
        vec!["storefront_service::failure".to_string()]
    );
}

#[tokio::test]
async fn test_client_error_logged_once() {
    let targets = ErrorTargets::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(targets.clone()));

    let app = helpers::TestApp::new().await;

    let response = app.request("DELETE", "/api/order/99", None).await;

    response.assert_problem(StatusCode::NOT_FOUND);
    assert_eq!(
        targets.storefront(),
        vec!["storefront_service::failure".to_string()]
    );
}
