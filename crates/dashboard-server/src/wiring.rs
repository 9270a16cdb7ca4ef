use axum::{routing::get, Router};
use runtime::EngineHandle;

pub fn build_app(handle: EngineHandle) -> Router {
    debug_assert!(runtime::module_ready());
    debug_assert!(api::module_ready());
    debug_assert!(ui::module_ready());

    api::routes::router(api::AppState::new(handle)).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use runtime::{EngineHandle, TradingEngine};
    use tower::ServiceExt;

    fn test_app() -> axum::Router {
        let engine = TradingEngine::new(1, 1_700_000_000_000);
        super::build_app(EngineHandle::new(engine))
    }

    #[tokio::test]
    async fn server_healthcheck_responds_ok() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn server_serves_the_trading_page() {
        let response = test_app()
            .oneshot(Request::get("/trading").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
