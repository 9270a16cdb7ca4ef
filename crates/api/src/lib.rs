pub mod routes;
pub mod state;
pub mod ws;

use axum::Router;
use runtime::{EngineHandle, TradingEngine};

pub use state::AppState;

pub fn module_ready() -> bool {
    runtime::module_ready() && !ui::landing_page().is_empty()
}

/// Router over a fresh engine; the server wires in its own handle.
pub fn app() -> Router {
    let handle = EngineHandle::new(TradingEngine::new(runtime::now_ms(), runtime::now_ms()));
    routes::router(AppState::new(handle))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::app;

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn pages_serve_html() {
        for path in ["/", "/dashboard", "/trading"] {
            let response = app()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn snapshot_reports_the_seeded_state() {
        let response = app()
            .oneshot(
                Request::get("/api/trading/snapshot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["price"], 0.24);
        assert_eq!(body["storage_kwh"], 8.5);
        assert_eq!(body["phase"], "idle");
        assert_eq!(body["config"]["chunk_kwh"], 0.5);
        assert_eq!(body["quick_amounts"][3], 8.5);
    }

    #[tokio::test]
    async fn sell_rejects_amounts_beyond_storage() {
        let response = app()
            .oneshot(
                Request::post("/api/trading/sell")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"amount_kwh": 99.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("storage"));
    }

    #[tokio::test]
    async fn sell_then_snapshot_shows_the_discharge() {
        let app = app();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/trading/sell")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"amount_kwh": 2.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["phase"], "discharging");
        assert_eq!(body["order"]["amount_kwh"], 2.0);

        let second = app
            .oneshot(
                Request::post("/api/trading/sell")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"amount_kwh": 1.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn refresh_price_conflicts_while_auto_trading() {
        let app = app();

        let started = app
            .clone()
            .oneshot(
                Request::post("/api/trading/auto/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(started.status(), StatusCode::OK);

        let refused = app
            .oneshot(
                Request::post("/api/trading/price/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(refused.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn config_update_normalizes_and_rebuilds_the_ladder() {
        let response = app()
            .oneshot(
                Request::post("/api/trading/config")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"baseline": 0.2, "step_pct": 0.01, "chunk_kwh": 0.5,
                            "upper": 0.12, "lower": 0.3, "cooldown_sec": 0,
                            "simulate_price": true}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        // floors applied, inverted bounds swapped
        assert_eq!(body["config"]["step_pct"], 0.1);
        assert_eq!(body["config"]["cooldown_sec"], 1);
        assert_eq!(body["config"]["lower"], 0.12);
        assert_eq!(body["config"]["upper"], 0.3);
    }

    #[tokio::test]
    async fn forecast_returns_partitioned_series_and_stats() {
        let response = app()
            .oneshot(
                Request::get("/api/forecast?region=VIC&interval=1d")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["region"], "VIC");
        assert_eq!(body["sub_region"], "Melbourne CBD");
        assert_eq!(body["interval"], "1d");
        assert_eq!(body["actual"].as_array().unwrap().len(), 240);
        assert_eq!(body["forecast"].as_array().unwrap().len(), 48);
        assert!(body["recommendation"].as_str().unwrap().contains("average"));
    }

    #[tokio::test]
    async fn forecast_falls_back_on_unknown_selectors() {
        let response = app()
            .oneshot(
                Request::get("/api/forecast?region=ZZ&interval=2h")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["region"], "NSW");
        assert_eq!(body["interval"], "1h");
    }

    #[tokio::test]
    async fn crosshair_reads_both_series() {
        let now_sec = runtime::now_ms() / 1_000;
        let uri = format!("/api/forecast/crosshair?region=NSW&ts={now_sec}");

        let response = app()
            .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["actual"].is_number());
        assert!(body["forecast"].is_number());
    }

    #[tokio::test]
    async fn history_returns_the_seeded_trades() {
        let response = app()
            .oneshot(
                Request::get("/api/trading/history?range=all&amount_min=3.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        let trades = body["trades"].as_array().unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0]["amount_kwh"], 3.5);
    }

    #[tokio::test]
    async fn earnings_regenerate_for_the_requested_range() {
        let response = app()
            .oneshot(
                Request::get("/api/trading/earnings?range=1y")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        let buckets = body["buckets"].as_array().unwrap();
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0]["label"], "Jan");
    }

    #[tokio::test]
    async fn regions_catalogue_is_complete() {
        let response = app()
            .oneshot(Request::get("/api/regions").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        let regions = body["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 8);
        assert_eq!(regions[0]["name"], "NSW");
        assert!(!regions[0]["sub_regions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn estimate_previews_revenue_at_the_current_price() {
        let response = app()
            .oneshot(
                Request::get("/api/trading/estimate?amount_kwh=2.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["revenue"], 0.48);
    }
}
