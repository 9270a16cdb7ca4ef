use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use grid_sim::{
    crosshair, forecast_bars, partition, recommendation, selection_seed, series_stats, sub_regions,
    AutoTradeConfig, DemoRng, Interval, SeriesPoint, FUTURE_BARS, PAST_BARS, REGIONS,
};
use runtime::{now_ms, ControlError, EngineSnapshot, RuntimeEvent};
use trading::{EarningsBucket, SellError, TradeRecord};

use crate::state::{
    AppState, ConfigPayload, CrosshairQuery, EarningsQuery, ForecastQuery, HistoryQuery,
    SellRequest,
};
use crate::ws;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/dashboard", get(dashboard_page))
        .route("/trading", get(trading_page))
        .route("/styles.css", get(stylesheet))
        .route("/dashboard.js", get(dashboard_script))
        .route("/trading.js", get(trading_script))
        .route("/api/regions", get(regions))
        .route("/api/forecast", get(forecast))
        .route("/api/forecast/crosshair", get(forecast_crosshair))
        .route("/api/trading/snapshot", get(snapshot))
        .route("/api/trading/estimate", get(estimate))
        .route("/api/trading/sell", post(sell))
        .route("/api/trading/cancel", post(cancel))
        .route("/api/trading/auto/start", post(auto_start))
        .route("/api/trading/auto/stop", post(auto_stop))
        .route("/api/trading/grid/reset", post(grid_reset))
        .route("/api/trading/price/refresh", post(refresh_price))
        .route("/api/trading/config", post(update_config))
        .route("/api/trading/history", get(history))
        .route("/api/trading/earnings", get(earnings))
        .route("/api/trading/power", get(power))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

async fn landing_page() -> Html<&'static str> {
    Html(ui::landing_page())
}

async fn dashboard_page() -> Html<&'static str> {
    Html(ui::dashboard_page())
}

async fn trading_page() -> Html<&'static str> {
    Html(ui::trading_page())
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], ui::stylesheet())
}

async fn dashboard_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        ui::dashboard_script(),
    )
}

async fn trading_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        ui::trading_script(),
    )
}

#[derive(Debug, Serialize)]
struct RegionEntry {
    name: &'static str,
    sub_regions: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct RegionsResponse {
    regions: Vec<RegionEntry>,
}

async fn regions() -> Json<RegionsResponse> {
    let regions = REGIONS
        .iter()
        .map(|name| RegionEntry {
            name,
            sub_regions: sub_regions(name),
        })
        .collect();
    Json(RegionsResponse { regions })
}

#[derive(Debug, Serialize)]
struct PointDto {
    ts: u64,
    value: f64,
}

impl From<SeriesPoint> for PointDto {
    fn from(point: SeriesPoint) -> Self {
        Self {
            ts: point.ts,
            value: point.value,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatsDto {
    current: f64,
    average: f64,
    peak: f64,
    low: f64,
}

#[derive(Debug, Serialize)]
struct ForecastResponse {
    region: &'static str,
    sub_region: &'static str,
    interval: &'static str,
    actual: Vec<PointDto>,
    forecast: Vec<PointDto>,
    stats: StatsDto,
    recommendation: &'static str,
}

struct ForecastSelection {
    region: &'static str,
    sub_region: &'static str,
    interval: Interval,
}

/// Resolves the selectors the way the region dropdowns do: an unknown
/// region falls back to the first catalogue entry, a mismatched sub-region
/// to the region's first entry, an unknown interval to the default.
fn resolve_selection(query: &ForecastQuery) -> ForecastSelection {
    let region = query
        .region
        .as_deref()
        .and_then(|requested| REGIONS.iter().find(|region| **region == requested))
        .copied()
        .unwrap_or(REGIONS[0]);
    let sub_region = grid_sim::resolve_sub_region(region, query.sub_region.as_deref().unwrap_or(""))
        .unwrap_or("");
    let interval = query
        .interval
        .as_deref()
        .and_then(Interval::parse)
        .unwrap_or_default();

    ForecastSelection {
        region,
        sub_region,
        interval,
    }
}

fn generate_series(
    selection: &ForecastSelection,
    now_sec: u64,
) -> (Vec<SeriesPoint>, Vec<SeriesPoint>) {
    let mut rng = DemoRng::new(selection_seed(
        selection.region,
        selection.sub_region,
        selection.interval,
    ));
    let bars = forecast_bars(
        selection.region,
        selection.sub_region,
        selection.interval,
        PAST_BARS,
        FUTURE_BARS,
        now_sec,
        &mut rng,
    );
    partition(&bars, now_sec)
}

async fn forecast(Query(query): Query<ForecastQuery>) -> Json<ForecastResponse> {
    let selection = resolve_selection(&query);
    let now_sec = now_ms() / 1_000;
    let (actual, forecast) = generate_series(&selection, now_sec);
    let stats = series_stats(&actual);

    Json(ForecastResponse {
        region: selection.region,
        sub_region: selection.sub_region,
        interval: selection.interval.as_str(),
        actual: actual.into_iter().map(PointDto::from).collect(),
        forecast: forecast.into_iter().map(PointDto::from).collect(),
        stats: StatsDto {
            current: stats.current,
            average: stats.average,
            peak: stats.peak,
            low: stats.low,
        },
        recommendation: recommendation(&stats),
    })
}

#[derive(Debug, Serialize)]
struct CrosshairResponse {
    ts: u64,
    actual: Option<f64>,
    forecast: Option<f64>,
}

async fn forecast_crosshair(Query(query): Query<CrosshairQuery>) -> Json<CrosshairResponse> {
    let selection = resolve_selection(&query.selection());
    let now_sec = now_ms() / 1_000;
    let (actual, forecast) = generate_series(&selection, now_sec);
    let reading = crosshair(&actual, &forecast, query.ts);

    Json(CrosshairResponse {
        ts: query.ts,
        actual: reading.actual,
        forecast: reading.forecast,
    })
}

#[derive(Debug, Serialize)]
struct SnapshotResponse {
    #[serde(flatten)]
    snapshot: EngineSnapshot,
    config: ConfigPayload,
    quick_amounts: [f64; 4],
}

fn snapshot_response(state: &AppState) -> SnapshotResponse {
    state.handle().with_engine(|engine| SnapshotResponse {
        snapshot: engine.snapshot(now_ms()),
        config: ConfigPayload::from(engine.config()),
        quick_amounts: [
            engine.quick_amount(0.25),
            engine.quick_amount(0.5),
            engine.quick_amount(0.75),
            engine.quick_amount(1.0),
        ],
    })
}

async fn snapshot(State(state): State<AppState>) -> Json<SnapshotResponse> {
    Json(snapshot_response(&state))
}

#[derive(Debug, Serialize)]
struct EstimateResponse {
    amount_kwh: f64,
    revenue: f64,
}

#[derive(Debug, serde::Deserialize)]
struct EstimateQuery {
    amount_kwh: f64,
}

async fn estimate(
    State(state): State<AppState>,
    Query(query): Query<EstimateQuery>,
) -> Json<EstimateResponse> {
    let revenue = state
        .handle()
        .with_engine(|engine| engine.estimated_revenue(query.amount_kwh));
    Json(EstimateResponse {
        amount_kwh: query.amount_kwh,
        revenue,
    })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

fn sell_error_response(error: SellError) -> (StatusCode, Json<ErrorBody>) {
    let status = match error {
        SellError::DischargeInProgress => StatusCode::CONFLICT,
        SellError::NonPositiveAmount
        | SellError::ExceedsStorage
        | SellError::InvalidDischargePower => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (
        status,
        Json(ErrorBody {
            error: error.as_str(),
        }),
    )
}

fn control_error_response(error: ControlError) -> (StatusCode, Json<ErrorBody>) {
    let status = match error {
        ControlError::LadderEmpty => StatusCode::UNPROCESSABLE_ENTITY,
        ControlError::AutoTradingActive => StatusCode::CONFLICT,
    };
    (
        status,
        Json(ErrorBody {
            error: error.as_str(),
        }),
    )
}

fn publish_and_snapshot(state: &AppState, events: Vec<RuntimeEvent>) -> Json<SnapshotResponse> {
    state.handle().publish(events);
    Json(snapshot_response(state))
}

async fn sell(
    State(state): State<AppState>,
    Json(request): Json<SellRequest>,
) -> Result<Json<SnapshotResponse>, (StatusCode, Json<ErrorBody>)> {
    let events = state
        .handle()
        .with_engine(|engine| engine.manual_sell(request.amount_kwh, now_ms()))
        .map_err(sell_error_response)?;
    Ok(publish_and_snapshot(&state, events))
}

async fn cancel(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let events = state
        .handle()
        .with_engine(|engine| engine.cancel_discharge(now_ms()));
    publish_and_snapshot(&state, events)
}

async fn auto_start(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>, (StatusCode, Json<ErrorBody>)> {
    let events = state
        .handle()
        .with_engine(|engine| engine.start_auto())
        .map_err(control_error_response)?;
    Ok(publish_and_snapshot(&state, events))
}

async fn auto_stop(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let events = state.handle().with_engine(|engine| engine.stop_auto());
    publish_and_snapshot(&state, events)
}

async fn grid_reset(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let events = state.handle().with_engine(|engine| engine.reset_grid());
    publish_and_snapshot(&state, events)
}

async fn refresh_price(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>, (StatusCode, Json<ErrorBody>)> {
    let events = state
        .handle()
        .with_engine(|engine| engine.refresh_price())
        .map_err(control_error_response)?;
    Ok(publish_and_snapshot(&state, events))
}

async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<ConfigPayload>,
) -> Json<SnapshotResponse> {
    state
        .handle()
        .with_engine(|engine| engine.set_config(AutoTradeConfig::from(payload)));
    Json(snapshot_response(&state))
}

#[derive(Debug, Serialize)]
struct TradeDto {
    ts_ms: u64,
    amount_kwh: f64,
    price: f64,
    revenue: f64,
}

impl From<TradeRecord> for TradeDto {
    fn from(record: TradeRecord) -> Self {
        Self {
            ts_ms: record.ts_ms,
            amount_kwh: record.amount_kwh,
            price: record.price,
            revenue: record.revenue,
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    trades: Vec<TradeDto>,
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let filter = query.to_filter();
    let trades = state
        .handle()
        .with_engine(|engine| engine.history(&filter, now_ms()));
    Json(HistoryResponse {
        trades: trades.into_iter().map(TradeDto::from).collect(),
    })
}

#[derive(Debug, Serialize)]
struct BucketDto {
    label: String,
    earnings: f64,
}

impl From<&EarningsBucket> for BucketDto {
    fn from(bucket: &EarningsBucket) -> Self {
        Self {
            label: bucket.label.clone(),
            earnings: bucket.earnings,
        }
    }
}

#[derive(Debug, Serialize)]
struct EarningsResponse {
    buckets: Vec<BucketDto>,
}

async fn earnings(
    State(state): State<AppState>,
    Query(query): Query<EarningsQuery>,
) -> Json<EarningsResponse> {
    let range = query.range();
    let (start, end) = query.dates();
    let buckets = state.handle().with_engine(|engine| {
        engine
            .set_earnings_range(range, start, end, now_ms())
            .iter()
            .map(BucketDto::from)
            .collect()
    });
    Json(EarningsResponse { buckets })
}

#[derive(Debug, Serialize)]
struct PowerResponse {
    samples: Vec<runtime::PowerSample>,
}

async fn power(State(state): State<AppState>) -> Json<PowerResponse> {
    let samples = state
        .handle()
        .with_engine(|engine| engine.power_history().samples().to_vec());
    Json(PowerResponse { samples })
}
