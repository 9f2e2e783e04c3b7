use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::allocation::plan::{plan_allocation, rank_barangays, rank_residents};
use crate::allocation::{AllocationPlan, RankLevel, Ranked};
use crate::config::Config;
use crate::population::aggregator::PopulationAggregator;
use crate::population::grouping::aggregate_by_barangay;
use crate::population::BarangayAggregate;
use crate::residents::loader::filter_by_barangay;
use crate::residents::ResidentRecord;
use crate::scoring::model::{ScoreModel, ScoreWeights, WeightsUpdate};
use crate::scoring::scorer::ResidentScorer;
use crate::scoring::ScoredResident;

/// Scoring takes the read lock; weight updates take the write lock.
#[derive(Clone)]
pub struct ApiState {
    config: Config,
    model: Arc<RwLock<ScoreModel>>,
}

impl ApiState {
    pub fn new(config: Config, model: ScoreModel) -> Self {
        Self {
            config,
            model: Arc::new(RwLock::new(model)),
        }
    }

    fn snapshot_model(&self) -> std::result::Result<ScoreModel, ApiError> {
        self.model
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| ApiError::internal("score model lock poisoned"))
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize, Default)]
struct ResidentsRequest {
    #[serde(default)]
    residents: Vec<ResidentRecord>,
    barangay: Option<String>,
}

impl ResidentsRequest {
    fn selected(self) -> Vec<ResidentRecord> {
        match &self.barangay {
            Some(barangay) => filter_by_barangay(self.residents, barangay),
            None => self.residents,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RankRequest {
    #[serde(flatten)]
    population: ResidentsRequest,
    level: Option<RankLevel>,
    limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct AllocateRequest {
    #[serde(flatten)]
    population: ResidentsRequest,
    level: Option<RankLevel>,
    top: Option<usize>,
    resources: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ResidentsResponse {
    residents: Vec<ScoredResident>,
}

#[derive(Debug, Serialize)]
struct BarangaysResponse {
    barangays: Vec<BarangayAggregate>,
}

#[derive(Debug, Serialize)]
struct RankResponse {
    level: RankLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    residents: Option<Vec<Ranked<ScoredResident>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    barangays: Option<Vec<Ranked<BarangayAggregate>>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeightsResponse {
    weights: ScoreWeights,
    sum: f64,
    consistent: bool,
}

impl From<ScoreWeights> for WeightsResponse {
    fn from(weights: ScoreWeights) -> Self {
        Self {
            sum: weights.sum(),
            consistent: weights.validate().is_ok(),
            weights,
        }
    }
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/weights", get(show_weights).patch(update_weights))
        .route("/v1/score", post(score_one))
        .route("/v1/residents/score", post(score_residents))
        .route("/v1/barangays/aggregate", post(aggregate_batch))
        .route("/v1/barangays", post(aggregate_barangays))
        .route("/v1/rank", post(rank_entities))
        .route("/v1/allocate", post(allocate_resources))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, model: ScoreModel, bind: SocketAddr) -> Result<()> {
    let app = router(ApiState::new(config, model));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn show_weights(State(state): State<ApiState>) -> ApiResult<WeightsResponse> {
    let model = state.snapshot_model()?;
    Ok(ok(model.get_weights().into()))
}

async fn update_weights(
    State(state): State<ApiState>,
    Json(update): Json<WeightsUpdate>,
) -> ApiResult<WeightsResponse> {
    if update.is_empty() {
        return Err(ApiError::bad_request("no weight keys supplied"));
    }
    let mut guard = state
        .model
        .write()
        .map_err(|_| ApiError::internal("score model lock poisoned"))?;

    if state.config.scoring.strict_weights {
        let mut candidate = guard.get_weights();
        candidate.merge(&update);
        if let Err(err) = candidate.validate() {
            warn!("rejected weight update: {err}");
            return Err(ApiError::bad_request(err.to_string()));
        }
    }

    let weights = guard.update_weights(&update);
    Ok(ok(weights.into()))
}

async fn score_one(
    State(state): State<ApiState>,
    Json(resident): Json<ResidentRecord>,
) -> ApiResult<ScoredResident> {
    let model = state.snapshot_model()?;
    Ok(ok(ResidentScorer::new(&model).score_named(&resident)))
}

async fn score_residents(
    State(state): State<ApiState>,
    Json(request): Json<ResidentsRequest>,
) -> ApiResult<ResidentsResponse> {
    let model = state.snapshot_model()?;
    let residents = request.selected();
    Ok(ok(ResidentsResponse {
        residents: ResidentScorer::new(&model).score_all(&residents),
    }))
}

async fn aggregate_batch(
    State(state): State<ApiState>,
    Json(request): Json<ResidentsRequest>,
) -> ApiResult<BarangayAggregate> {
    let model = state.snapshot_model()?;
    let name = request.barangay.clone();
    let residents = request.selected();
    let aggregator = PopulationAggregator::new(ResidentScorer::new(&model));
    let aggregate = match name {
        Some(name) => aggregator.aggregate_named(name, &residents),
        None => aggregator.aggregate(&residents),
    };
    Ok(ok(aggregate))
}

async fn aggregate_barangays(
    State(state): State<ApiState>,
    Json(request): Json<ResidentsRequest>,
) -> ApiResult<BarangaysResponse> {
    let model = state.snapshot_model()?;
    let residents = request.selected();
    let aggregator = PopulationAggregator::new(ResidentScorer::new(&model));
    Ok(ok(BarangaysResponse {
        barangays: aggregate_by_barangay(&aggregator, &residents),
    }))
}

async fn rank_entities(
    State(state): State<ApiState>,
    Json(request): Json<RankRequest>,
) -> ApiResult<RankResponse> {
    let model = state.snapshot_model()?;
    let level = request.level.unwrap_or_default();
    let limit = request.limit.unwrap_or(state.config.ranking.default_limit);
    let residents = request.population.selected();

    let response = match level {
        RankLevel::Resident => RankResponse {
            level,
            residents: Some(rank_residents(&model, &residents, limit)),
            barangays: None,
        },
        RankLevel::Barangay => RankResponse {
            level,
            residents: None,
            barangays: Some(rank_barangays(&model, &residents, limit)),
        },
    };
    Ok(ok(response))
}

async fn allocate_resources(
    State(state): State<ApiState>,
    Json(request): Json<AllocateRequest>,
) -> ApiResult<AllocationPlan> {
    let model = state.snapshot_model()?;
    let resources = request
        .resources
        .unwrap_or_else(|| state.config.allocation.resources.clone());
    if resources.is_empty() {
        return Err(ApiError::bad_request(
            "no resources supplied and none configured",
        ));
    }
    let level = request.level.unwrap_or_default();
    let residents = request.population.selected();

    let plan = plan_allocation(&model, &residents, level, request.top, &resources)
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    Ok(ok(plan))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::population::recommendations::NO_RESIDENT_DATA;

    fn state() -> ApiState {
        ApiState::new(Config::default(), ScoreModel::default())
    }

    fn population() -> Vec<ResidentRecord> {
        serde_json::from_value(json!([
            {"name": "Ana", "barangay": "San Roque", "evacueeHistory": 12, "monthlyIncome": 0,
             "familyMembers": 9, "houseMaterial": "Nipa", "terrain": "Coastal"},
            {"name": "Ben", "barangay": "Poblacion", "evacueeHistory": 0, "monthlyIncome": 45000,
             "familyMembers": 2, "houseMaterial": "Concrete", "terrain": "Urban"}
        ]))
        .expect("residents parse")
    }

    #[tokio::test]
    async fn scores_single_resident() {
        let resident: ResidentRecord =
            serde_json::from_value(json!({"name": "Ana", "evacueeHistory": 11})).expect("parses");
        let Json(body) = score_one(State(state()), Json(resident))
            .await
            .expect("scores");
        assert!(body.ok);
        assert_eq!(body.data.result.breakdown.evacuation, 100.0);
    }

    fn batch(barangay: Option<&str>) -> ResidentsRequest {
        ResidentsRequest {
            residents: population(),
            barangay: barangay.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn scores_batch_and_filters_by_barangay() {
        let Json(all) = score_residents(State(state()), Json(batch(None)))
            .await
            .expect("scores");
        assert_eq!(all.data.residents.len(), 2);
        assert_eq!(all.data.residents[0].name.as_deref(), Some("Ana"));
        assert_eq!(all.data.residents[1].name.as_deref(), Some("Ben"));

        let Json(filtered) = score_residents(State(state()), Json(batch(Some("poblacion"))))
            .await
            .expect("scores");
        assert_eq!(filtered.data.residents.len(), 1);
        assert_eq!(filtered.data.residents[0].name.as_deref(), Some("Ben"));
    }

    #[tokio::test]
    async fn named_batch_aggregate_keeps_only_that_barangay() {
        let Json(body) = aggregate_batch(State(state()), Json(batch(Some("San Roque"))))
            .await
            .expect("aggregates");
        let aggregate = body.data;
        assert_eq!(aggregate.barangay.as_deref(), Some("San Roque"));
        assert_eq!(aggregate.total_residents, 1);
        assert_eq!(aggregate.resident_scores.len(), 1);
        assert_eq!(aggregate.resident_scores[0].total_score, 100.0);
        assert_eq!(aggregate.high_priority_count, 1);
    }

    #[tokio::test]
    async fn empty_batch_aggregate_is_zeroed() {
        let Json(body) = aggregate_batch(State(state()), Json(ResidentsRequest::default()))
            .await
            .expect("aggregates");
        let aggregate = body.data;
        assert!(aggregate.barangay.is_none());
        assert_eq!(aggregate.total_residents, 0);
        assert_eq!(aggregate.average_score, 0.0);
        assert_eq!(aggregate.vulnerability_index, 0.0);
        assert_eq!(
            aggregate.recommendations,
            vec![NO_RESIDENT_DATA.to_string()]
        );
    }

    #[tokio::test]
    async fn groups_population_by_barangay() {
        let Json(body) = aggregate_barangays(State(state()), Json(batch(None)))
            .await
            .expect("aggregates");
        let names: Vec<_> = body
            .data
            .barangays
            .iter()
            .map(|b| b.barangay.as_deref())
            .collect();
        assert_eq!(names, vec![Some("San Roque"), Some("Poblacion")]);
        assert!(body.data.barangays.iter().all(|b| b.total_residents == 1));
    }

    #[tokio::test]
    async fn top_of_zero_is_a_bad_request() {
        let request = AllocateRequest {
            population: batch(None),
            top: Some(0),
            resources: Some([("rice".to_string(), 10)].into_iter().collect()),
            ..AllocateRequest::default()
        };
        let err = allocate_resources(State(state()), Json(request))
            .await
            .expect_err("nothing selected");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("at least one recipient"));
    }

    #[tokio::test]
    async fn weight_updates_are_visible_to_later_requests() {
        let state = state();
        let update = WeightsUpdate {
            terrain: Some(0.2),
            ..WeightsUpdate::default()
        };
        let Json(updated) = update_weights(State(state.clone()), Json(update))
            .await
            .expect("updates");
        assert!(!updated.data.consistent);

        let Json(shown) = show_weights(State(state)).await.expect("reads");
        assert_eq!(shown.data.weights.terrain, 0.2);
    }

    #[tokio::test]
    async fn strict_config_rejects_inconsistent_weights() {
        let mut config = Config::default();
        config.scoring.strict_weights = true;
        let state = ApiState::new(config, ScoreModel::default());
        let update = WeightsUpdate {
            terrain: Some(0.5),
            ..WeightsUpdate::default()
        };
        let err = update_weights(State(state.clone()), Json(update))
            .await
            .expect_err("rejected");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let Json(shown) = show_weights(State(state)).await.expect("reads");
        assert_eq!(shown.data.weights, ScoreWeights::default());
    }

    #[test]
    fn ranks_barangays_by_default() {
        let request = RankRequest {
            population: ResidentsRequest {
                residents: population(),
                barangay: None,
            },
            ..RankRequest::default()
        };
        let Json(body) = tokio_test::block_on(rank_entities(State(state()), Json(request)))
            .expect("ranks");
        let barangays = body.data.barangays.expect("barangay ranking");
        assert_eq!(barangays[0].rank, 1);
        assert_eq!(barangays[0].item.barangay.as_deref(), Some("San Roque"));
        assert!(body.data.residents.is_none());
    }

    #[tokio::test]
    async fn allocation_without_resources_is_a_bad_request() {
        let request = AllocateRequest {
            population: ResidentsRequest {
                residents: population(),
                barangay: None,
            },
            ..AllocateRequest::default()
        };
        let err = allocate_resources(State(state()), Json(request))
            .await
            .expect_err("no pool");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn allocates_configured_pool_across_residents() {
        let mut config = Config::default();
        config
            .allocation
            .resources
            .insert("rice".to_string(), 100);
        let state = ApiState::new(config, ScoreModel::default());
        let request = AllocateRequest {
            population: ResidentsRequest {
                residents: population(),
                barangay: None,
            },
            level: Some(RankLevel::Resident),
            ..AllocateRequest::default()
        };
        let Json(body) = allocate_resources(State(state), Json(request))
            .await
            .expect("allocates");
        let plan = body.data;
        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0].name, "Ana");
        let given: u64 = plan.entries.iter().map(|e| e.allocation["rice"]).sum();
        assert!(given <= 100);
        assert_eq!(given + plan.undistributed["rice"], 100);
    }

    #[tokio::test]
    async fn zero_score_population_is_a_bad_request() {
        let request = AllocateRequest {
            resources: Some([("rice".to_string(), 10)].into_iter().collect()),
            ..AllocateRequest::default()
        };
        let err = allocate_resources(State(state()), Json(request))
            .await
            .expect_err("empty population");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
