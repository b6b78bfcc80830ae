// Axum API server
//
// JSON endpoints for the matchmaker, the plant library, the garden builder
// zones and the user's garden list. Catalog reads go through a
// `CatalogSource` on the blocking pool; zone and garden state live in memory
// for the lifetime of the process.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::catalog::{
    load_catalog, Catalog, CatalogError, CatalogSource, InMemoryCatalog, ParseConditionError, SizeBand, Soil,
    Sun, Water,
};
use crate::config::ServerConfig;
use crate::garden_list::{GardenList, GardenListError, ListKind};
use crate::layout::{AddOutcome, Garden, GardenZoneState, OverflowPolicy};
use crate::library::alphabetical_index;
use crate::matching::{MatchSession, MatchState, SiteConditions, ZoneConditions};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub garden: Arc<RwLock<Garden>>,
    pub garden_list: Arc<RwLock<GardenList>>,
}

impl AppState {
    /// Load the catalog file once and start with an empty garden.
    pub async fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading plant catalog...");
        let path = config.catalog_path.clone();
        let catalog = tokio::task::spawn_blocking(move || load_catalog(&path)).await??;
        tracing::info!("Catalog ready: {} plants", catalog.len());

        Ok(Self::from_source(
            Arc::new(InMemoryCatalog::new(catalog)),
            config.overflow_policy,
        ))
    }

    pub fn from_source(catalog: Arc<dyn CatalogSource>, policy: OverflowPolicy) -> Self {
        Self {
            catalog,
            garden: Arc::new(RwLock::new(Garden::new(policy))),
            garden_list: Arc::new(RwLock::new(GardenList::new())),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))

        // Plant endpoints
        // match and library must come before :id
        .route("/api/plants/match", get(match_plants))
        .route("/api/plants/library", get(plant_library))
        .route("/api/plants/:id", get(get_plant))

        // Garden builder zones
        .route("/api/zones", get(list_zones))
        .route("/api/zones/:zone_id", get(get_zone).delete(reset_zone))
        .route("/api/zones/:zone_id/conditions", put(update_zone_conditions))
        .route("/api/zones/:zone_id/library", get(zone_library))
        .route("/api/zones/:zone_id/plants", post(add_zone_plant))
        .route("/api/zones/:zone_id/plants/:instance_id", delete(remove_zone_plant))

        // My garden
        .route("/api/garden", get(list_garden).post(add_to_garden))
        .route("/api/garden/:plant_id", delete(remove_from_garden))
        .route("/api/garden/:plant_id/promote", post(promote_garden_plant))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Catalog access
// ============================================================================

/// Run a catalog call on the blocking pool (file sources do disk I/O).
async fn with_catalog<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&dyn CatalogSource) -> T + Send + 'static,
    T: Send + 'static,
{
    let source = Arc::clone(&state.catalog);
    tokio::task::spawn_blocking(move || f(source.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("Catalog task failed: {}", e)))
}

async fn snapshot(state: &AppState) -> Result<Arc<Catalog>, AppError> {
    Ok(with_catalog(state, |source| source.snapshot()).await??)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub sun: Option<String>,
    pub soil: Option<String>,
    pub water: Option<String>,
    pub size: Option<String>,
}

fn required<T>(value: Option<&str>, name: &str) -> Result<T, AppError>
where
    T: FromStr<Err = ParseConditionError>,
{
    let value = value.ok_or_else(|| AppError::BadRequest(format!("Missing query parameter '{}'", name)))?;
    value.parse().map_err(|e: ParseConditionError| AppError::BadRequest(e.to_string()))
}

impl MatchQuery {
    fn conditions(&self) -> Result<SiteConditions, AppError> {
        Ok(SiteConditions {
            sun: required::<Sun>(self.sun.as_deref(), "sun")?,
            soil: required::<Soil>(self.soil.as_deref(), "soil")?,
            water: required::<Water>(self.water.as_deref(), "water")?,
            size: required::<SizeBand>(self.size.as_deref(), "size")?,
        })
    }
}

async fn match_plants(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let conditions = query.conditions()?;
    tracing::debug!("Matching plants for {:?}", conditions);

    let outcome = with_catalog(&state, move |source| {
        let mut session = MatchSession::new(conditions);
        session.refresh(source, conditions);
        session.into_state()
    })
    .await?;

    match outcome {
        MatchState::Ready { conditions, plants } => Ok(Json(serde_json::json!({
            "rows": plants.len(),
            "conditions": conditions,
            "data": plants,
        }))),
        MatchState::Failed { message, retryable, .. } => Err(AppError::CatalogUnavailable { message, retryable }),
        MatchState::Idle | MatchState::Loading { .. } => {
            Err(AppError::Internal("Match fetch did not complete".to_string()))
        }
    }
}

async fn plant_library(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = snapshot(&state).await?;
    let index = alphabetical_index(catalog.plants());

    Ok(Json(serde_json::json!({
        "letters": index.len(),
        "data": index,
    })))
}

async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = snapshot(&state).await?;
    let plant = catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Plant {} not found", id)))?;
    Ok(Json(serde_json::json!(plant)))
}

// ----------------------------------------------------------------------------
// Zones
// ----------------------------------------------------------------------------

fn zone_not_found(zone_id: u8) -> AppError {
    AppError::NotFound(format!("Zone {} not found", zone_id))
}

fn zone_json(zone: &GardenZoneState, policy: OverflowPolicy) -> serde_json::Value {
    serde_json::json!({
        "id": zone.id,
        "conditions": zone.conditions,
        "status": zone.status(),
        "placed": zone.len(),
        "layout": zone.layout(policy),
    })
}

async fn list_zones(State(state): State<AppState>) -> Json<serde_json::Value> {
    let garden = state.garden.read().await;
    Json(serde_json::json!({
        "policy": garden.policy(),
        "data": garden.summaries(),
    }))
}

async fn get_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<u8>,
) -> Result<Json<serde_json::Value>, AppError> {
    let garden = state.garden.read().await;
    let zone = garden.zone(zone_id).ok_or_else(|| zone_not_found(zone_id))?;
    Ok(Json(zone_json(zone, garden.policy())))
}

async fn update_zone_conditions(
    State(state): State<AppState>,
    Path(zone_id): Path<u8>,
    Json(conditions): Json<ZoneConditions>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut garden = state.garden.write().await;
    if !garden.update_conditions(zone_id, conditions) {
        return Err(zone_not_found(zone_id));
    }
    tracing::info!("Zone {} conditions set to {:?}", zone_id, conditions);

    let policy = garden.policy();
    let zone = garden.zone(zone_id).ok_or_else(|| zone_not_found(zone_id))?;
    Ok(Json(zone_json(zone, policy)))
}

async fn zone_library(
    State(state): State<AppState>,
    Path(zone_id): Path<u8>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = snapshot(&state).await?;
    let garden = state.garden.read().await;
    let plants = garden
        .zone_library(catalog.plants(), zone_id)
        .ok_or_else(|| zone_not_found(zone_id))?;

    Ok(Json(serde_json::json!({
        "rows": plants.len(),
        "data": plants,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AddZonePlantRequest {
    pub plant_id: String,
}

async fn add_zone_plant(
    State(state): State<AppState>,
    Path(zone_id): Path<u8>,
    Json(request): Json<AddZonePlantRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = snapshot(&state).await?;
    let plant = catalog
        .get(&request.plant_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Plant {} not found", request.plant_id)))?;

    let mut garden = state.garden.write().await;
    let policy = garden.policy();
    let zone = garden.zone_mut(zone_id).ok_or_else(|| zone_not_found(zone_id))?;

    // A full zone is a no-op, not an error.
    let outcome = zone.add_plant(plant);
    let instance_id = match outcome {
        AddOutcome::Added { instance_id } => Some(instance_id),
        AddOutcome::ZoneFull => None,
    };

    Ok(Json(serde_json::json!({
        "added": outcome.is_added(),
        "instance_id": instance_id,
        "zone": zone_json(zone, policy),
    })))
}

async fn remove_zone_plant(
    State(state): State<AppState>,
    Path((zone_id, instance_id)): Path<(u8, u64)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut garden = state.garden.write().await;
    let policy = garden.policy();
    let zone = garden.zone_mut(zone_id).ok_or_else(|| zone_not_found(zone_id))?;

    let removed = zone
        .remove_plant(instance_id)
        .ok_or_else(|| AppError::NotFound(format!("Zone {} has no plant {}", zone_id, instance_id)))?;

    Ok(Json(serde_json::json!({
        "removed": removed.plant.id,
        "zone": zone_json(zone, policy),
    })))
}

async fn reset_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<u8>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut garden = state.garden.write().await;
    let policy = garden.policy();
    let zone = garden.zone_mut(zone_id).ok_or_else(|| zone_not_found(zone_id))?;
    zone.reset();
    tracing::info!("Zone {} reset", zone_id);
    Ok(Json(zone_json(zone, policy)))
}

// ----------------------------------------------------------------------------
// My garden
// ----------------------------------------------------------------------------

async fn list_garden(State(state): State<AppState>) -> Json<serde_json::Value> {
    let list = state.garden_list.read().await;
    Json(serde_json::json!({
        "owned": list.owned(),
        "projects": list.projects(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddGardenRequest {
    pub plant_id: String,
    #[serde(default)]
    pub project: bool,
}

async fn add_to_garden(
    State(state): State<AppState>,
    Json(request): Json<AddGardenRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let catalog = snapshot(&state).await?;
    let plant = catalog
        .get(&request.plant_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Plant {} not found", request.plant_id)))?;

    let kind = if request.project { ListKind::Project } else { ListKind::Owned };
    let mut list = state.garden_list.write().await;
    let entry = list.add(plant, kind)?;

    Ok((StatusCode::CREATED, Json(serde_json::json!(entry))))
}

async fn remove_from_garden(
    State(state): State<AppState>,
    Path(plant_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = state.garden_list.write().await.remove(&plant_id)?;
    Ok(Json(serde_json::json!({ "removed": removed.plant.id })))
}

async fn promote_garden_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.garden_list.write().await.promote(&plant_id)?;
    Ok(Json(serde_json::json!({ "promoted": plant_id })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    CatalogUnavailable { message: String, retryable: bool },
    Internal(String),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::CatalogUnavailable {
            retryable: e.is_retryable(),
            message: e.to_string(),
        }
    }
}

impl From<GardenListError> for AppError {
    fn from(e: GardenListError) -> Self {
        match e {
            GardenListError::AlreadyInGarden(_) => AppError::Conflict(e.to_string()),
            GardenListError::NotInGarden(_) => AppError::NotFound(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, serde_json::json!({ "error": msg })),
            AppError::CatalogUnavailable { message, retryable } => {
                tracing::warn!("Catalog unavailable: {}", message);
                let status = if retryable {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, serde_json::json!({ "error": message, "retryable": retryable }))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
