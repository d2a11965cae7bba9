use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    middleware,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use pantry_shared::inventory::{ActionOutcome, Dashboard, ItemView};
use pantry_shared::lifecycle::Action;
use pantry_shared::{FoodItem, FoodItemDraft, Inventory, ItemId, Notice};
use pantry_store::Database;

use crate::auth::{self, CurrentUser};
use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }

    /// Lock the database for the duration of one operation. Never hold the
    /// guard across an `.await`.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, ServerError> {
        self.db
            .lock()
            .map_err(|e| ServerError::Internal(format!("Lock poisoned: {e}")))
    }

    /// The date all expiry rules are evaluated against.
    pub fn today(&self) -> NaiveDate {
        self.config
            .fixed_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Run `f` against the inventory service while holding the database lock.
    fn with_inventory<T>(
        &self,
        f: impl FnOnce(&Inventory<&Database>) -> pantry_shared::Result<T>,
    ) -> Result<T, ServerError> {
        let db = self.db()?;
        let inventory =
            Inventory::new(&*db).with_expiring_window(self.config.expiring_window_days);
        Ok(f(&inventory)?)
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let protected = Router::new()
        .route("/api/logout", post(auth::logout))
        .route("/api/account", delete(auth::delete_account))
        .route("/api/items", get(dashboard).post(add_item))
        .route(
            "/api/items/:id",
            get(get_item).put(edit_item).delete(delete_item),
        )
        .route("/api/items/:id/donate", post(mark_donated))
        .route("/api/items/:id/cancel-donation", post(cancel_donation))
        .route("/api/items/:id/consume", post(mark_consumed))
        .route("/api/donations", get(donation_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ServerInfoResponse {
    name: String,
    version: &'static str,
    registration_open: bool,
    expiring_window_days: i64,
    today: NaiveDate,
}

#[derive(Serialize)]
struct ItemResponse {
    item: ItemView,
    notice: Option<Notice>,
}

#[derive(Serialize)]
struct NoticeResponse {
    notice: Notice,
}

#[derive(Serialize)]
struct DonationHistoryResponse {
    items: Vec<FoodItem>,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: state.config.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        registration_open: state.config.registration_open,
        expiring_window_days: state.config.expiring_window_days,
        today: state.today(),
    })
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Dashboard>, ServerError> {
    let today = state.today();
    let dashboard = state.with_inventory(|inv| inv.dashboard(user.id, today))?;
    Ok(Json(dashboard))
}

async fn add_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<FoodItemDraft>,
) -> Result<(StatusCode, Json<ItemResponse>), ServerError> {
    let today = state.today();
    let (item, notice) = state.with_inventory(|inv| inv.add(user.id, draft, today))?;
    info!(user = %user.id, item = %item.id, name = %item.name, "Food item added");

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse {
            item: ItemView::new(item, today),
            notice: Some(notice),
        }),
    ))
}

async fn get_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<ItemView>, ServerError> {
    let item = state.with_inventory(|inv| inv.get(user.id, ItemId(id)))?;
    Ok(Json(ItemView::new(item, state.today())))
}

async fn edit_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(draft): Json<FoodItemDraft>,
) -> Result<Json<ItemResponse>, ServerError> {
    let (item, notice) = state.with_inventory(|inv| inv.edit(user.id, ItemId(id), draft))?;
    Ok(Json(ItemResponse {
        item: ItemView::new(item, state.today()),
        notice: Some(notice),
    }))
}

async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<NoticeResponse>, ServerError> {
    let notice = state.with_inventory(|inv| inv.delete(user.id, ItemId(id)))?;
    info!(user = %user.id, item = id, "Food item deleted");
    Ok(Json(NoticeResponse { notice }))
}

fn apply_action(
    state: &AppState,
    user: &CurrentUser,
    id: i64,
    action: Action,
) -> Result<Json<ActionOutcome>, ServerError> {
    let outcome = state.with_inventory(|inv| inv.apply(user.id, ItemId(id), action))?;
    Ok(Json(outcome))
}

async fn mark_donated(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<ActionOutcome>, ServerError> {
    apply_action(&state, &user, id, Action::MarkDonated)
}

async fn cancel_donation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<ActionOutcome>, ServerError> {
    apply_action(&state, &user, id, Action::CancelDonation)
}

async fn mark_consumed(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<ActionOutcome>, ServerError> {
    apply_action(&state, &user, id, Action::MarkConsumed)
}

async fn donation_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<DonationHistoryResponse>, ServerError> {
    let items = state.with_inventory(|inv| inv.donation_history(user.id))?;
    Ok(Json(DonationHistoryResponse { items }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
