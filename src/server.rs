//! Web server backing the meal-planning board.
//!
//! Exposes the calculation pipeline as a JSON REST API, a WebSocket that
//! notifies the board when the food database reloads, and static file
//! serving for the frontend.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tower_http::services::ServeDir;

use crate::assessment::{NutritionReport, build_report};
use crate::domain::Goal;
use crate::energy::TdeeFormula;
use crate::foods::FoodDatabase;
use crate::normalize::{RawAnswers, normalize};
use crate::plan::{FoodPreferences, MealPlan, build_meal_plan};
use crate::targets::{MacroTargets, split_macros};

/// Events broadcast to connected board clients.
#[derive(Clone, Debug)]
pub enum ReloadSignal {
    /// The food database was reloaded successfully.
    Reloaded,
    /// A reload attempt failed; the previous database is still in use.
    Failed(String),
}

/// Reloadable board data.
pub struct BoardData {
    pub foods: FoodDatabase,
    pub last_reload: DateTime<Utc>,
}

/// Shared application state.
pub struct AppState {
    /// Current food database, protected for concurrent reads.
    pub data: RwLock<BoardData>,
    /// Path of the food database file, when one was given.
    pub foods_path: Option<PathBuf>,
    /// The TDEE formula this deployment runs with.
    pub formula: TdeeFormula,
    /// Broadcast channel for board notifications.
    pub reload_tx: broadcast::Sender<ReloadSignal>,
}

// === Request/response types ===

#[derive(Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub answers: RawAnswers,
    #[serde(default)]
    pub preferences: Option<FoodPreferences>,
}

#[derive(Deserialize)]
pub struct PlanRequest {
    pub target_calories: i32,
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub preferences: Option<FoodPreferences>,
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub target_calories: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macros: Option<MacroTargets>,
    pub plan: MealPlan,
}

// === Router setup ===

/// Creates the application router.
pub fn create_router(state: Arc<AppState>, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/assessment", post(post_assessment))
        .route("/api/plan", post(post_plan))
        .route("/api/foods", get(get_foods))
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .with_state(state)
}

/// Runs the web server.
pub async fn run_server(
    state: Arc<AppState>,
    port: u16,
    static_dir: PathBuf,
) -> anyhow::Result<()> {
    let app = create_router(state, static_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    println!("Server running at http://localhost:{port}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// === API handlers ===

/// POST /api/assessment - run the full pipeline over raw answers.
///
/// Malformed answers never fail the request: the normalizer substitutes
/// the documented defaults, mirroring the conversational intake.
async fn post_assessment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssessmentRequest>,
) -> Json<NutritionReport> {
    let profile = normalize(&request.answers);

    let data = state.data.read().await;
    let mut rng = StdRng::from_entropy();
    let report = build_report(
        profile,
        state.formula,
        request.preferences.as_ref(),
        &data.foods,
        &mut rng,
    );

    Json(report)
}

/// POST /api/plan - build a meal plan for an explicit calorie target.
async fn post_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Json<PlanResponse> {
    let data = state.data.read().await;
    let mut rng = StdRng::from_entropy();

    let plan = build_meal_plan(
        request.target_calories,
        request.preferences.as_ref(),
        &data.foods,
        &mut rng,
    );
    let macros = request
        .goal
        .map(|goal| split_macros(request.target_calories, goal));

    Json(PlanResponse {
        target_calories: request.target_calories,
        macros,
        plan,
    })
}

/// GET /api/foods - the current food database.
async fn get_foods(State(state): State<Arc<AppState>>) -> Json<FoodDatabase> {
    let data = state.data.read().await;
    Json(data.foods.clone())
}

// === WebSocket handler ===

/// WebSocket upgrade handler for board notifications.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws_connection(socket, state))
}

/// Forwards reload signals to one board client until it disconnects.
async fn handle_ws_connection(mut socket: WebSocket, state: Arc<AppState>) {
    log::info!("Board client connected");

    let mut rx = state.reload_tx.subscribe();

    loop {
        tokio::select! {
            signal = rx.recv() => {
                let text = match signal {
                    Ok(ReloadSignal::Reloaded) => "reload".to_string(),
                    Ok(ReloadSignal::Failed(err)) => format!("error:{err}"),
                    // Missed signals collapse into a single reload.
                    Err(broadcast::error::RecvError::Lagged(_)) => "reload".to_string(),
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    log::info!("Board client disconnected");
}
