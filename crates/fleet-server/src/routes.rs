//! HTTP routes — a thin JSON shim over [`FleetService`].
//!
//! Every handler deserializes the request, calls one service operation,
//! and renders the result; no fleet logic lives here.  Error bodies follow
//! the protocol's flat `{"error": "..."}` shape: missing fields are
//! `"required"`, unknown ids are `"unknown"`, and the two ad-hoc planning
//! failures keep their literal messages with a 500.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use fleet_core::{FleetError, Heading, JobId, RobotId};
use fleet_plan::SpaceTimeAstar;
use fleet_service::{ExecutionNotice, FleetService, LocationUpdate, NodeWithDir, PathRequest};

use crate::ws;

pub type Service = Arc<FleetService<SpaceTimeAstar>>;

pub fn router(service: Service) -> Router {
    Router::new()
        .route("/register_robot", post(register_robot))
        .route("/submit_job", post(submit_job))
        .route("/poll_task", get(poll_task))
        .route("/update_location", post(update_location))
        .route("/report_execution", post(report_execution))
        .route("/request_path", post(request_path))
        .route("/reset_sim", post(reset_sim))
        .route("/ws", get(ws::upgrade))
        .with_state(service)
}

// ── Error rendering ───────────────────────────────────────────────────────────

struct ApiError(FleetError);

impl From<FleetError> for ApiError {
    fn from(e: FleetError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            FleetError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "required".to_string()),
            FleetError::UnknownRobot(_)
            | FleetError::UnknownJob(_)
            | FleetError::UnknownCell(_) => (StatusCode::BAD_REQUEST, "unknown".to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult = Result<Json<serde_json::Value>, ApiError>;

// ── Field helpers ─────────────────────────────────────────────────────────────

fn required(field: Option<String>, name: &'static str) -> Result<String, FleetError> {
    field
        .filter(|s| !s.is_empty())
        .ok_or(FleetError::InvalidRequest(name))
}

fn parse_heading(dir: Option<&str>) -> Result<Option<Heading>, FleetError> {
    match dir {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| FleetError::InvalidRequest("dir")),
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RegisterRequest {
    robot_id: Option<String>,
    node:     Option<String>,
    #[serde(alias = "facing")]
    dir:      Option<String>,
}

async fn register_robot(
    State(service): State<Service>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult {
    let node = required(req.node, "node")?;
    let heading = parse_heading(req.dir.as_deref())?.unwrap_or(Heading::South);
    let registration =
        service.register_robot(req.robot_id.map(RobotId::new), &node, heading)?;
    Ok(Json(json!({
        "robot_id": registration.robot_id,
        "color": registration.color,
    })))
}

#[derive(Deserialize)]
struct SubmitRequest {
    pickup: Option<String>,
    drop:   Option<String>,
}

async fn submit_job(State(service): State<Service>, Json(req): Json<SubmitRequest>) -> ApiResult {
    let pickup = required(req.pickup, "pickup")?;
    let drop = required(req.drop, "drop")?;
    let job_id = service.submit_job(&pickup, &drop)?;
    Ok(Json(json!({ "job_id": job_id })))
}

#[derive(Deserialize)]
struct PollQuery {
    robot_id: Option<String>,
}

async fn poll_task(State(service): State<Service>, Query(q): Query<PollQuery>) -> ApiResult {
    let rid = required(q.robot_id, "robot_id")?;
    let job = service.poll_task(&RobotId::new(rid))?;
    Ok(Json(json!({ "job": job })))
}

#[derive(Deserialize)]
struct UpdateRequest {
    robot_id:   Option<String>,
    node:       Option<String>,
    #[serde(alias = "facing")]
    dir:        Option<String>,
    step_index: Option<u32>,
    status:     Option<String>,
}

async fn update_location(
    State(service): State<Service>,
    Json(req): Json<UpdateRequest>,
) -> ApiResult {
    let robot_id = RobotId::new(required(req.robot_id, "robot_id")?);
    let cell = required(req.node, "node")?;
    let heading = parse_heading(req.dir.as_deref())?;
    service.update_location(LocationUpdate {
        robot_id,
        cell,
        heading,
        step_index: req.step_index,
        job_done: req.status.as_deref() == Some("job_done"),
    })?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
struct NodeDirEntry {
    node: String,
    dir:  Option<String>,
}

#[derive(Deserialize)]
struct ReportRequest {
    robot_id: Option<String>,
    job_id:   Option<String>,
    #[serde(default)]
    nodes_with_dir: Vec<NodeDirEntry>,
}

async fn report_execution(
    State(service): State<Service>,
    Json(req): Json<ReportRequest>,
) -> ApiResult {
    let robot_id = RobotId::new(required(req.robot_id, "robot_id")?);
    let mut nodes = Vec::with_capacity(req.nodes_with_dir.len());
    for entry in req.nodes_with_dir {
        nodes.push(NodeWithDir {
            node: entry.node,
            dir:  parse_heading(entry.dir.as_deref())?,
        });
    }
    service.report_execution(ExecutionNotice {
        robot_id,
        job_id: req.job_id.map(JobId::new),
        nodes,
    })?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
struct PathRequestBody {
    robot_id: Option<String>,
    node:     Option<String>,
    #[serde(alias = "facing")]
    dir:      Option<String>,
    pickup:   Option<String>,
    drop:     Option<String>,
}

async fn request_path(
    State(service): State<Service>,
    Json(req): Json<PathRequestBody>,
) -> ApiResult {
    let job = service.request_path(PathRequest {
        robot_id: RobotId::new(required(req.robot_id, "robot_id")?),
        node:     required(req.node, "node")?,
        heading:  parse_heading(req.dir.as_deref())?.unwrap_or(Heading::South),
        pickup:   required(req.pickup, "pickup")?,
        drop:     required(req.drop, "drop")?,
    })?;
    Ok(Json(json!({
        "ok": true,
        "plan": job.plan,
        "plan_str": job.plan_str,
        "job_id": job.id,
    })))
}

async fn reset_sim(State(service): State<Service>) -> ApiResult {
    service.reset();
    Ok(Json(json!({ "ok": true })))
}
