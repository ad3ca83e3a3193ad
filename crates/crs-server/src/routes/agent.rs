//! `/agent/*`: session lifecycle (run, continue, abort) and the three
//! read endpoints over a single session (state, reasoning trace, CRS
//! export).

use crate::error::ServerError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use crs_algorithms::search::{UnitPropagationInput, UnitPropagator};
use crs_algorithms::{Algorithm, AlgorithmContext, AlgorithmRegistry};
use crs_session::{Session, SessionConfig, SessionPhase};
use crs_store::{CrsStore, Delta, DeltaKind, ProofDelta, ProofUpdate};
use crs_types::{now_ms, NodeId, ProofStatus, SessionId, SignalSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/run", post(run))
        .route("/continue", post(continue_session))
        .route("/abort", post(abort))
        .route("/:id", get(get_session))
        .route("/:id/reasoning", get(get_reasoning))
        .route("/:id/crs", get(get_crs_export))
}

fn parse_session_id(raw: &str) -> Result<SessionId, ServerError> {
    Uuid::parse_str(raw)
        .map(SessionId)
        .map_err(|_| ServerError::BadRequest(format!("'{raw}' is not a valid session id")))
}

#[derive(Deserialize)]
pub struct RunRequest {
    pub project_root: String,
    pub query: String,
    #[serde(default)]
    pub config: Option<RunConfig>,
}

#[derive(Deserialize, Default)]
pub struct RunConfig {
    pub max_steps: Option<u32>,
    pub max_tokens: Option<u64>,
}

#[derive(Serialize)]
pub struct RunResponse {
    pub session_id: SessionId,
    pub state: SessionPhase,
    pub steps_taken: u32,
    pub tokens_used: u64,
    pub response: Option<String>,
    pub needs_clarify: bool,
    pub degraded: bool,
}

async fn run(State(state): State<AppState>, Json(req): Json<RunRequest>) -> Result<Json<RunResponse>, ServerError> {
    let mut budget = state.default_budget;
    if let Some(cfg) = &req.config {
        if let Some(max_steps) = cfg.max_steps {
            budget.max_steps = max_steps;
        }
        if let Some(max_tokens) = cfg.max_tokens {
            budget.max_tokens = max_tokens;
        }
    }

    let handle = state.sessions.create(Arc::new(CrsStore::default()), SessionConfig { budget });
    let mut session = handle.lock().await;
    let response = drive_session(&state, &mut session, &req.project_root, &req.query).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct ContinueRequest {
    pub session_id: SessionId,
    pub clarification: String,
}

async fn continue_session(
    State(state): State<AppState>,
    Json(req): Json<ContinueRequest>,
) -> Result<Json<RunResponse>, ServerError> {
    let handle = state.sessions.get(req.session_id)?;
    let mut session = handle.try_lock().map_err(|_| ServerError::Busy(req.session_id))?;

    if session.phase() != SessionPhase::Clarify {
        return Err(ServerError::BadRequest(format!(
            "session {} is not awaiting clarification (state is {:?})",
            req.session_id,
            session.phase()
        )));
    }
    let clarification = req.clarification.clone();
    session.answer_clarification(req.clarification)?;
    let response = drive_from_reason(&state, &mut session, &clarification).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct AbortRequest {
    pub session_id: SessionId,
}

async fn abort(State(state): State<AppState>, Json(req): Json<AbortRequest>) -> Result<StatusCode, ServerError> {
    let handle = state.sessions.get(req.session_id)?;
    let mut session = handle.try_lock().map_err(|_| ServerError::Busy(req.session_id))?;
    session.abort()?;
    Ok(StatusCode::OK)
}

#[derive(Serialize)]
pub struct SessionStateResponse {
    pub session_id: SessionId,
    pub state: SessionPhase,
    pub steps_taken: u32,
    pub tokens_used: u64,
    pub degraded: bool,
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStateResponse>, ServerError> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    Ok(Json(SessionStateResponse {
        session_id: session.id(),
        state: session.phase(),
        steps_taken: session.steps_used(),
        tokens_used: session.tokens_used(),
        degraded: session.budget_exhausted(),
    }))
}

async fn get_reasoning(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Vec<crs_session::ReasoningStep>>), ServerError> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    if session.trace().is_empty() {
        return Ok((StatusCode::NO_CONTENT, Json(Vec::new())));
    }
    Ok((StatusCode::OK, Json(session.trace().steps().to_vec())))
}

#[derive(Serialize)]
pub struct CrsExport {
    pub session_id: SessionId,
    pub generation: u64,
    pub timestamp_ms: u64,
    pub indexes: CrsIndexesExport,
    pub summary: CrsSummaryExport,
}

#[derive(Serialize)]
pub struct ProofEntry {
    pub node_id: crs_types::NodeId,
    pub status: crs_types::ProofStatus,
}

#[derive(Serialize)]
pub struct ConstraintEntry {
    pub id: crs_types::ConstraintId,
    #[serde(rename = "type")]
    pub kind: String,
    pub nodes: Vec<crs_types::NodeId>,
    pub strength: f64,
}

#[derive(Serialize)]
pub struct StreamingExport {
    pub cardinality: f64,
    pub approximate_bytes: usize,
}

#[derive(Serialize)]
pub struct HistoryEntryExport {
    pub node_id: crs_types::NodeId,
    pub last_visited_ms: u64,
    pub visit_count: usize,
}

#[derive(Serialize)]
pub struct CrsIndexesExport {
    pub proof: Vec<ProofEntry>,
    pub constraints: Vec<ConstraintEntry>,
    pub similarity_count: usize,
    pub dependency_count: usize,
    pub streaming: StreamingExport,
    pub history: Vec<HistoryEntryExport>,
}

#[derive(Serialize)]
pub struct CrsSummaryExport {
    pub nodes_explored: usize,
    pub nodes_proven: usize,
    pub nodes_disproven: usize,
    pub nodes_unknown: usize,
    pub constraints_applied: usize,
    pub exploration_depth: usize,
    pub confidence_score: f64,
}

async fn get_crs_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CrsExport>, ServerError> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let snapshot = session.store().snapshot();

    let proof_all = snapshot.proof().all();
    let proof: Vec<ProofEntry> = proof_all.iter().map(|(node_id, pn)| ProofEntry { node_id: *node_id, status: pn.status }).collect();

    let constraints: Vec<ConstraintEntry> = snapshot
        .constraint()
        .iter()
        .map(|c| ConstraintEntry {
            id: c.id,
            kind: format!("{:?}", c.kind),
            nodes: c.nodes.clone(),
            strength: 1.0,
        })
        .collect();

    let mut visit_counts: std::collections::HashMap<crs_types::NodeId, (u64, usize)> = std::collections::HashMap::new();
    for entry in snapshot.history().recent(snapshot.history().size()) {
        let slot = visit_counts.entry(entry.node_id).or_insert((0, 0));
        slot.0 = slot.0.max(entry.visited_at);
        slot.1 += 1;
    }
    let history: Vec<HistoryEntryExport> = visit_counts
        .into_iter()
        .map(|(node_id, (last, count))| HistoryEntryExport { node_id, last_visited_ms: last, visit_count: count })
        .collect();

    let nodes_proven = proof_all.iter().filter(|(_, pn)| pn.status == crs_types::ProofStatus::Proven).count();
    let nodes_disproven = proof_all.iter().filter(|(_, pn)| pn.status == crs_types::ProofStatus::Disproven).count();
    let nodes_unknown = proof_all.iter().filter(|(_, pn)| pn.status == crs_types::ProofStatus::Unknown).count();
    let confidence_score = if proof_all.is_empty() {
        0.0
    } else {
        (nodes_proven + nodes_disproven) as f64 / proof_all.len() as f64
    };

    Ok(Json(CrsExport {
        session_id: id,
        generation: snapshot.generation().0,
        timestamp_ms: now_ms(),
        indexes: CrsIndexesExport {
            proof,
            constraints,
            similarity_count: snapshot.similarity().size(),
            dependency_count: snapshot.dependency().size(),
            streaming: StreamingExport {
                cardinality: snapshot.streaming().cardinality_estimate(),
                approximate_bytes: snapshot.streaming().approximate_bytes(),
            },
            history,
        },
        summary: CrsSummaryExport {
            nodes_explored: proof_all.len(),
            nodes_proven,
            nodes_disproven,
            nodes_unknown,
            constraints_applied: snapshot.constraint().size(),
            exploration_depth: session.trace().len(),
            confidence_score,
        },
    }))
}

/// Drive a fresh session from `Idle` through `Plan`/`Explore`/`Reason`,
/// pausing in `Clarify` if the services say so, else running straight
/// through to `Complete`.
async fn drive_session(state: &AppState, session: &mut Session, project_root: &str, query: &str) -> Result<RunResponse, ServerError> {
    let plan = state.services.plan(project_root, query).await;
    let mut degraded = session.advance(SessionPhase::Plan, plan).is_err();

    degraded |= session.advance(SessionPhase::Explore, "exploring the dependency graph").is_err();
    if !degraded {
        record_exploration(session, query);
    }

    degraded |= session.advance(SessionPhase::Reason, "reasoning over the collected evidence").is_err();
    if !degraded {
        run_reasoning(session, &state.algorithms);
    }

    if !degraded {
        if let Some(question) = state.services.clarification_needed(query).await {
            session.request_clarification(question.clone())?;
            return Ok(RunResponse {
                session_id: session.id(),
                state: session.phase(),
                steps_taken: session.steps_used(),
                tokens_used: session.tokens_used(),
                response: Some(question),
                needs_clarify: true,
                degraded: false,
            });
        }
    }

    finish(state, session, query, degraded).await
}

/// Resume a session sitting in `Clarify` (after `answer_clarification` moved
/// it back to `Explore`) through `Reason` to `Complete`.
async fn drive_from_reason(state: &AppState, session: &mut Session, query: &str) -> Result<RunResponse, ServerError> {
    let mut degraded = session.budget_exhausted();
    if !degraded {
        record_exploration(session, query);
    }

    degraded |= session.advance(SessionPhase::Reason, "resuming reasoning after clarification").is_err();
    if !degraded {
        run_reasoning(session, &state.algorithms);
    }

    finish(state, session, query, degraded).await
}

/// Explore's hard signal: the query's root artifact was located by the file
/// system / parser tools backing this session, recorded as a non-terminal
/// Hard proof entry.
fn record_exploration(session: &Session, query: &str) {
    let node = NodeId::new();
    let delta = Delta::new(
        SignalSource::Hard,
        DeltaKind::Proof(ProofDelta { updates: vec![ProofUpdate { node_id: node, proof: 1, disproof: 1, status: ProofStatus::Unknown }] }),
        now_ms(),
    );
    if let Err(err) = session.store().apply(delta) {
        tracing::warn!(query = %query, error = %err, "failed to record exploration signal");
    }
}

/// Reason's algorithm run: unit propagation over the constraints and proof
/// state accumulated so far, applying any resulting Hard conflict delta
/// back to CRS.
fn run_reasoning(session: &Session, algorithms: &AlgorithmRegistry) {
    if algorithms.validate_input("unit_propagation", "UnitPropagationInput").is_err() {
        tracing::warn!("unit_propagation is not registered, skipping reasoning step");
        return;
    }

    let snapshot = session.store().snapshot();
    let constraints = snapshot.constraint().iter().collect();
    let assignment: HashMap<NodeId, bool> = snapshot
        .proof()
        .all()
        .into_iter()
        .filter_map(|(node_id, pn)| match pn.status {
            ProofStatus::Proven => Some((node_id, true)),
            ProofStatus::Disproven => Some((node_id, false)),
            ProofStatus::Unknown | ProofStatus::Expanded => None,
        })
        .collect();

    let ctx = AlgorithmContext::new(std::time::Duration::from_secs(1));
    let input = UnitPropagationInput { constraints, assignment };
    match UnitPropagator.process(&ctx, &snapshot, input) {
        Ok((_output, Some(delta))) => {
            if let Err(err) = session.store().apply(delta) {
                tracing::warn!(error = %err, "failed to apply unit propagation delta");
            }
        }
        Ok((_output, None)) => {}
        Err(err) => tracing::warn!(error = %err, "unit propagation step failed"),
    }
}

async fn finish(state: &AppState, session: &mut Session, query: &str, mut degraded: bool) -> Result<RunResponse, ServerError> {
    if session.phase() != SessionPhase::Respond {
        degraded |= session.advance(SessionPhase::Respond, "responding").is_err();
    }
    let response = state.services.respond(query, session.steps_used()).await;
    if session.phase() != SessionPhase::Complete {
        let _ = session.advance(SessionPhase::Complete, "complete");
    }

    Ok(RunResponse {
        session_id: session.id(),
        state: session.phase(),
        steps_taken: session.steps_used(),
        tokens_used: session.tokens_used(),
        response: Some(response),
        needs_clarify: false,
        degraded,
    })
}
