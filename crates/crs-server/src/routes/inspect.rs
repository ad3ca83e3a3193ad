//! The server's additional read endpoints beyond the core agent lifecycle:
//! graph/cache statistics, the algorithm ("tool") catalog, a memory CRUD
//! surface over the History index, and library seeding for bootstrapping a
//! session's CRS with known dependency facts before reasoning starts.

use crate::error::ServerError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use crs_store::types::DependencyEdge;
use crs_store::{Delta, DeltaKind, DependencyDelta, HistoryDelta};
use crs_types::{NodeId, SessionId, SignalSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/graph/stats/:id", get(graph_stats))
        .route("/cache/stats/:id", get(cache_stats))
        .route("/tools", get(list_tools))
        .route("/memory/:id/:node_id", get(get_memory).post(record_memory))
        .route("/library/seed", post(seed_library))
}

fn parse_session_id(raw: &str) -> Result<SessionId, ServerError> {
    Uuid::parse_str(raw)
        .map(SessionId)
        .map_err(|_| ServerError::BadRequest(format!("'{raw}' is not a valid session id")))
}

fn parse_node_id(raw: &str) -> Result<NodeId, ServerError> {
    Uuid::parse_str(raw)
        .map(NodeId)
        .map_err(|_| ServerError::BadRequest(format!("'{raw}' is not a valid node id")))
}

#[derive(Serialize)]
pub struct GraphStats {
    pub dependency_edges: usize,
    pub similarity_pairs: usize,
}

async fn graph_stats(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<GraphStats>, ServerError> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let snapshot = session.store().snapshot();
    Ok(Json(GraphStats {
        dependency_edges: snapshot.dependency().size(),
        similarity_pairs: snapshot.similarity().size(),
    }))
}

#[derive(Serialize)]
pub struct CacheStats {
    pub history_entries: usize,
    pub streaming_cardinality: f64,
    pub streaming_approximate_bytes: usize,
}

async fn cache_stats(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<CacheStats>, ServerError> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let snapshot = session.store().snapshot();
    Ok(Json(CacheStats {
        history_entries: snapshot.history().size(),
        streaming_cardinality: snapshot.streaming().cardinality_estimate(),
        streaming_approximate_bytes: snapshot.streaming().approximate_bytes(),
    }))
}

#[derive(Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub family: &'static str,
    pub supports_partial_results: bool,
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    let mut tools: Vec<ToolDescriptor> = state
        .algorithms
        .names()
        .into_iter()
        .filter_map(|name| state.algorithms.get(name))
        .map(|d| ToolDescriptor {
            name: d.name,
            family: match d.family {
                crs_algorithms::AlgorithmFamily::Planning => "planning",
                crs_algorithms::AlgorithmFamily::Search => "search",
                crs_algorithms::AlgorithmFamily::Graph => "graph",
                crs_algorithms::AlgorithmFamily::Streaming => "streaming",
            },
            supports_partial_results: d.supports_partial_results,
        })
        .collect();
    tools.sort_by_key(|t| t.name);
    Json(tools)
}

#[derive(Serialize)]
pub struct MemoryEntries {
    pub node_id: NodeId,
    pub visits: Vec<u64>,
}

/// Read every recorded visit for `node_id` out of the History index. The
/// store is delta-journaled and append-only, so there is no corresponding
/// delete: a node's memory can only grow or fall off the FIFO cap.
async fn get_memory(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
) -> Result<Json<MemoryEntries>, ServerError> {
    let id = parse_session_id(&id)?;
    let node_id = parse_node_id(&node_id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let visits = session.store().snapshot().history().by_node(node_id).into_iter().map(|e| e.visited_at).collect();
    Ok(Json(MemoryEntries { node_id, visits }))
}

async fn record_memory(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
) -> Result<Json<MemoryEntries>, ServerError> {
    let id = parse_session_id(&id)?;
    let node_id = parse_node_id(&node_id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    session.store().apply(Delta::new(
        SignalSource::Hard,
        DeltaKind::History(HistoryDelta { visited: vec![node_id] }),
        crs_types::now_ms(),
    ))?;
    let visits = session.store().snapshot().history().by_node(node_id).into_iter().map(|e| e.visited_at).collect();
    Ok(Json(MemoryEntries { node_id, visits }))
}

#[derive(Deserialize)]
pub struct SeedLibraryRequest {
    pub session_id: SessionId,
    pub edges: Vec<SeedEdge>,
}

#[derive(Deserialize)]
pub struct SeedEdge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Serialize)]
pub struct SeedLibraryResponse {
    pub generation: u64,
    pub dependency_edges: usize,
}

/// Bootstrap a session's CRS with known dependency facts (e.g. a project's
/// existing module graph) before reasoning begins, so Explore doesn't have
/// to rediscover them from scratch.
async fn seed_library(
    State(state): State<AppState>,
    Json(req): Json<SeedLibraryRequest>,
) -> Result<Json<SeedLibraryResponse>, ServerError> {
    let handle = state.sessions.get(req.session_id)?;
    let session = handle.lock().await;
    let added_edges = req.edges.into_iter().map(|e| DependencyEdge { from: e.from, to: e.to }).collect();
    let generation = session.store().apply(Delta::new(
        SignalSource::Hard,
        DeltaKind::Dependency(DependencyDelta { added_edges }),
        crs_types::now_ms(),
    ))?;
    let snapshot = session.store().snapshot();
    Ok(Json(SeedLibraryResponse { generation: generation.0, dependency_edges: snapshot.dependency().size() }))
}
