// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Analysis orchestrator: the selection → request → result state machine
//!
//! All transitions happen under one lock and are published on a
//! `watch` channel, so observers never see a half-applied transition.
//! The remote call is the only suspension point; it runs on a spawned
//! task and `analyze` returns immediately.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::AppConfig;
use crate::error::RemoteFailure;
use crate::fallback;
use crate::intake::{Candidate, FileIntake, Rejection, SelectedImage};
use crate::model::AnalysisResult;
use crate::preview::{PreviewId, PreviewStore};
use crate::scoring::{ScoringClient, ScoringService};
use crate::session::SessionStats;
use crate::Result;

/// What the presenter renders. Exactly one is current.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum OrchestratorState {
    Idle,
    Selected,
    Analyzing,
    Resolved(AnalysisResult),
}

impl OrchestratorState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, OrchestratorState::Analyzing)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            OrchestratorState::Resolved(result) => Some(result),
            _ => None,
        }
    }
}

/// Presenter-facing description of the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionInfo {
    pub name: String,
    pub media_type: String,
    pub size: usize,
    pub digest: String,
    #[serde(skip)]
    pub preview: PreviewId,
}

impl From<&SelectedImage> for SelectionInfo {
    fn from(image: &SelectedImage) -> Self {
        Self {
            name: image.name().to_string(),
            media_type: image.media_type().to_string(),
            size: image.size(),
            digest: image.digest().to_string(),
            preview: image.preview_id(),
        }
    }
}

enum Phase {
    Idle,
    Selected,
    Analyzing { generation: u64, task: AbortHandle },
    Resolved(AnalysisResult),
}

impl Phase {
    fn project(&self) -> OrchestratorState {
        match self {
            Phase::Idle => OrchestratorState::Idle,
            Phase::Selected => OrchestratorState::Selected,
            Phase::Analyzing { .. } => OrchestratorState::Analyzing,
            Phase::Resolved(result) => OrchestratorState::Resolved(result.clone()),
        }
    }
}

// `selection` is `None` exactly when `phase` is `Idle`.
struct Session {
    selection: Option<SelectedImage>,
    phase: Phase,
    generation: u64,
    stats: SessionStats,
}

struct Shared {
    session: Mutex<Session>,
    state_tx: watch::Sender<OrchestratorState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &Session) {
        self.state_tx.send_replace(session.phase.project());
    }

    /// Apply the outcome of the remote call started under `generation`
    fn complete(
        &self,
        generation: u64,
        outcome: std::result::Result<AnalysisResult, RemoteFailure>,
    ) {
        let mut session = self.lock();
        match session.phase {
            Phase::Analyzing { generation: current, .. } if current == generation => {}
            _ => {
                debug!(generation, "discarding outcome of abandoned analysis");
                return;
            }
        }

        let (result, degraded) = match outcome {
            Ok(result) => (result, false),
            Err(failure) => {
                warn!(
                    generation,
                    kind = failure.kind(),
                    %failure,
                    "scoring failed, using fallback result"
                );
                (fallback::synthesize(), true)
            }
        };

        session.stats.record(result.score, degraded);
        info!(
            generation,
            score = result.score,
            band = %classify(result.score),
            degraded,
            "analysis resolved"
        );
        session.phase = Phase::Resolved(result);
        self.publish(&session);
    }
}

/// Drives one image at a time from selection to a resolved result
pub struct Orchestrator {
    shared: Arc<Shared>,
    intake: FileIntake,
    service: Arc<dyn ScoringService>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn ScoringService>, intake: FileIntake) -> Self {
        let (state_tx, _) = watch::channel(OrchestratorState::Idle);
        let session = Session {
            selection: None,
            phase: Phase::Idle,
            generation: 0,
            stats: SessionStats::default(),
        };
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                state_tx,
            }),
            intake,
            service,
        }
    }

    /// Wire an orchestrator to the HTTP scoring client described by `config`
    pub fn from_config(config: &AppConfig, previews: Arc<dyn PreviewStore>) -> Result<Self> {
        let client = ScoringClient::new(&config.scoring)?;
        let intake = FileIntake::new(previews).with_max_bytes(config.intake.max_bytes);
        Ok(Self::new(Arc::new(client), intake))
    }

    /// Current state snapshot
    pub fn state(&self) -> OrchestratorState {
        self.shared.state_tx.borrow().clone()
    }

    /// Receiver that sees every published transition
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.shared.state_tx.subscribe()
    }

    pub fn selection(&self) -> Option<SelectionInfo> {
        self.shared.lock().selection.as_ref().map(SelectionInfo::from)
    }

    pub fn stats(&self) -> SessionStats {
        self.shared.lock().stats.clone()
    }

    /// Offer a new file.
    ///
    /// Non-images are rejected with no state change. An accepted image
    /// replaces the current selection, clears any resolved result and
    /// abandons an analysis still in flight.
    pub fn select(&self, candidate: Candidate) -> std::result::Result<PreviewId, Rejection> {
        let mut session = self.shared.lock();
        let preview = self.intake.select(&mut session.selection, candidate)?;

        if let Phase::Analyzing { generation, task } = &session.phase {
            task.abort();
            info!(generation, "in-flight analysis abandoned for new selection");
        }
        session.generation += 1;
        session.phase = Phase::Selected;
        self.shared.publish(&session);
        Ok(preview)
    }

    /// Start scoring the current selection.
    ///
    /// Returns `false` without doing anything when nothing is selected or
    /// a request is already in flight. Otherwise spawns the remote call
    /// and returns `true`; the state moves to `Resolved` when it finishes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn analyze(&self) -> bool {
        let mut session = self.shared.lock();
        if let Phase::Analyzing { generation, .. } = session.phase {
            debug!(generation, "analysis already in flight, ignoring analyze");
            return false;
        }
        let Some(request) = session.selection.as_ref().map(SelectedImage::request) else {
            debug!("no image selected, ignoring analyze");
            return false;
        };

        session.generation += 1;
        let generation = session.generation;
        info!(generation, file = %request.file_name, "analysis started");

        // The call runs on its own task so a panicking service still
        // resolves through the fallback path.
        let service = Arc::clone(&self.service);
        let scoring = tokio::spawn(async move { service.score(request).await });
        let task = scoring.abort_handle();

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = match scoring.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_cancelled() => {
                    debug!(generation, "scoring task cancelled");
                    return;
                }
                Err(e) => Err(RemoteFailure::Unavailable(format!("scoring task panicked: {}", e))),
            };
            shared.complete(generation, outcome);
        });

        session.phase = Phase::Analyzing { generation, task };
        self.shared.publish(&session);
        true
    }

    /// Wait until no analysis is in flight and return the state reached
    pub async fn resolved(&self) -> OrchestratorState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.is_analyzing()).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        let mut session = self.shared.lock();
        if let Phase::Analyzing { generation, task } = &session.phase {
            task.abort();
            debug!(generation, "in-flight analysis aborted on shutdown");
        }
        session.phase = Phase::Idle;
        session.selection = None;
        self.shared.publish(&session);
    }
}
