//! ReviewGate - post-completion review generation, selection, and
//! submission.
//!
//! Generation is always an explicit user action gated on survey
//! completion; it is never auto-triggered when the survey completes.
//! The gate shares the session store (and its busy gate) with the flow
//! controller, and never mutates the response log.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::domain::foundation::SurveyStatus;
use crate::domain::review::{ReviewOption, SentimentBand};
use crate::ports::{ReviewReply, ReviewService};

use super::errors::ReviewError;
use super::session_store::SessionStore;

/// The locally held batch of generated options plus the selection state.
#[derive(Debug, Default)]
struct ReviewBatch {
    options: Vec<ReviewOption>,
    sentiment_band: Option<SentimentBand>,
    selected: Option<usize>,
}

/// Session-scoped controller for the review stage.
pub struct ReviewGate {
    store: Arc<SessionStore>,
    service: Arc<dyn ReviewService>,
    batch: Mutex<ReviewBatch>,
}

impl ReviewGate {
    pub fn new(store: Arc<SessionStore>, service: Arc<dyn ReviewService>) -> Self {
        Self {
            store,
            service,
            batch: Mutex::new(ReviewBatch::default()),
        }
    }

    /// The currently held review options.
    pub fn options(&self) -> Vec<ReviewOption> {
        self.batch.lock().unwrap().options.clone()
    }

    /// The sentiment band of the last generated batch.
    pub fn sentiment_band(&self) -> Option<SentimentBand> {
        self.batch.lock().unwrap().sentiment_band
    }

    /// The locally selected option index, if any.
    pub fn selected(&self) -> Option<usize> {
        self.batch.lock().unwrap().selected
    }

    /// Generates review options for the completed survey.
    ///
    /// Valid only in `SurveyCompleted`; on success the session moves to
    /// `ReviewsGenerated`, which locks further edits.
    pub async fn generate(&self) -> Result<ReviewReply, ReviewError> {
        let _guard = self.store.begin_operation().ok_or(ReviewError::Busy)?;

        let session_id = self.store.read(|state| {
            let session = state.ok_or(ReviewError::NoSession)?;
            if !session.status().ready_for_reviews() {
                return Err(ReviewError::NotReadyForReviews {
                    status: session.status(),
                });
            }
            Ok(session.session_id())
        })?;

        let reply = self
            .service
            .generate(session_id)
            .await
            .map_err(ReviewError::Generation)?;

        self.store.write(|state| {
            let current = state.as_ref().ok_or(ReviewError::NoSession)?;
            let mut next = current.clone();
            next.mark_reviews_generated()
                .map_err(|_| ReviewError::NotReadyForReviews {
                    status: current.status(),
                })?;
            *state = Some(next);
            Ok(())
        })?;

        info!(
            session_id = %session_id,
            options = reply.options.len(),
            sentiment_band = %reply.sentiment_band,
            "review options generated"
        );
        let mut batch = self.batch.lock().unwrap();
        batch.options = reply.options.clone();
        batch.sentiment_band = Some(reply.sentiment_band);
        batch.selected = None;
        Ok(reply)
    }

    /// Requests a fresh batch for the same session.
    ///
    /// Status and responses are untouched; any prior local selection is
    /// cleared.
    pub async fn regenerate(&self) -> Result<ReviewReply, ReviewError> {
        let _guard = self.store.begin_operation().ok_or(ReviewError::Busy)?;

        let session_id = self.store.read(|state| {
            let session = state.ok_or(ReviewError::NoSession)?;
            match session.status() {
                SurveyStatus::ReviewsGenerated => Ok(session.session_id()),
                SurveyStatus::Completed => Err(ReviewError::AlreadySubmitted),
                status => Err(ReviewError::NotGenerated { status }),
            }
        })?;

        let reply = self
            .service
            .regenerate(session_id)
            .await
            .map_err(ReviewError::Generation)?;

        debug!(session_id = %session_id, "review options regenerated");
        let mut batch = self.batch.lock().unwrap();
        batch.options = reply.options.clone();
        batch.sentiment_band = Some(reply.sentiment_band);
        batch.selected = None;
        Ok(reply)
    }

    /// Marks an option as the local selection. Nothing is sent until
    /// [`submit`](Self::submit).
    pub fn select(&self, index: usize) -> Result<(), ReviewError> {
        self.store.read(|state| {
            let session = state.ok_or(ReviewError::NoSession)?;
            if session.status() == SurveyStatus::Completed {
                return Err(ReviewError::AlreadySubmitted);
            }
            Ok(())
        })?;

        let mut batch = self.batch.lock().unwrap();
        if batch.options.is_empty() {
            return Err(ReviewError::NoOptions);
        }
        if index >= batch.options.len() {
            return Err(ReviewError::InvalidIndex { index });
        }
        batch.selected = Some(index);
        Ok(())
    }

    /// Submits the chosen option.
    ///
    /// On success the session becomes `Completed` (terminal), permanently
    /// locking edits and regeneration. On failure the selection is kept so
    /// a retry reissues the identical submission.
    pub async fn submit(&self, index: usize) -> Result<ReviewOption, ReviewError> {
        let _guard = self.store.begin_operation().ok_or(ReviewError::Busy)?;

        let session_id = self.store.read(|state| {
            let session = state.ok_or(ReviewError::NoSession)?;
            match session.status() {
                SurveyStatus::ReviewsGenerated => Ok(session.session_id()),
                SurveyStatus::Completed => Err(ReviewError::AlreadySubmitted),
                status => Err(ReviewError::NotGenerated { status }),
            }
        })?;

        let chosen = {
            let mut batch = self.batch.lock().unwrap();
            if batch.options.is_empty() {
                return Err(ReviewError::NoOptions);
            }
            let chosen = batch
                .options
                .get(index)
                .cloned()
                .ok_or(ReviewError::InvalidIndex { index })?;
            batch.selected = Some(index);
            chosen
        };

        self.service
            .submit(session_id, index)
            .await
            .map_err(ReviewError::Submit)?;

        self.store.write(|state| {
            let current = state.as_ref().ok_or(ReviewError::NoSession)?;
            let mut next = current.clone();
            next.mark_completed().map_err(|_| ReviewError::NotGenerated {
                status: current.status(),
            })?;
            *state = Some(next);
            Ok(())
        })?;

        info!(session_id = %session_id, index, "review submitted, session complete");
        Ok(chosen)
    }
}
