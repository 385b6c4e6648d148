//! Application controller.
//!
//! [`App`] owns all user-visible state (position store, edit session, displayed
//! analysis, signed-in user) and is the only place where the pieces meet:
//! edit transitions come back from the session as values and are committed to
//! the store here; imports are validated here before they become current.

use crate::analysis::{AnalysisError, AnalysisProvider, RequestToken, RequestTracker};
use crate::auth::{StubAuth, User};
use crate::persistence::{PersistenceBackend, PersistenceError, SavedPosition};
use crate::recognition::{validate_image, ImageRecognizer, ImageUpload, RecognitionError};
use crate::session::{Edit, EditSession};
use crate::store::{PositionStore, StoreError};
use chess::{decode, validate_fen, Analysis, FenError, Piece, Placement, Square};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidFen(#[from] FenError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error("No saved position with id {0}")]
    NotFound(u64),
}

pub struct App<B> {
    store: PositionStore<B>,
    session: EditSession,
    analysis: Option<Analysis>,
    analysis_requests: RequestTracker,
    recognition_requests: RequestTracker,
    auth: StubAuth,
    user: Option<User>,
}

impl<B: PersistenceBackend> App<B> {
    pub fn new(backend: B) -> Result<Self, PersistenceError> {
        Ok(Self {
            store: PositionStore::open(backend)?,
            session: EditSession::new(),
            analysis: None,
            analysis_requests: RequestTracker::new(),
            recognition_requests: RequestTracker::new(),
            auth: StubAuth,
            user: None,
        })
    }

    // --- Read access ---

    pub fn position(&self) -> &str {
        self.store.current()
    }

    /// The current position as a grid. Never fails, even for malformed input.
    pub fn placement(&self) -> Placement {
        decode(self.store.current())
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_requests.is_busy()
    }

    pub fn is_recognizing(&self) -> bool {
        self.recognition_requests.is_busy()
    }

    pub fn saved(&self) -> &[SavedPosition] {
        self.store.saved()
    }

    pub fn store(&self) -> &PositionStore<B> {
        &self.store
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    // --- Board editing ---

    pub fn toggle_edit_mode(&mut self) {
        self.session = self.session.toggle_edit_mode();
    }

    pub fn select_piece(&mut self, piece: Option<Piece>) {
        self.session = self.session.select_piece(piece);
    }

    pub fn click_square(&mut self, square: Square) {
        let edit = self.session.click_square(self.store.current(), square);
        self.commit(edit);
    }

    /// Standard position, no analysis, no selections, viewing mode. Any
    /// outstanding analysis or recognition request is abandoned.
    pub fn reset(&mut self) {
        let edit = self.session.reset();
        self.commit(edit);
        self.analysis = None;
        self.analysis_requests.cancel();
        self.recognition_requests.cancel();
        tracing::info!("Board reset");
    }

    pub fn clear_board(&mut self) {
        let edit = self.session.clear_board();
        self.commit(edit);
    }

    fn commit(&mut self, edit: Edit) {
        self.session = edit.session;
        if let Some(position) = edit.position {
            tracing::debug!(%position, "Position updated");
            self.store.set_current(position);
        }
    }

    // --- Import ---

    /// Validate and adopt a placement field. On rejection nothing changes.
    /// An accepted import supersedes any pending image recognition.
    pub fn import_fen(&mut self, input: &str) -> Result<(), AppError> {
        if let Err(e) = validate_fen(input) {
            tracing::warn!(error = %e, "Rejected FEN import");
            return Err(e.into());
        }
        let fen = input.trim();
        self.store.set_current(fen);
        self.recognition_requests.cancel();
        tracing::info!(fen, "Imported position");
        Ok(())
    }

    /// Run an image through `recognizer` and import the position it reports.
    pub async fn import_image<R: ImageRecognizer>(
        &mut self,
        recognizer: &R,
        image: &ImageUpload,
    ) -> Result<(), AppError> {
        validate_image(image)?;
        let token = self.begin_recognition();
        let result = recognizer.recognize(image).await;
        self.finish_recognition(token, result).map(|_| ())
    }

    /// Start a recognition request; the caller runs the recognizer and
    /// reports back through [`App::finish_recognition`].
    pub fn begin_recognition(&mut self) -> RequestToken {
        let token = self.recognition_requests.begin();
        tracing::debug!(?token, "Recognition requested");
        token
    }

    /// Import a recognized position. Returns `Ok(false)` when the request was
    /// superseded by a reset, load or import in the meantime.
    pub fn finish_recognition(
        &mut self,
        token: RequestToken,
        result: Result<String, RecognitionError>,
    ) -> Result<bool, AppError> {
        if !self.recognition_requests.finish(token) {
            return Ok(false);
        }
        let fen = result.inspect_err(|e| tracing::warn!(error = %e, "Recognition failed"))?;
        self.import_fen(&fen)?;
        Ok(true)
    }

    // --- Saved positions ---

    /// Save the current position under `name`, with the displayed analysis.
    pub fn save_current(&mut self, name: &str) -> Result<SavedPosition, AppError> {
        let snapshot = self.analysis.clone().filter(|a| {
            let complete = a.is_complete();
            if !complete {
                tracing::warn!("Incomplete analysis not saved with position");
            }
            complete
        });
        let fen = self.store.current().to_string();
        let saved = self.store.save(name, &fen, snapshot).inspect_err(|e| {
            tracing::warn!(error = %e, "Save rejected");
        })?;
        Ok(saved)
    }

    /// Make a saved position current and show its cached analysis. The edit
    /// session is left as is.
    pub fn load_saved(&mut self, id: u64) -> Result<&SavedPosition, AppError> {
        let entry = self.store.load(id).cloned().ok_or(AppError::NotFound(id))?;
        self.store.set_current(entry.fen);
        self.analysis = entry.analysis;
        self.analysis_requests.cancel();
        self.recognition_requests.cancel();
        tracing::info!(id, "Loaded saved position");
        self.store.load(id).ok_or(AppError::NotFound(id))
    }

    /// Delete a saved position; returns whether one was removed.
    pub fn delete_saved(&mut self, id: u64) -> Result<bool, AppError> {
        Ok(self.store.delete(id)?)
    }

    // --- Analysis ---

    /// Start an analysis request for the current position. The caller runs the
    /// provider and reports back through [`App::finish_analysis`].
    pub fn begin_analysis(&mut self) -> (RequestToken, String) {
        let token = self.analysis_requests.begin();
        tracing::debug!(?token, "Analysis requested");
        (token, self.store.current().to_string())
    }

    /// Apply a finished request. Returns `Ok(false)` when the result was stale
    /// and discarded. Failures leave the displayed analysis untouched.
    pub fn finish_analysis(
        &mut self,
        token: RequestToken,
        result: Result<Analysis, AnalysisError>,
    ) -> Result<bool, AppError> {
        if !self.analysis_requests.finish(token) {
            return Ok(false);
        }
        let analysis = result
            .and_then(|a| {
                if a.is_complete() {
                    Ok(a)
                } else {
                    Err(AnalysisError::Failed("provider returned an incomplete analysis".into()))
                }
            })
            .inspect_err(|e| tracing::warn!(error = %e, "Analysis failed"))?;
        self.analysis = Some(analysis);
        Ok(true)
    }

    /// Request, await and apply one analysis.
    pub async fn analyze<P: AnalysisProvider>(&mut self, provider: &P) -> Result<bool, AppError> {
        let (token, fen) = self.begin_analysis();
        let result = provider.analyze(&fen).await;
        self.finish_analysis(token, result)
    }

    // --- Session ---

    pub fn login(&mut self) -> &User {
        self.user.insert(self.auth.login())
    }

    pub fn logout(&mut self) {
        self.user = None;
    }
}
