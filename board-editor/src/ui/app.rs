use crate::analysis::{AnalysisError, AnalysisProvider, RequestToken};
use crate::app::App;
use crate::persistence::PersistenceBackend;
use crate::recognition::{validate_image, ImageRecognizer, ImageUpload, RecognitionError};
use crate::ui::input::{help_text, map_confirm_key, map_key, Action, Prompt, PromptKind};
use crate::ui::widgets::{BoardWidget, PromptWidget, SidePanel};
use chess::{Analysis, Square};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// e2
const START_CURSOR: Square = match Square::new(6, 4) {
    Some(square) => square,
    None => panic!("cursor must be on the board"),
};

/// Results of work that finished off the UI task.
#[derive(Debug)]
pub enum BackgroundEvent {
    Analysis {
        token: RequestToken,
        result: Result<Analysis, AnalysisError>,
    },
    Recognition {
        token: RequestToken,
        result: Result<String, RecognitionError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

/// Terminal front end around an [`App`].
pub struct EditorUi<B, P, R> {
    pub app: App<B>,
    provider: Arc<P>,
    recognizer: Arc<R>,
    tx: mpsc::UnboundedSender<BackgroundEvent>,
    pub cursor: Square,
    pub saved_index: usize,
    pub prompt: Option<Prompt>,
    pub status: Option<Status>,
    /// Saved position waiting for a yes/no before it is deleted.
    pub pending_delete: Option<u64>,
    pub quit: bool,
}

impl<B, P, R> EditorUi<B, P, R>
where
    B: PersistenceBackend,
    P: AnalysisProvider + 'static,
    R: ImageRecognizer + 'static,
{
    pub fn new(
        app: App<B>,
        provider: Arc<P>,
        recognizer: Arc<R>,
        tx: mpsc::UnboundedSender<BackgroundEvent>,
    ) -> Self {
        Self {
            app,
            provider,
            recognizer,
            tx,
            cursor: START_CURSOR,
            saved_index: 0,
            prompt: None,
            status: None,
            pending_delete: None,
            quit: false,
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn error(&mut self, err: impl std::fmt::Display) {
        self.status = Some(Status {
            text: err.to_string(),
            is_error: true,
        });
    }

    fn selected_saved_id(&self) -> Option<u64> {
        self.app.saved().get(self.saved_index).map(|p| p.id)
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit = true,
            Action::MoveCursor { d_row, d_col } => {
                if let Some(square) = self.cursor.offset(d_row, d_col) {
                    self.cursor = square;
                }
            }
            Action::Click => self.app.click_square(self.cursor),
            Action::ToggleEdit => {
                self.app.toggle_edit_mode();
                let mode = if self.app.session().is_editing() {
                    "Edit mode: pick a piece, then place it"
                } else {
                    "Viewing"
                };
                self.info(mode);
            }
            Action::SelectPiece(piece) => self.app.select_piece(piece),
            Action::Reset => {
                self.app.reset();
                self.info("Board reset");
            }
            Action::ClearBoard => {
                self.app.clear_board();
                self.info("Board cleared");
            }
            Action::Analyze => self.start_analysis(),
            Action::OpenPrompt(kind) => self.prompt = Some(Prompt::new(kind)),
            Action::PromptChar(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.buffer.push(c);
                }
            }
            Action::PromptBackspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.buffer.pop();
                }
            }
            Action::PromptCancel => self.prompt = None,
            Action::PromptSubmit => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            Action::SavedPrev => self.saved_index = self.saved_index.saturating_sub(1),
            Action::SavedNext => {
                if self.saved_index + 1 < self.app.saved().len() {
                    self.saved_index += 1;
                }
            }
            Action::LoadSelected => {
                let Some(id) = self.selected_saved_id() else {
                    return self.error("No saved position selected");
                };
                match self.app.load_saved(id) {
                    Ok(entry) => {
                        let text = format!("Loaded '{}'", entry.name);
                        self.info(text);
                    }
                    Err(e) => self.error(e),
                }
            }
            Action::DeleteSelected => {
                let Some(entry) = self.app.saved().get(self.saved_index) else {
                    return self.error("No saved position selected");
                };
                let text = format!(
                    "Delete '{}'? Press y to confirm, any other key to cancel",
                    entry.name
                );
                self.pending_delete = Some(entry.id);
                self.info(text);
            }
            Action::ConfirmDelete => {
                let Some(id) = self.pending_delete.take() else {
                    return;
                };
                match self.app.delete_saved(id) {
                    Ok(_) => {
                        self.saved_index = self
                            .saved_index
                            .min(self.app.saved().len().saturating_sub(1));
                        self.info("Deleted saved position");
                    }
                    Err(e) => self.error(e),
                }
            }
            Action::CancelDelete => {
                if self.pending_delete.take().is_some() {
                    self.info("Delete cancelled");
                }
            }
            Action::ToggleLogin => {
                if self.app.user().is_some() {
                    self.app.logout();
                    self.info("Signed out");
                } else {
                    let text = format!("Signed in as {}", self.app.login().name);
                    self.info(text);
                }
            }
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        match prompt.kind {
            PromptKind::ImportFen => match self.app.import_fen(&prompt.buffer) {
                Ok(()) => self.info("Position imported"),
                Err(e) => self.error(e),
            },
            PromptKind::SaveName => match self.app.save_current(&prompt.buffer) {
                Ok(saved) => {
                    self.saved_index = self.app.saved().len().saturating_sub(1);
                    let text = format!("Saved '{}'", saved.name);
                    self.info(text);
                }
                Err(e) => self.error(e),
            },
            PromptKind::ImagePath => self.start_recognition(Path::new(prompt.buffer.trim())),
        }
    }

    fn start_analysis(&mut self) {
        let (token, fen) = self.app.begin_analysis();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = provider.analyze(&fen).await;
            let _ = tx.send(BackgroundEvent::Analysis { token, result });
        });
        self.info("Analyzing...");
    }

    fn start_recognition(&mut self, path: &Path) {
        let image = match ImageUpload::from_path(path).and_then(|image| {
            validate_image(&image)?;
            Ok(image)
        }) {
            Ok(image) => image,
            Err(e) => return self.error(e),
        };
        let token = self.app.begin_recognition();
        let recognizer = Arc::clone(&self.recognizer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = recognizer.recognize(&image).await;
            let _ = tx.send(BackgroundEvent::Recognition { token, result });
        });
        self.info("Detecting position from image...");
    }

    pub fn handle_background(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::Analysis { token, result } => {
                match self.app.finish_analysis(token, result) {
                    Ok(true) => self.info("Analysis complete"),
                    Ok(false) => {}
                    Err(e) => self.error(e),
                }
            }
            BackgroundEvent::Recognition { token, result } => {
                match self.app.finish_recognition(token, result) {
                    Ok(true) => self.info("Position detected from image"),
                    Ok(false) => {}
                    Err(e) => self.error(e),
                }
            }
        }
    }

    fn draw(&self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(12),
                Constraint::Length(4),
            ])
            .split(f.area());

        let header = Line::from(vec![
            Span::styled(
                "♔ Board Editor",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(
                self.app
                    .user()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "press 'l' to sign in".to_string()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(header), rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(50)])
            .split(rows[1]);

        let placement = self.app.placement();
        f.render_widget(
            BoardWidget::new(&placement, self.app.session(), self.cursor),
            columns[0],
        );
        f.render_widget(
            SidePanel {
                fen: self.app.position(),
                session: self.app.session(),
                analysis: self.app.analysis(),
                analyzing: self.app.is_analyzing(),
                saved: self.app.saved(),
                saved_index: self.saved_index,
                user: self.app.user(),
            },
            columns[1],
        );

        let status = match &self.status {
            Some(status) if status.is_error => {
                Span::styled(status.text.as_str(), Style::default().fg(Color::Red))
            }
            Some(status) => Span::styled(status.text.as_str(), Style::default().fg(Color::Green)),
            None => Span::raw(""),
        };
        let footer = Paragraph::new(vec![
            Line::from(status),
            Line::from(Span::styled(
                help_text(self.app.session().is_editing(), self.prompt.is_some()),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::TOP));
        f.render_widget(footer, rows[2]);

        if let Some(prompt) = &self.prompt {
            f.render_widget(PromptWidget { prompt }, f.area());
        }
    }
}

/// Run the terminal UI until the user quits.
pub async fn run_app<B, P, R>(app: App<B>, provider: P, recognizer: R) -> anyhow::Result<()>
where
    B: PersistenceBackend,
    P: AnalysisProvider + 'static,
    R: ImageRecognizer + 'static,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ui = EditorUi::new(app, Arc::new(provider), Arc::new(recognizer), tx);

    let result = event_loop(&mut terminal, &mut ui, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B, P, R>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ui: &mut EditorUi<B, P, R>,
    rx: &mut mpsc::UnboundedReceiver<BackgroundEvent>,
) -> anyhow::Result<()>
where
    B: PersistenceBackend,
    P: AnalysisProvider + 'static,
    R: ImageRecognizer + 'static,
{
    loop {
        while let Ok(event) = rx.try_recv() {
            ui.handle_background(event);
        }

        terminal.draw(|f| ui.draw(f))?;
        if ui.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let action = if ui.pending_delete.is_some() {
                    map_confirm_key(key)
                } else {
                    map_key(key, ui.app.session().is_editing(), ui.prompt.is_some())
                };
                if let Some(action) = action {
                    ui.handle_action(action);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CannedAnalysis;
    use crate::persistence::InMemoryBackend;
    use crate::recognition::{StubRecognizer, STUB_RECOGNIZED_FEN};
    use chess::{EMPTY_FEN, STARTING_FEN};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    type TestUi = EditorUi<InMemoryBackend, CannedAnalysis, StubRecognizer>;

    fn ui() -> (TestUi, mpsc::UnboundedReceiver<BackgroundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(InMemoryBackend::new()).unwrap();
        let ui = EditorUi::new(
            app,
            Arc::new(CannedAnalysis::new(Duration::ZERO)),
            Arc::new(StubRecognizer::new(Duration::ZERO)),
            tx,
        );
        (ui, rx)
    }

    fn type_text(ui: &mut TestUi, text: &str) {
        for c in text.chars() {
            ui.handle_action(Action::PromptChar(c));
        }
    }

    #[test]
    fn cursor_stops_at_edges() {
        let (mut ui, _rx) = ui();
        for _ in 0..10 {
            ui.handle_action(Action::MoveCursor { d_row: 1, d_col: 0 });
        }
        assert_eq!(ui.cursor.row(), 7);
    }

    #[test]
    fn save_prompt_saves_current_position() {
        let (mut ui, _rx) = ui();
        ui.handle_action(Action::OpenPrompt(PromptKind::SaveName));
        type_text(&mut ui, "Opening");
        ui.handle_action(Action::PromptSubmit);
        assert!(ui.prompt.is_none());
        assert_eq!(ui.app.saved().len(), 1);
        assert_eq!(ui.app.saved()[0].name, "Opening");
    }

    #[test]
    fn invalid_import_reports_reason() {
        let (mut ui, _rx) = ui();
        ui.handle_action(Action::OpenPrompt(PromptKind::ImportFen));
        type_text(&mut ui, "8/8/8/8/8/8/8/9");
        ui.handle_action(Action::PromptSubmit);
        let status = ui.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("rank 8"));
        assert_eq!(ui.app.position(), STARTING_FEN);
    }

    #[test]
    fn delete_keeps_selection_in_range() {
        let (mut ui, _rx) = ui();
        ui.app.save_current("a").unwrap();
        ui.app.save_current("b").unwrap();
        ui.handle_action(Action::SavedNext);
        ui.handle_action(Action::DeleteSelected);
        ui.handle_action(Action::ConfirmDelete);
        assert_eq!(ui.saved_index, 0);
        ui.handle_action(Action::DeleteSelected);
        ui.handle_action(Action::ConfirmDelete);
        assert!(ui.app.saved().is_empty());
        ui.handle_action(Action::LoadSelected);
        assert!(ui.status.unwrap().is_error);
    }

    #[test]
    fn delete_key_alone_only_asks() {
        let (mut ui, _rx) = ui();
        ui.app.save_current("precious").unwrap();
        let key = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        let action = map_key(key, false, false).unwrap();
        ui.handle_action(action);
        assert_eq!(ui.app.saved().len(), 1);
        assert_eq!(ui.pending_delete, Some(ui.app.saved()[0].id));
        assert!(ui.status.clone().unwrap().text.contains("precious"));
    }

    #[test]
    fn other_key_cancels_pending_delete() {
        let (mut ui, _rx) = ui();
        ui.app.save_current("kept").unwrap();
        ui.handle_action(Action::DeleteSelected);
        let key = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        ui.handle_action(map_confirm_key(key).unwrap());
        assert!(ui.pending_delete.is_none());
        assert_eq!(ui.app.saved().len(), 1);
        ui.handle_action(Action::ConfirmDelete);
        assert_eq!(ui.app.saved().len(), 1);
    }

    #[tokio::test]
    async fn late_recognition_does_not_undo_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        std::fs::write(&path, b"png").unwrap();

        let (mut ui, mut rx) = ui();
        ui.handle_action(Action::OpenPrompt(PromptKind::ImagePath));
        type_text(&mut ui, &path.display().to_string());
        ui.handle_action(Action::PromptSubmit);
        assert!(ui.app.is_recognizing());
        ui.handle_action(Action::Reset);

        let event = rx.recv().await.unwrap();
        ui.handle_background(event);
        assert_eq!(ui.app.position(), STARTING_FEN);
        assert_eq!(ui.status.unwrap().text, "Board reset");
    }

    #[tokio::test]
    async fn analysis_result_arrives_through_channel() {
        let (mut ui, mut rx) = ui();
        ui.handle_action(Action::Analyze);
        assert!(ui.app.is_analyzing());
        let event = rx.recv().await.unwrap();
        ui.handle_background(event);
        assert!(!ui.app.is_analyzing());
        assert_eq!(ui.app.analysis(), Some(&CannedAnalysis::result()));
    }

    #[tokio::test]
    async fn recognized_image_becomes_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        std::fs::write(&path, b"png").unwrap();

        let (mut ui, mut rx) = ui();
        ui.app.clear_board();
        assert_eq!(ui.app.position(), EMPTY_FEN);
        ui.handle_action(Action::OpenPrompt(PromptKind::ImagePath));
        type_text(&mut ui, &path.display().to_string());
        ui.handle_action(Action::PromptSubmit);

        let event = rx.recv().await.unwrap();
        ui.handle_background(event);
        assert_eq!(ui.app.position(), STUB_RECOGNIZED_FEN);
    }

    #[test]
    fn unsupported_image_is_rejected_before_recognition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.bmp");
        std::fs::write(&path, b"bmp").unwrap();

        let (mut ui, mut rx) = ui();
        ui.handle_action(Action::OpenPrompt(PromptKind::ImagePath));
        type_text(&mut ui, &path.display().to_string());
        ui.handle_action(Action::PromptSubmit);
        assert!(ui.status.clone().unwrap().is_error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn draw_does_not_panic() {
        let (mut ui, _rx) = ui();
        ui.handle_action(Action::OpenPrompt(PromptKind::ImportFen));
        let backend = ratatui::backend::TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui.draw(f)).unwrap();
    }
}
