//! Command-line surface. With no subcommand the binary starts the terminal UI;
//! each subcommand runs one operation against the same [`App`] and exits.

use crate::analysis::AnalysisProvider;
use crate::app::{App, AppError};
use crate::persistence::PersistenceBackend;
use crate::recognition::{ImageRecognizer, ImageUpload};
use crate::session::EditSession;
use anyhow::Context;
use chess::{decode, render_ascii, validate_fen, Piece, Square};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "board-editor", about = "Chess position viewer and editor")]
pub struct Cli {
    /// Keep saved positions in memory for this run only.
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// When omitted, the terminal UI starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a piece-placement field and report the first problem.
    Validate { fen: String },
    /// Print a placement as a text diagram (defaults to the starting position).
    Show {
        fen: Option<String>,
        /// Square to mark, e.g. e4.
        #[arg(long)]
        highlight: Option<Square>,
    },
    /// Put a piece on a square, or clear it when no piece is given.
    Place {
        fen: String,
        square: Square,
        #[arg(value_parser = parse_piece)]
        piece: Option<Piece>,
    },
    /// List saved positions.
    List,
    /// Save a position under a name.
    Save { name: String, fen: String },
    /// Print a saved position and its stored analysis.
    Load { id: u64 },
    /// Delete a saved position.
    Delete { id: u64 },
    /// Analyze a position.
    Analyze { fen: String },
    /// Detect a position from a board image.
    Recognize { image: PathBuf },
}

fn parse_piece(s: &str) -> Result<Piece, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Piece::from_symbol(c)
            .ok_or_else(|| format!("'{c}' is not a piece letter (use one of KQRBNPkqrbnp)")),
        _ => Err(format!("expected a single piece letter, got '{s}'")),
    }
}

/// Run one subcommand, writing its report to `out`.
pub async fn run_command<B, P, R, W>(
    command: Command,
    app: &mut App<B>,
    provider: &P,
    recognizer: &R,
    out: &mut W,
) -> anyhow::Result<()>
where
    B: PersistenceBackend,
    P: AnalysisProvider,
    R: ImageRecognizer,
    W: Write,
{
    match command {
        Command::Validate { fen } => {
            validate_fen(&fen)?;
            writeln!(out, "valid")?;
        }
        Command::Show { fen, highlight } => {
            let fen = fen.unwrap_or_else(|| app.position().to_string());
            write!(out, "{}", render_ascii(&decode(&fen), highlight))?;
        }
        Command::Place { fen, square, piece } => {
            validate_fen(&fen)?;
            let edit = EditSession::new()
                .toggle_edit_mode()
                .select_piece(piece)
                .click_square(&fen, square);
            let placed = edit.position.unwrap_or(fen);
            writeln!(out, "{placed}")?;
        }
        Command::List => {
            if app.saved().is_empty() {
                writeln!(out, "No saved positions")?;
            }
            for entry in app.saved() {
                write!(out, "{}\t{}\t{}", entry.id, entry.name, entry.fen)?;
                if let Some(analysis) = &entry.analysis {
                    write!(out, "\t{}", analysis.evaluation)?;
                }
                writeln!(out)?;
            }
        }
        Command::Save { name, fen } => {
            app.import_fen(&fen)?;
            let saved = app.save_current(&name)?;
            writeln!(out, "Saved '{}' as {}", saved.name, saved.id)?;
        }
        Command::Load { id } => {
            let entry = app.load_saved(id)?;
            writeln!(out, "{} ({})", entry.name, entry.fen)?;
            write!(out, "{}", render_ascii(&decode(&entry.fen), None))?;
            if let Some(analysis) = &entry.analysis {
                writeln!(out, "{analysis}")?;
            }
        }
        Command::Delete { id } => {
            if app.delete_saved(id)? {
                writeln!(out, "Deleted {id}")?;
            } else {
                writeln!(out, "{}", AppError::NotFound(id))?;
            }
        }
        Command::Analyze { fen } => {
            app.import_fen(&fen)?;
            app.analyze(provider).await?;
            if let Some(analysis) = app.analysis() {
                writeln!(out, "{analysis}")?;
            }
        }
        Command::Recognize { image } => {
            let upload = ImageUpload::from_path(&image)
                .with_context(|| format!("reading {}", image.display()))?;
            app.import_image(recognizer, &upload).await?;
            writeln!(out, "{}", app.position())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CannedAnalysis;
    use crate::persistence::InMemoryBackend;
    use crate::recognition::{StubRecognizer, STUB_RECOGNIZED_FEN};
    use chess::STARTING_FEN;
    use std::time::Duration;

    async fn run(app: &mut App<InMemoryBackend>, args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("board-editor").chain(args.iter().copied()))?;
        let command = cli.command.context("missing subcommand")?;
        let mut out = Vec::new();
        run_command(
            command,
            app,
            &CannedAnalysis::new(Duration::ZERO),
            &StubRecognizer::new(Duration::ZERO),
            &mut out,
        )
        .await?;
        Ok(String::from_utf8(out)?)
    }

    fn app() -> App<InMemoryBackend> {
        App::new(InMemoryBackend::new()).unwrap()
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["board-editor", "--no-persist"]).unwrap();
        assert!(cli.no_persist);
        assert!(cli.command.is_none());
    }

    #[tokio::test]
    async fn validate_reports_first_problem() {
        let mut app = app();
        assert_eq!(run(&mut app, &["validate", STARTING_FEN]).await.unwrap(), "valid\n");
        let err = run(&mut app, &["validate", "8/8/8"]).await.unwrap_err();
        assert!(err.to_string().contains("8 ranks"));
    }

    #[tokio::test]
    async fn place_puts_piece_and_clears() {
        let mut app = app();
        let out = run(&mut app, &["place", "8/8/8/8/8/8/8/8", "e4", "Q"]).await.unwrap();
        assert_eq!(out.trim(), "8/8/8/8/4Q3/8/8/8");
        let out = run(&mut app, &["place", STARTING_FEN, "0,0"]).await.unwrap();
        assert_eq!(out.trim(), "1nbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    }

    #[test]
    fn place_rejects_unknown_piece_letter() {
        let err = Cli::try_parse_from(["board-editor", "place", STARTING_FEN, "e4", "X"]).unwrap_err();
        assert!(err.to_string().contains("not a piece letter"));
    }

    #[tokio::test]
    async fn save_list_load_delete() {
        let mut app = app();
        let out = run(&mut app, &["save", "Empty", "8/8/8/8/8/8/8/8"]).await.unwrap();
        assert!(out.starts_with("Saved 'Empty' as "));
        let id = app.saved()[0].id;

        let listed = run(&mut app, &["list"]).await.unwrap();
        assert!(listed.contains("Empty\t8/8/8/8/8/8/8/8"));

        app.reset();
        let loaded = run(&mut app, &["load", &id.to_string()]).await.unwrap();
        assert!(loaded.starts_with("Empty (8/8/8/8/8/8/8/8)"));
        assert_eq!(app.position(), "8/8/8/8/8/8/8/8");

        let deleted = run(&mut app, &["delete", &id.to_string()]).await.unwrap();
        assert_eq!(deleted.trim(), format!("Deleted {id}"));
        let again = run(&mut app, &["delete", &id.to_string()]).await.unwrap();
        assert!(again.contains("No saved position"));
    }

    #[tokio::test]
    async fn save_rejects_invalid_fen() {
        let mut app = app();
        assert!(run(&mut app, &["save", "Bad", "8/8"]).await.is_err());
        assert!(app.saved().is_empty());
    }

    #[tokio::test]
    async fn analyze_prints_canned_result() {
        let mut app = app();
        let out = run(&mut app, &["analyze", STARTING_FEN]).await.unwrap();
        assert!(out.contains("Evaluation: +0.5"));
        assert!(out.contains("e2-e4"));
    }

    #[tokio::test]
    async fn recognize_imports_detected_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpeg").unwrap();
        let mut app = app();
        let out = run(&mut app, &["recognize", path.to_str().unwrap()]).await.unwrap();
        assert_eq!(out.trim(), STUB_RECOGNIZED_FEN);
    }
}
