use crate::auth::User;
use crate::persistence::SavedPosition;
use crate::session::EditSession;
use chess::{Analysis, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Position info, analysis and the saved-positions list.
pub struct SidePanel<'a> {
    pub fen: &'a str,
    pub session: &'a EditSession,
    pub analysis: Option<&'a Analysis>,
    pub analyzing: bool,
    pub saved: &'a [SavedPosition],
    pub saved_index: usize,
    pub user: Option<&'a User>,
}

impl SidePanel<'_> {
    fn info_lines(&self) -> Vec<Line<'_>> {
        let label = Style::default().fg(Color::DarkGray);
        let user = match self.user {
            Some(user) => Span::styled(user.name.clone(), Style::default().fg(Color::Green)),
            None => Span::styled("not signed in", label),
        };
        let mode = if self.session.is_editing() {
            Span::styled("editing", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            Span::raw("viewing")
        };
        let piece = match self.session.selected_piece() {
            Some(p) => format!("{} {} ({})", p.color, p.kind.name(), p.symbol()),
            None => "eraser".to_string(),
        };
        let square = self
            .session
            .selected_square()
            .map(|s| s.to_algebraic())
            .unwrap_or_else(|| "-".to_string());

        let mut lines = vec![
            Line::from(vec![Span::styled("User:   ", label), user]),
            Line::from(vec![Span::styled("Mode:   ", label), mode]),
            Line::from(vec![Span::styled("Piece:  ", label), Span::raw(piece)]),
        ];
        if self.session.is_editing() {
            let selected = self.session.selected_piece();
            let mut palette = vec![Span::styled("Keys:   ", label)];
            for p in Piece::all() {
                let style = if selected == Some(p) {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default()
                };
                palette.push(Span::styled(p.symbol().to_string(), style));
                palette.push(Span::raw(" "));
            }
            lines.push(Line::from(palette));
        } else {
            lines.push(Line::from(vec![Span::styled("Square: ", label), Span::raw(square)]));
        }
        lines.push(Line::from(vec![Span::styled("FEN:    ", label), Span::raw(self.fen)]));
        lines
    }

    fn analysis_lines(&self) -> Vec<Line<'_>> {
        if self.analyzing {
            return vec![Line::from(Span::styled(
                "Analyzing...",
                Style::default().fg(Color::Yellow),
            ))];
        }
        let Some(analysis) = self.analysis else {
            return vec![Line::from(Span::styled(
                "Press 'a' to analyze",
                Style::default().fg(Color::DarkGray),
            ))];
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Eval: "),
                Span::styled(
                    analysis.evaluation.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("   Best: "),
                Span::styled(analysis.best_move.as_str(), Style::default().fg(Color::Green)),
            ]),
            Line::from(""),
        ];
        for line in &analysis.top_moves {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<7}", line.mv), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{:>6}  ", line.eval)),
                Span::styled(line.pv.as_str(), Style::default().fg(Color::DarkGray)),
            ]));
        }
        lines
    }

    fn saved_lines(&self) -> Vec<Line<'_>> {
        if self.saved.is_empty() {
            return vec![Line::from(Span::styled(
                "No saved positions yet. Press 's' to save one.",
                Style::default().fg(Color::DarkGray),
            ))];
        }
        self.saved
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let selected = idx == self.saved_index;
                let marker = if selected { "> " } else { "  " };
                let style = if selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                let mut spans = vec![Span::styled(format!("{marker}{}", entry.name), style)];
                if let Some(analysis) = &entry.analysis {
                    spans.push(Span::styled(
                        format!("  eval {}", analysis.evaluation),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for SidePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Min(4),
            ])
            .split(area);

        Paragraph::new(self.info_lines())
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Position ").borders(Borders::ALL))
            .render(chunks[0], buf);

        Paragraph::new(self.analysis_lines())
            .block(Block::default().title(" Analysis ").borders(Borders::ALL))
            .render(chunks[1], buf);

        let title = format!(" Saved ({}) ", self.saved.len());
        Paragraph::new(self.saved_lines())
            .block(Block::default().title(title).borders(Borders::ALL))
            .render(chunks[2], buf);
    }
}
