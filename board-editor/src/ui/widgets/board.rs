use crate::session::EditSession;
use chess::{Cell, PieceColor, PieceKind, Placement, Square};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

const RANK_LABEL_WIDTH: u16 = 3;
const MAX_SQUARE_WIDTH: u16 = 9;
const MAX_SQUARE_HEIGHT: u16 = 4;

#[derive(Clone, Copy, PartialEq, Eq)]
enum SquareHighlight {
    Cursor,
    Selected,
    None,
}

impl SquareHighlight {
    fn bg_color(self, is_light_square: bool) -> Color {
        let (light, dark) = match self {
            Self::Cursor => (Color::LightCyan, Color::Cyan),
            Self::Selected => (Color::LightYellow, Color::Yellow),
            Self::None => (Color::Rgb(240, 217, 181), Color::Rgb(181, 136, 99)),
        };
        if is_light_square {
            light
        } else {
            dark
        }
    }
}

/// Draws a placement. Malformed placements render what they have; squares
/// missing from a ragged grid are drawn empty.
pub struct BoardWidget<'a> {
    pub placement: &'a Placement,
    pub session: &'a EditSession,
    pub cursor: Square,
}

impl<'a> BoardWidget<'a> {
    pub fn new(placement: &'a Placement, session: &'a EditSession, cursor: Square) -> Self {
        Self {
            placement,
            session,
            cursor,
        }
    }

    fn highlight(&self, square: Square) -> SquareHighlight {
        if square == self.cursor {
            SquareHighlight::Cursor
        } else if !self.session.is_editing() && self.session.selected_square() == Some(square) {
            SquareHighlight::Selected
        } else {
            SquareHighlight::None
        }
    }
}

fn glyph(cell: Cell) -> Option<(char, Color)> {
    match cell {
        Cell::Empty => None,
        Cell::Symbol(c) => match cell.piece() {
            Some(piece) => {
                let glyph = match piece.kind {
                    PieceKind::King => '♚',
                    PieceKind::Queen => '♛',
                    PieceKind::Rook => '♜',
                    PieceKind::Bishop => '♝',
                    PieceKind::Knight => '♞',
                    PieceKind::Pawn => '♟',
                };
                let color = match piece.color {
                    PieceColor::White => Color::White,
                    PieceColor::Black => Color::Black,
                };
                Some((glyph, color))
            }
            // Unknown symbols from malformed input are shown verbatim.
            None => Some((c, Color::Red)),
        },
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.session.is_editing() {
            " Board [EDITING] "
        } else {
            " Board "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.session.is_editing() {
                Color::Yellow
            } else {
                Color::Cyan
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        let square_width =
            (inner.width.saturating_sub(RANK_LABEL_WIDTH) / 8).clamp(1, MAX_SQUARE_WIDTH);
        let square_height = (inner.height.saturating_sub(1) / 8).clamp(1, MAX_SQUARE_HEIGHT);

        let board_width = square_width * 8 + RANK_LABEL_WIDTH;
        let board_height = square_height * 8 + 1;
        let offset_x = inner.width.saturating_sub(board_width) / 2;
        let offset_y = inner.height.saturating_sub(board_height) / 2;
        let board_x = inner.x + offset_x + RANK_LABEL_WIDTH;
        let board_y = inner.y + offset_y;

        for row in 0..8u8 {
            let label_y = board_y + row as u16 * square_height + square_height / 2;
            if label_y < inner.bottom() {
                buf.set_string(
                    board_x.saturating_sub(2),
                    label_y,
                    format!("{}", 8 - row),
                    Style::default().fg(Color::Yellow),
                );
            }

            for col in 0..8u8 {
                let Some(square) = Square::new(row, col) else {
                    continue;
                };
                let x0 = board_x + col as u16 * square_width;
                let y0 = board_y + row as u16 * square_height;
                let bg = self.highlight(square).bg_color(square.is_light());

                for dy in 0..square_height {
                    for dx in 0..square_width {
                        let (x, y) = (x0 + dx, y0 + dy);
                        if x < inner.right() && y < inner.bottom() {
                            buf.set_string(x, y, " ", Style::default().bg(bg));
                        }
                    }
                }

                if let Some((symbol, fg)) = self.placement.get(square).and_then(glyph) {
                    let x = x0 + square_width / 2;
                    let y = y0 + square_height / 2;
                    if x < inner.right() && y < inner.bottom() {
                        buf.set_string(
                            x,
                            y,
                            symbol.to_string(),
                            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
                        );
                    }
                }
            }
        }

        let files_y = board_y + 8 * square_height;
        if files_y < inner.bottom() {
            for (col, file) in ('a'..='h').enumerate() {
                let x = board_x + col as u16 * square_width + square_width / 2;
                if x < inner.right() {
                    buf.set_string(x, files_y, file.to_string(), Style::default().fg(Color::Yellow));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{decode, STARTING_FEN};

    fn render(fen: &str, session: &EditSession) -> Buffer {
        let placement = decode(fen);
        let area = Rect::new(0, 0, 60, 30);
        let mut buf = Buffer::empty(area);
        let cursor = Square::from_algebraic("e4").unwrap();
        BoardWidget::new(&placement, session, cursor).render(area, &mut buf);
        buf
    }

    fn contains(buf: &Buffer, needle: &str) -> bool {
        let area = buf.area;
        (area.top()..area.bottom()).any(|y| {
            let line: String = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect();
            line.contains(needle)
        })
    }

    #[test]
    fn renders_pieces_and_labels() {
        let buf = render(STARTING_FEN, &EditSession::new());
        assert!(contains(&buf, "Board"));
        assert!(contains(&buf, "♛"));
        assert!(contains(&buf, "8"));
    }

    #[test]
    fn title_shows_editing() {
        let session = EditSession::new().toggle_edit_mode();
        let buf = render(STARTING_FEN, &session);
        assert!(contains(&buf, "EDITING"));
    }

    #[test]
    fn malformed_placement_does_not_panic() {
        let buf = render("x/pppppppppppp/9", &EditSession::new());
        assert!(contains(&buf, "x"));
    }
}
