use crate::ui::input::Prompt;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Centered single-line text prompt.
pub struct PromptWidget<'a> {
    pub prompt: &'a Prompt,
}

impl Widget for PromptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 72.min(area.width);
        let height = 3.min(area.height);
        let dialog = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        };
        Clear.render(dialog, buf);

        let text = if self.prompt.buffer.is_empty() {
            Span::styled(self.prompt.kind.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                format!("{}_", self.prompt.buffer),
                Style::default().fg(Color::White),
            )
        };

        Paragraph::new(Line::from(vec![text]))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .title(self.prompt.kind.title())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .style(Style::default().bg(Color::Black)),
            )
            .render(dialog, buf);
    }
}
