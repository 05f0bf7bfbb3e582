//! Small building blocks shared by the form screens.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

/// Single-line text input.
#[derive(Debug, Clone)]
pub struct TextField {
    label: &'static str,
    value: String,
    masked: bool,
}

impl TextField {
    /// Plain text input.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    /// Input that renders as bullets.
    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    /// Current contents.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Appends a character.
    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    /// Removes the last character.
    pub fn pop(&mut self) {
        self.value.pop();
    }

    /// What the field shows on screen.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Column offset of the cursor inside the field.
    pub fn cursor_offset(&self) -> u16 {
        u16::try_from(self.display().width()).unwrap_or(u16::MAX)
    }

    /// Draws the field and places the cursor when focused.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(self.display()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(self.label),
        );
        frame.render_widget(input, area);
        if focused {
            let x = area
                .x
                .saturating_add(1)
                .saturating_add(self.cursor_offset())
                .min(area.right().saturating_sub(2));
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

/// Checklist lines for password rules and other pass/fail hints.
pub fn checklist(items: &[(&'static str, bool)]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|(label, ok)| {
            let (mark, color) = if *ok {
                ("✓", Color::Green)
            } else {
                ("✗", Color::Red)
            };
            Line::styled(format!("{} {}", mark, label), Style::default().fg(color))
        })
        .collect()
}

/// Rectangle of `width` columns and `height` rows centered in `area`.
pub fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width.min(area.width)),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_field_hides_input() {
        let mut field = TextField::masked("Password");
        for c in "héllo".chars() {
            field.push(c);
        }
        assert_eq!(field.display(), "•••••");
        assert_eq!(field.value(), "héllo");
        field.pop();
        assert_eq!(field.value(), "héll");
    }

    #[test]
    fn test_cursor_offset_uses_display_width() {
        let mut field = TextField::new("Name");
        for c in "東京".chars() {
            field.push(c);
        }
        assert_eq!(field.cursor_offset(), 4);
    }

    #[test]
    fn test_center_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let centered = center_rect(60, 20, area);
        assert_eq!(centered.width, 60);
        assert_eq!(centered.height, 20);
        assert_eq!(centered.x, 20);
        assert_eq!(centered.y, 10);
    }
}
