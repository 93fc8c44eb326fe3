use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

/// Full-screen error view shown exclusively when the last load failed.
pub fn render_error_view(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(70, 50, f.area());

    let block = Block::default()
        .title(" Data Load Failed ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    if app.store.is_loading() {
        let throbber = Throbber::default()
            .label("Retrying...")
            .style(Style::default().fg(Color::Cyan));
        f.render_widget(throbber, chunks[0]);
    }

    let message = app
        .store
        .last_error()
        .unwrap_or("Unknown error")
        .to_string();
    let body = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(body, chunks[1]);

    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let hint = Paragraph::new(TextLine::from(vec![
        Span::styled("r", key),
        Span::raw(": Retry   "),
        Span::styled("q", key),
        Span::raw(": Quit"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}
