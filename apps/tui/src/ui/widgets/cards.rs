use crate::app::App;
use crate::ui::widgets::palette::category_color;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// At most this many cards fit a row legibly; further categories still show
/// in the chart legend.
const MAX_CARDS: usize = 8;

/// One card per category with count and share of total; a single aggregate
/// card when the sheet has no category column.
pub fn render_summary_cards(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(sheet) = app.store.active_sheet() else {
        return;
    };

    if sheet.category_counts.is_empty() {
        let card = Paragraph::new(Text::from(vec![
            TextLine::from(Span::styled(
                sheet.record_count().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            TextLine::from(Span::styled(
                "Total Records",
                Style::default().fg(Color::Gray),
            )),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(card, area);
        return;
    }

    let shown = sheet.category_counts.len().min(MAX_CARDS);
    let constraints = vec![Constraint::Ratio(1, shown as u32); shown];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let total = sheet.record_count();
    for (index, (category, count)) in sheet.category_counts.iter().take(shown).enumerate() {
        let color = category_color(category, index);
        let is_active = app.view.active_filter.as_deref() == Some(category.as_str());

        let percentage = if total > 0 {
            (*count as f64 / total as f64 * 100.0).round() as u64
        } else {
            0
        };

        let mut border = Style::default().fg(color);
        let mut label = Style::default().fg(Color::Gray);
        if is_active {
            border = border.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            label = label.fg(Color::White);
        }

        let card = Paragraph::new(Text::from(vec![
            TextLine::from(Span::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            TextLine::from(Span::styled(format!("Category {category}"), label)),
            TextLine::from(Span::styled(
                format!("{percentage}% of total"),
                Style::default().fg(Color::DarkGray),
            )),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));

        f.render_widget(card, slots[index]);
    }
}
