use crate::app::App;
use crate::ui::widgets::palette::category_color;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Pie chart plus its synchronized legend for the active sheet's category
/// counts.
pub fn render_category_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(sheet) = app.store.active_sheet() else {
        return;
    };

    if sheet.category_counts.is_empty() {
        let block = Block::default()
            .title("Categories")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let paragraph = Paragraph::new("No category data available\nfor visualization")
            .block(block)
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let legend_height = (sheet.category_counts.len() as u16).saturating_add(2);
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(legend_height)])
        .split(area);

    render_category_pie(app, f, split[0]);
    render_chart_legend(app, f, split[1]);
}

fn render_category_pie(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(sheet) = app.store.active_sheet() else {
        return;
    };

    let block = Block::default()
        .title("Category Distribution")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 4 || inner.height < 4 {
        return;
    }

    let size = inner.width.min(inner.height);
    let square = Rect {
        x: inner.x + (inner.width - size) / 2,
        y: inner.y + (inner.height - size) / 2,
        width: size,
        height: size,
    };

    let total: usize = sheet.category_counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return;
    }

    let slices: Vec<(f64, Color)> = sheet
        .category_counts
        .iter()
        .enumerate()
        .map(|(index, (category, count))| {
            (*count as f64 / total as f64, category_color(category, index))
        })
        .collect();

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let width = f64::from(square.width);
                let height = f64::from(square.height);
                let center_x = width / 2.0;
                let center_y = height / 2.0;
                let radius = width.min(height) / 2.0 * 0.9;

                // Slices start at 12 o'clock and sweep clockwise, painted as
                // dense fans of radial lines.
                let mut start = std::f64::consts::FRAC_PI_2;
                for (fraction, color) in &slices {
                    let sweep = fraction * 2.0 * std::f64::consts::PI;
                    let rays = ((fraction * 256.0) as usize).max(12);
                    for step in 0..=rays {
                        let angle = start - sweep * (step as f64 / rays as f64);
                        ctx.draw(&CanvasLine {
                            x1: center_x,
                            y1: center_y,
                            x2: angle.cos().mul_add(radius, center_x),
                            y2: angle.sin().mul_add(radius, center_y),
                            color: *color,
                        });
                    }
                    start -= sweep;
                }
            })
            .x_bounds([0.0, f64::from(square.width)])
            .y_bounds([0.0, f64::from(square.height)]),
        square,
    );
}

fn render_chart_legend(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(sheet) = app.store.active_sheet() else {
        return;
    };

    let total: usize = sheet.category_counts.iter().map(|(_, count)| count).sum();

    let lines: Vec<TextLine<'_>> = sheet
        .category_counts
        .iter()
        .enumerate()
        .map(|(index, (category, count))| {
            let color = category_color(category, index);
            let is_active = app.view.active_filter.as_deref() == Some(category.as_str());

            let percentage = if total > 0 {
                (*count as f64 / total as f64 * 100.0).round() as u64
            } else {
                0
            };

            let mut label = Style::default().fg(Color::White);
            let marker = if is_active {
                label = label.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                "▶ "
            } else {
                "  "
            };

            TextLine::from(vec![
                Span::raw(marker),
                Span::styled("■ ", Style::default().fg(color)),
                Span::styled(format!("Category {category}"), label),
                Span::styled(
                    format!("  {count} ({percentage}%)"),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let legend = Paragraph::new(lines).block(
        Block::default()
            .title("Legend")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(legend, area);
}
