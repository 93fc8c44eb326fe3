// UI module for sheetdeck
// Pure rendering over (application state, view state); no data mutation

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

/// Top-level render dispatch: a load error owns the whole screen, an empty
/// sheet set owns it next, otherwise the dashboard renders.
pub fn ui(app: &App, f: &mut Frame<'_>) {
    if app.store.last_error().is_some() {
        screens::error::render_error_view(app, f);
    } else if app.store.is_empty() {
        screens::empty::render_empty_view(app, f);
    } else {
        screens::dashboard::render_dashboard(app, f);
    }

    if app.show_help {
        widgets::popup::render_help_popup(f);
    }
}
