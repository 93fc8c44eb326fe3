// App module for sheetdeck
// Handles application state and input dispatch

pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, Notice, ViewState};
