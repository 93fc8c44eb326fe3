pub mod loop_handler;

pub use loop_handler::{record_count_text, run, run_headless};
