use clap::Parser;
use color_eyre::Result;
use sheetdeck::app::App;
use sheetdeck::cli::CliArgs;
use sheetdeck::config;
use sheetdeck::data::{DataStore, Fetcher};
use sheetdeck::{event, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = config::init_app_config()?;
    let fetcher = Fetcher::new(&config)?;
    if config::debug_enabled() {
        eprintln!("Fetching sheet data from {}", fetcher.url());
    }

    let mut app = App::new(DataStore::new(config.category_column.clone()));

    if args.headless {
        return event::run_headless(&mut app, &fetcher, args.json).await;
    }

    if !is_terminal() {
        return Err(color_eyre::eyre::eyre!(
            "stdout is not a terminal; use --headless for plain output"
        ));
    }

    // Initial load; a failure lands on the error view with a retry key
    if !app.store.load_all(&fetcher).await {
        eprintln!("Initial data load failed; starting on the error view");
    }

    let mut terminal = terminal::setup_terminal()?;

    let result = event::run(&mut terminal, &mut app, &fetcher).await;

    terminal::cleanup_terminal_state(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
