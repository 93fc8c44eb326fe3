use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "sheetdeck", version, about = "Spreadsheet dashboard TUI")]
pub struct CliArgs {
    /// Print sheet stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the sheet data endpoint URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Override the category column name
    #[arg(long = "category-column", value_name = "NAME")]
    pub category_column: Option<String>,

    /// Override the fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.url {
            std::env::set_var("SHEET_API_URL", url);
        }
        if let Some(column) = &self.category_column {
            std::env::set_var("CATEGORY_COLUMN", column);
        }
        if let Some(secs) = self.timeout {
            std::env::set_var("FETCH_TIMEOUT_SECS", secs.to_string());
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
