#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

pub const DEFAULT_PAGE_EXTENSIONS: [&str; 2] = ["html", "htm"];

pub const DEFAULT_ARCHIVE_NAME: &str = "orders.zip";
