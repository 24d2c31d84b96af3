use crate::config::{DEFAULT_ARCHIVE_NAME, DEFAULT_PAGE_EXTENSIONS, SUPPORTED_FORMATS};
use crate::core::manifest::Manifest;
use crate::core::ConfigProvider;
use crate::domain::model::PageKind;
use crate::domain::ports::ParseErrorPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "order-etl")]
#[command(about = "Extract shipping data from saved order pages into a logistics manifest")]
pub struct CliConfig {
    /// Saved page files or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// detail: one order per page; list: every address widget on the page
    #[arg(long, default_value = "detail")]
    pub page_kind: PageKind,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle all outputs into one zip archive")]
    pub zip: bool,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    #[arg(long, help = "Abort on the first unparseable page instead of skipping it")]
    pub fail_fast: bool,

    /// Override a manifest default, e.g. --set 英文品名1=ballet-dress
    #[arg(long = "set", value_parser = parse_key_value)]
    pub defaults: Vec<(String, String)>,

    /// CSV sheet whose 配送地址 column is filled in list mode
    #[arg(long)]
    pub address_sheet: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=VALUE, got '{}'", raw))?;
    Ok((key.trim().to_string(), value.to_string()))
}

impl ConfigProvider for CliConfig {
    fn input_paths(&self) -> &[String] {
        &self.inputs
    }

    fn input_extensions(&self) -> Vec<String> {
        DEFAULT_PAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    fn page_kind(&self) -> PageKind {
        self.page_kind
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Vec<String> {
        self.formats.clone()
    }

    fn compress_output(&self) -> bool {
        self.zip
    }

    fn archive_name(&self) -> String {
        self.archive_name.clone()
    }

    fn on_parse_error(&self) -> ParseErrorPolicy {
        if self.fail_fast {
            ParseErrorPolicy::Fail
        } else {
            ParseErrorPolicy::Skip
        }
    }

    fn manifest_overrides(&self) -> HashMap<String, String> {
        self.defaults.iter().cloned().collect()
    }

    fn address_sheet(&self) -> Option<&str> {
        self.address_sheet.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_paths("inputs", &self.inputs)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_one_of("formats", &self.formats, &SUPPORTED_FORMATS)?;
        validation::validate_non_empty_string("archive_name", &self.archive_name)?;

        if let Some(sheet) = &self.address_sheet {
            validation::validate_file_extensions("address_sheet", &[sheet.clone()], &["csv"])?;
        }

        Manifest::with_overrides(self.manifest_overrides())?;
        Ok(())
    }
}
