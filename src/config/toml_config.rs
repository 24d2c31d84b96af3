use crate::config::{DEFAULT_ARCHIVE_NAME, DEFAULT_PAGE_EXTENSIONS, SUPPORTED_FORMATS};
use crate::core::manifest::Manifest;
use crate::core::ConfigProvider;
use crate::domain::model::PageKind;
use crate::domain::ports::ParseErrorPolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub manifest: Option<ManifestConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub inputs: Vec<String>,
    pub extensions: Option<Vec<String>>,
    pub page_kind: Option<PageKind>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    /// "skip"（預設）或 "fail"
    pub on_parse_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub address_sheet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// 欄位標題 -> 固定值
    #[serde(default)]
    pub defaults: HashMap<String, String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_paths("source.inputs", &self.source.inputs)?;
        if let Some(extensions) = &self.source.extensions {
            validate_extension_names("source.extensions", extensions)?;
        }
        validate_path("load.output_path", &self.load.output_path)?;
        validate_one_of("load.output_formats", &self.load.output_formats, &SUPPORTED_FORMATS)?;

        if let Some(policy) = &self.transform.on_parse_error {
            validate_one_of(
                "transform.on_parse_error",
                std::slice::from_ref(policy),
                &["skip", "fail"],
            )?;
        }

        if let Some(sheet) = &self.load.address_sheet {
            validate_file_extensions("load.address_sheet", std::slice::from_ref(sheet), &["csv"])?;
        }

        Manifest::with_overrides(self.manifest_overrides())?;
        Ok(())
    }

    /// 是否啟用 ZIP 打包
    pub fn compression_enabled(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_paths(&self) -> &[String] {
        &self.source.inputs
    }

    fn input_extensions(&self) -> Vec<String> {
        self.source.extensions.clone().unwrap_or_else(|| {
            DEFAULT_PAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect()
        })
    }

    fn page_kind(&self) -> PageKind {
        self.source.page_kind.unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<String> {
        self.load.output_formats.clone()
    }

    fn compress_output(&self) -> bool {
        self.compression_enabled()
    }

    fn archive_name(&self) -> String {
        self.load
            .compression
            .as_ref()
            .and_then(|c| c.filename.clone())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
    }

    fn on_parse_error(&self) -> ParseErrorPolicy {
        match self.transform.on_parse_error.as_deref() {
            Some(policy) if policy.eq_ignore_ascii_case("fail") => ParseErrorPolicy::Fail,
            _ => ParseErrorPolicy::Skip,
        }
    }

    fn manifest_overrides(&self) -> HashMap<String, String> {
        self.manifest
            .as_ref()
            .map(|m| m.defaults.clone())
            .unwrap_or_default()
    }

    fn address_sheet(&self) -> Option<&str> {
        self.load.address_sheet.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
