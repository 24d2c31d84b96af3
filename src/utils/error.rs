use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Markup could not be parsed ({source_name}): {message}")]
    MarkupError { source_name: String, message: String },

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Extraction,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn markup(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        EtlError::MarkupError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::MarkupError { .. } | EtlError::IoError(_) => ErrorCategory::Input,
            EtlError::SelectorError { .. }
            | EtlError::ProcessingError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Extraction,
            EtlError::ZipError(_) | EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ValidationError { .. } => ErrorSeverity::Low,
            EtlError::MarkupError { .. } => ErrorSeverity::Medium,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ProcessingError { .. }
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_) => ErrorSeverity::High,
            // 選擇器是固定的 static，解析失敗代表程式本身有問題
            EtlError::SelectorError { .. } | EtlError::IoError(_) | EtlError::ZipError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "檢查命令列參數或 TOML 設定檔的欄位與數值"
            }
            ErrorCategory::Input => match self {
                EtlError::MarkupError { .. } => {
                    "重新儲存訂單頁面的 HTML，確認檔案不是空白或損毀"
                }
                _ => "確認輸入路徑存在且有讀取權限",
            },
            ErrorCategory::Extraction => "確認頁面結構是否變更，必要時調整 selectors 常數",
            ErrorCategory::Output => "確認輸出目錄可寫入且磁碟空間足夠",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MarkupError { source_name, .. } => {
                format!("無法解析頁面內容: {}", source_name)
            }
            EtlError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值無效 ({}): {}", field, reason)
            }
            EtlError::IoError(e) => format!("檔案讀寫失敗: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
