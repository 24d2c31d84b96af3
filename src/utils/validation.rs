use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_paths(field_name: &str, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    for path in paths {
        validate_path(field_name, path)?;
    }
    Ok(())
}

/// 檢查每個值都在允許清單內（不分大小寫）
pub fn validate_one_of(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed.iter().copied().collect();

    for value in values {
        if !allowed_set.contains(value.to_ascii_lowercase().as_str()) {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Unsupported value. Allowed: {}", allowed.join(", ")),
            });
        }
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension) {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

/// 副檔名寫法為 `html`，不含前導點或路徑分隔符
pub fn validate_extension_names(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    for extension in extensions {
        let reason = if extension.trim().is_empty() {
            "Extension cannot be empty"
        } else if extension.starts_with('.') {
            "Write extensions without the leading dot, e.g. \"html\""
        } else if extension.contains(['/', '\\', '*']) {
            "Extension must be a bare name, not a path or glob"
        } else {
            continue;
        };
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: extension.clone(),
            reason: reason.to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("load.output_path", "./output").is_ok());
        assert!(validate_path("load.output_path", "").is_err());
        assert!(validate_path("load.output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_paths_requires_at_least_one() {
        assert!(matches!(
            validate_paths("source.inputs", &[]),
            Err(EtlError::MissingConfigError { .. })
        ));
        assert!(validate_paths("source.inputs", &["pages".to_string()]).is_ok());
    }

    #[test]
    fn test_validate_one_of() {
        let formats = vec!["csv".to_string(), "JSON".to_string()];
        assert!(validate_one_of("load.output_formats", &formats, &["csv", "tsv", "json"]).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_one_of("load.output_formats", &invalid, &["csv", "tsv", "json"]).is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["order.html".to_string(), "list.htm".to_string()];
        assert!(validate_file_extensions("address_sheet", &files, &["html", "htm"]).is_ok());

        let invalid_files = vec!["order.txt".to_string()];
        assert!(validate_file_extensions("address_sheet", &invalid_files, &["html", "htm"]).is_err());
    }

    #[test]
    fn test_validate_extension_names() {
        let plain = vec!["html".to_string(), "htm".to_string()];
        assert!(validate_extension_names("source.extensions", &plain).is_ok());

        assert!(matches!(
            validate_extension_names("source.extensions", &[]),
            Err(EtlError::MissingConfigError { .. })
        ));
        for bad in [".html", "", "pages/*.html"] {
            assert!(matches!(
                validate_extension_names("source.extensions", &[bad.to_string()]),
                Err(EtlError::InvalidConfigValueError { .. })
            ));
        }
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("pipeline.name", "orders").is_ok());
        assert!(validate_non_empty_string("pipeline.name", "   ").is_err());
    }
}
