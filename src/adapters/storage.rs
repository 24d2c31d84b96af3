use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn list_files(&self, path: &str, extensions: &[String]) -> Result<Option<Vec<String>>> {
        let full_path = Path::new(&self.base_path).join(path);
        if !full_path.is_dir() {
            return Ok(None);
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&full_path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let matches = Path::new(&file_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
                .unwrap_or(false);

            if matches {
                // 回傳相對於 base_path 的路徑，之後可直接交給 read_file
                files.push(Path::new(path).join(&file_name).to_string_lossy().into_owned());
            }
        }

        files.sort();
        Ok(Some(files))
    }
}
