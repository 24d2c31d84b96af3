use crate::domain::model::{PageKind, PageSource, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 列出目錄下符合副檔名的檔案，依名稱排序；路徑不是目錄時回傳 None
    fn list_files(
        &self,
        path: &str,
        extensions: &[String],
    ) -> impl std::future::Future<Output = Result<Option<Vec<String>>>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorPolicy {
    Skip,
    Fail,
}

pub trait ConfigProvider: Send + Sync {
    fn input_paths(&self) -> &[String];
    fn input_extensions(&self) -> Vec<String>;
    fn page_kind(&self) -> PageKind;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<String>;
    fn compress_output(&self) -> bool;
    fn archive_name(&self) -> String;
    fn on_parse_error(&self) -> ParseErrorPolicy;
    fn manifest_overrides(&self) -> HashMap<String, String>;
    fn address_sheet(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PageSource>>;
    async fn transform(&self, pages: Vec<PageSource>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
