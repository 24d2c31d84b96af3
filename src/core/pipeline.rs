use crate::core::address_sheet::{fill_address_column, listings_to_delimited};
use crate::core::assembler::assemble;
use crate::core::manifest::Manifest;
use crate::core::markup::MarkupDocument;
use crate::core::multi_address::extract_all;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{AddressListing, OrderRecord, PageKind, PageSource, TransformResult};
use crate::domain::ports::ParseErrorPolicy;
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Reads saved order pages, extracts them and writes the manifest (detail
/// pages) or the address list (list pages).
pub struct ManifestPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    manifest: Manifest,
}

impl<S: Storage, C: ConfigProvider> ManifestPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let manifest = Manifest::with_overrides(config.manifest_overrides())?;
        Ok(Self {
            storage,
            config,
            manifest,
        })
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }

    /// 解析失敗時依設定決定略過或中止
    fn handle_page_error(
        &self,
        page: &PageSource,
        error: EtlError,
        skipped: &mut Vec<String>,
    ) -> Result<()> {
        match (&error, self.config.on_parse_error()) {
            (EtlError::MarkupError { .. }, ParseErrorPolicy::Skip) => {
                tracing::warn!("⚠️ Skipping page {}: {}", page.name, error);
                skipped.push(page.name.clone());
                Ok(())
            }
            _ => Err(error),
        }
    }

    fn transform_detail(&self, pages: &[PageSource]) -> Result<TransformResult> {
        let mut records = Vec::new();
        let mut skipped_pages = Vec::new();

        for page in pages {
            match extract_order(page) {
                Ok(record) => {
                    if record.is_empty() {
                        tracing::warn!(
                            "Page {} did not match the order-detail layout, record is empty",
                            page.name
                        );
                    }
                    for (field, value) in record.fields() {
                        tracing::debug!("{}: {}", field.label(), value);
                    }
                    records.push(record);
                }
                Err(e) => self.handle_page_error(page, e, &mut skipped_pages)?,
            }
        }

        Ok(TransformResult {
            csv_output: self.manifest.to_delimited(&records, b',')?,
            tsv_output: self.manifest.to_delimited(&records, b'\t')?,
            records,
            listings: Vec::new(),
            skipped_pages,
        })
    }

    fn transform_list(&self, pages: &[PageSource]) -> Result<TransformResult> {
        let mut listings = Vec::new();
        let mut skipped_pages = Vec::new();

        for page in pages {
            match extract_addresses(page) {
                Ok(addresses) => {
                    tracing::debug!("Found {} addresses in {}", addresses.len(), page.name);
                    for address in addresses {
                        listings.push(AddressListing {
                            source: page.name.clone(),
                            index: listings.len() + 1,
                            address,
                        });
                    }
                }
                Err(e) => self.handle_page_error(page, e, &mut skipped_pages)?,
            }
        }

        Ok(TransformResult {
            csv_output: listings_to_delimited(&listings, b',')?,
            tsv_output: listings_to_delimited(&listings, b'\t')?,
            records: Vec::new(),
            listings,
            skipped_pages,
        })
    }

    fn json_output(&self, result: &TransformResult) -> Result<String> {
        let mut payload = serde_json::Map::new();
        payload.insert(
            "generated_at".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
        payload.insert(
            "page_kind".to_string(),
            serde_json::Value::String(self.config.page_kind().to_string()),
        );
        payload.insert(
            "skipped_pages".to_string(),
            serde_json::to_value(&result.skipped_pages)?,
        );
        match self.config.page_kind() {
            PageKind::Detail => {
                payload.insert("records".to_string(), serde_json::to_value(&result.records)?)
            }
            PageKind::List => {
                payload.insert("addresses".to_string(), serde_json::to_value(&result.listings)?)
            }
        };
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(payload))?)
    }

    async fn update_address_sheet(&self, listings: &[AddressListing]) -> Result<()> {
        let Some(sheet_path) = self.config.address_sheet() else {
            return Ok(());
        };

        let sheet = self.storage.read_file(sheet_path).await?;
        let addresses: Vec<String> = listings.iter().map(|l| l.address.clone()).collect();
        let (updated_sheet, updated) = fill_address_column(&sheet, &addresses)?;
        self.storage
            .write_file(sheet_path, updated_sheet.as_bytes())
            .await?;

        tracing::info!("📝 Updated {} addresses in {}", updated, sheet_path);
        Ok(())
    }
}

fn extract_order(page: &PageSource) -> Result<OrderRecord> {
    let doc = MarkupDocument::parse_named(&page.name, page.markup()?)?;
    assemble(&doc)
}

fn extract_addresses(page: &PageSource) -> Result<Vec<String>> {
    let doc = MarkupDocument::parse_named(&page.name, page.markup()?)?;
    extract_all(&doc)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ManifestPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<PageSource>> {
        let extensions = self.config.input_extensions();
        let mut pages = Vec::new();

        for input in self.config.input_paths() {
            let files = match self.storage.list_files(input, &extensions).await? {
                Some(files) => {
                    if files.is_empty() {
                        tracing::warn!("No page files found in directory {}", input);
                    }
                    files
                }
                None => vec![input.clone()],
            };

            for file in files {
                tracing::debug!("Reading page: {}", file);
                let content = self.storage.read_file(&file).await?;
                pages.push(PageSource::new(file, content));
            }
        }

        tracing::info!("📥 Loaded {} {} pages", pages.len(), self.config.page_kind());
        Ok(pages)
    }

    async fn transform(&self, pages: Vec<PageSource>) -> Result<TransformResult> {
        let result = match self.config.page_kind() {
            PageKind::Detail => self.transform_detail(&pages)?,
            PageKind::List => self.transform_list(&pages)?,
        };

        if !result.skipped_pages.is_empty() {
            tracing::warn!("Skipped {} unparseable pages", result.skipped_pages.len());
        }
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let stem = match self.config.page_kind() {
            PageKind::Detail => "manifest",
            PageKind::List => "addresses",
        };

        let mut outputs: Vec<(String, String)> = Vec::new();
        for format in self.config.output_formats() {
            match format.to_ascii_lowercase().as_str() {
                "csv" => outputs.push((format!("{}.csv", stem), result.csv_output.clone())),
                "tsv" => outputs.push((format!("{}.tsv", stem), result.tsv_output.clone())),
                "json" => outputs.push((format!("{}.json", stem), self.json_output(&result)?)),
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Supported formats: csv, tsv, json".to_string(),
                    })
                }
            }
        }

        if self.config.page_kind() == PageKind::List {
            self.update_address_sheet(&result.listings).await?;
        }

        if self.config.compress_output() {
            let archive_path = self.output_file(&self.config.archive_name());
            tracing::debug!("Creating ZIP file with {} files", outputs.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, content) in &outputs {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }
                zip.finish()?.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive_path, &zip_data).await?;
            return Ok(archive_path);
        }

        for (name, content) in &outputs {
            let path = self.output_file(name);
            tracing::debug!("Writing {} ({} bytes)", path, content.len());
            self.storage.write_file(&path, content.as_bytes()).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
