use crate::domain::model::{OrderField, OrderRecord};
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Field(OrderField),
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestColumn {
    pub label: &'static str,
    pub source: ColumnSource,
}

const fn field(field: OrderField) -> ManifestColumn {
    ManifestColumn {
        label: field.label(),
        source: ColumnSource::Field(field),
    }
}

const fn literal(label: &'static str, value: &'static str) -> ManifestColumn {
    ManifestColumn {
        label,
        source: ColumnSource::Literal(value),
    }
}

/// Column layout of the logistics import sheet, in order.
pub const MANIFEST_COLUMNS: [ManifestColumn; 31] = [
    field(OrderField::OrderId),
    literal("平台交易号", ""),
    literal("交接仓", "深圳燕文"),
    literal("产品名称", "燕文专线快递-普货"),
    field(OrderField::RecipientName),
    field(OrderField::Phone),
    literal("收件人邮箱", ""),
    literal("收件人税号", ""),
    literal("收件人公司", ""),
    field(OrderField::Country),
    field(OrderField::Province),
    field(OrderField::City),
    field(OrderField::PostalCode),
    field(OrderField::StreetAddress),
    literal("收件人门牌号", ""),
    literal("销售平台", ""),
    literal("发件人税号信息", ""),
    literal("CSP", ""),
    literal("包装尺寸【长】cm", ""),
    literal("包装尺寸【宽】cm", ""),
    literal("包装尺寸【高】cm", ""),
    literal("收款到账日期", ""),
    literal("币种类型", "美元"),
    literal("是否含电", "否"),
    literal("拣货单信息", ""),
    literal("IOSS税号", ""),
    literal("中文品名1", "舞蹈服"),
    literal("英文品名1", "dance-suit"),
    literal("单票数量1", "1"),
    literal("重量1(g)", "300"),
    literal("申报价值1", "5"),
];

/// Maps order records onto the full manifest, filling non-extracted
/// columns with literals (overridable per column label).
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    overrides: HashMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只允許覆寫固定值欄位；對應到訂單欄位的欄位一律來自頁面
    pub fn with_overrides(overrides: HashMap<String, String>) -> Result<Self> {
        for label in overrides.keys() {
            match MANIFEST_COLUMNS.iter().find(|c| c.label == label.as_str()) {
                Some(ManifestColumn {
                    source: ColumnSource::Literal(_),
                    ..
                }) => {}
                Some(_) => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "manifest.defaults".to_string(),
                        value: label.clone(),
                        reason: "column is filled from the order page and cannot be overridden"
                            .to_string(),
                    })
                }
                None => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "manifest.defaults".to_string(),
                        value: label.clone(),
                        reason: "unknown manifest column".to_string(),
                    })
                }
            }
        }
        Ok(Self { overrides })
    }

    pub fn headers(&self) -> Vec<&'static str> {
        MANIFEST_COLUMNS.iter().map(|c| c.label).collect()
    }

    pub fn row(&self, record: &OrderRecord) -> Vec<String> {
        MANIFEST_COLUMNS
            .iter()
            .map(|column| match column.source {
                ColumnSource::Field(field) => record.get(field).to_string(),
                ColumnSource::Literal(default) => self
                    .overrides
                    .get(column.label)
                    .cloned()
                    .unwrap_or_else(|| default.to_string()),
            })
            .collect()
    }

    pub fn to_delimited(&self, records: &[OrderRecord], delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        writer.write_record(self.headers())?;
        for record in records {
            writer.write_record(self.row(record))?;
        }

        finish_writer(writer)
    }
}

pub(crate) fn finish_writer(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to flush delimited output: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("Delimited output is not UTF-8: {}", e),
    })
}
