use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 訂單記錄中固定的八個欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    OrderId,
    RecipientName,
    Phone,
    Country,
    Province,
    City,
    PostalCode,
    StreetAddress,
}

impl OrderField {
    pub const ALL: [OrderField; 8] = [
        OrderField::OrderId,
        OrderField::RecipientName,
        OrderField::Phone,
        OrderField::Country,
        OrderField::Province,
        OrderField::City,
        OrderField::PostalCode,
        OrderField::StreetAddress,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            OrderField::OrderId => "order_id",
            OrderField::RecipientName => "recipient_name",
            OrderField::Phone => "phone",
            OrderField::Country => "country",
            OrderField::Province => "province",
            OrderField::City => "city",
            OrderField::PostalCode => "postal_code",
            OrderField::StreetAddress => "street_address",
        }
    }

    /// 物流表單上的欄位標題
    pub const fn label(&self) -> &'static str {
        match self {
            OrderField::OrderId => "订单号",
            OrderField::RecipientName => "收件人姓名",
            OrderField::Phone => "收件人电话",
            OrderField::Country => "收件人国家",
            OrderField::Province => "收件人省/州",
            OrderField::City => "收件人城市",
            OrderField::PostalCode => "收件人邮编",
            OrderField::StreetAddress => "收件人地址",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One order-detail page reduced to its shipping fields.
///
/// Every field is always present; an empty string means "not found on the
/// page". An all-empty record is valid output, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub recipient_name: String,
    pub phone: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub postal_code: String,
    pub street_address: String,
}

impl OrderRecord {
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::OrderId => &self.order_id,
            OrderField::RecipientName => &self.recipient_name,
            OrderField::Phone => &self.phone,
            OrderField::Country => &self.country,
            OrderField::Province => &self.province,
            OrderField::City => &self.city,
            OrderField::PostalCode => &self.postal_code,
            OrderField::StreetAddress => &self.street_address,
        }
    }

    /// 依固定順序列出所有欄位
    pub fn fields(&self) -> impl Iterator<Item = (OrderField, &str)> + '_ {
        OrderField::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, value)| value.is_empty())
    }
}

/// A single rendered line of the buyer-address widget.
///
/// `fragments` are the line's text nodes in document order, trimmed, with
/// empty ones dropped. A province line may carry two stacked fragments
/// (romanized and local script).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressLine {
    pub fragments: Vec<String>,
}

impl AddressLine {
    pub fn new(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    pub fn first_fragment(&self) -> &str {
        self.fragments.first().map(String::as_str).unwrap_or("")
    }
}

impl From<&str> for AddressLine {
    fn from(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self::new(vec![trimmed.to_string()])
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressFields {
    pub name: String,
    pub street_address: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// 單一訂單詳情頁
    #[default]
    Detail,
    /// 訂單列表頁，只擷取地址字串
    List,
}

impl std::str::FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "detail" => Ok(PageKind::Detail),
            "list" => Ok(PageKind::List),
            other => Err(format!("unknown page kind '{}', expected detail or list", other)),
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Detail => f.write_str("detail"),
            PageKind::List => f.write_str("list"),
        }
    }
}

/// 從儲存層讀入、尚未解析的頁面
///
/// 內容保留原始位元組，解碼延到轉換階段，讓編碼錯誤也走略過或中止的設定。
#[derive(Debug, Clone)]
pub struct PageSource {
    pub name: String,
    pub content: Vec<u8>,
}

impl PageSource {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// 頁面必須是 UTF-8，不做替換字元的寬鬆解碼
    pub fn markup(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|e| {
            EtlError::markup(
                &self.name,
                format!("page is not valid UTF-8: {} (re-save the page as UTF-8)", e),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressListing {
    pub source: String,
    pub index: usize,
    pub address: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<OrderRecord>,
    pub listings: Vec<AddressListing>,
    pub skipped_pages: Vec<String>,
    pub csv_output: String,
    pub tsv_output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_has_every_field_empty() {
        let record = OrderRecord::default();
        assert_eq!(record.fields().count(), 8);
        assert!(record.is_empty());
    }

    #[test]
    fn test_record_serializes_all_keys() {
        let record = OrderRecord {
            order_id: "123".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        for field in OrderField::ALL {
            assert!(obj.contains_key(field.key()), "missing {}", field.key());
        }
        assert_eq!(obj["order_id"], "123");
        assert_eq!(obj["phone"], "");
    }

    #[test]
    fn test_address_line_text_concatenates_fragments() {
        let line = AddressLine::new(vec!["Tokyo".to_string(), "東京都".to_string()]);
        assert_eq!(line.text(), "Tokyo東京都");
        assert_eq!(line.first_fragment(), "Tokyo");
        assert_eq!(AddressLine::default().first_fragment(), "");
    }

    #[test]
    fn test_page_source_rejects_non_utf8_content() {
        let page = PageSource::new("gbk.html", "<span>张三</span>");
        assert_eq!(page.markup().unwrap(), "<span>张三</span>");

        // GBK 編碼的「张三」
        let gbk = PageSource::new("gbk.html", vec![0xD5, 0xC5, 0xC8, 0xFD]);
        match gbk.markup() {
            Err(EtlError::MarkupError {
                source_name,
                message,
            }) => {
                assert_eq!(source_name, "gbk.html");
                assert!(message.contains("UTF-8"));
            }
            other => panic!("expected MarkupError, got {:?}", other),
        }
    }

    #[test]
    fn test_page_kind_from_str() {
        assert_eq!("detail".parse::<PageKind>().unwrap(), PageKind::Detail);
        assert_eq!("LIST".parse::<PageKind>().unwrap(), PageKind::List);
        assert!("grid".parse::<PageKind>().is_err());
    }
}
