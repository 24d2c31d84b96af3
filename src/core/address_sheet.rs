use crate::core::manifest::finish_writer;
use crate::domain::model::AddressListing;
use crate::utils::error::Result;

pub const ADDRESS_COLUMN: &str = "配送地址";

/// Writes list-page addresses as `来源页面,序号,配送地址` rows.
pub fn listings_to_delimited(listings: &[AddressListing], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(["来源页面", "序号", ADDRESS_COLUMN])?;
    for listing in listings {
        writer.write_record([
            listing.source.as_str(),
            listing.index.to_string().as_str(),
            listing.address.as_str(),
        ])?;
    }
    finish_writer(writer)
}

/// Fills the `配送地址` column of an existing CSV sheet.
///
/// The column is appended when missing, after the widest row so that no
/// existing cell is overwritten. Ragged rows are kept as they are. Address
/// `i` goes into data row `i`; rows past the end of `addresses` keep their
/// current value and surplus addresses are dropped. Returns the rewritten
/// sheet and the number of rows updated.
pub fn fill_address_column(sheet: &[u8], addresses: &[String]) -> Result<(String, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(sheet);

    let mut headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|row| Ok(row?.iter().map(String::from).collect()))
        .collect::<Result<Vec<Vec<String>>>>()?;

    let column = match headers.iter().position(|h| h == ADDRESS_COLUMN) {
        Some(index) => index,
        None => {
            // 表頭先補到最寬的資料列，新欄位才不會蓋掉多出來的儲存格
            let widest = rows.iter().map(Vec::len).max().unwrap_or_default();
            if widest > headers.len() {
                headers.resize(widest, String::new());
            }
            headers.push(ADDRESS_COLUMN.to_string());
            headers.len() - 1
        }
    };

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(&headers)?;

    let mut updated = 0;
    for (row_index, mut cells) in rows.into_iter().enumerate() {
        // 短列補齊到表頭長度
        if cells.len() < headers.len() {
            cells.resize(headers.len(), String::new());
        }
        if let Some(address) = addresses.get(row_index) {
            cells[column] = address.clone();
            updated += 1;
        }
        writer.write_record(&cells)?;
    }

    if addresses.len() > updated {
        tracing::warn!(
            "Address sheet has only {} rows, {} addresses were not written",
            updated,
            addresses.len() - updated
        );
    }

    Ok((finish_writer(writer)?, updated))
}
