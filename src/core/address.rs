use crate::core::city::extract_city;
use crate::domain::model::{AddressFields, AddressLine};

/// Fewest lines a buyer-address widget renders when every sub-field is present.
pub const MIN_ADDRESS_LINES: usize = 5;

/// Splits the lines of one buyer-address widget into named fields.
///
/// Positions are fixed from both ends: the first line is the recipient, the
/// last three are province, postal code and country, and whatever sits in
/// between (one to three lines in practice) is the street address. Blocks
/// shorter than [`MIN_ADDRESS_LINES`] yield all-empty fields.
///
/// Widgets that omit the postal code shift every tail field by one (the
/// country lands in `postal_code`). That shape is not detected.
pub fn decompose(lines: &[AddressLine]) -> AddressFields {
    let len = lines.len();
    if len < MIN_ADDRESS_LINES {
        tracing::debug!(lines = len, "Address block too short, leaving fields empty");
        return AddressFields::default();
    }

    let street_lines: Vec<String> = lines[1..len - 3].iter().map(AddressLine::text).collect();
    let city = street_lines
        .first()
        .map(|first| extract_city(first))
        .unwrap_or_default();

    AddressFields {
        name: lines[0].text(),
        street_address: street_lines.join(" "),
        // 省/州可能同時有羅馬拼音與當地文字兩個文字節點，只取第一個
        province: lines[len - 3].first_fragment().to_string(),
        postal_code: lines[len - 2].text(),
        country: lines[len - 1].text(),
        city,
    }
}
