use crate::core::markup::{stripped_strings, MarkupDocument};
use crate::core::selectors::BUYER_ADDRESS_SELECTOR;
use crate::utils::error::Result;

/// Flattens every buyer-address widget on a list page into one display
/// string (all descendant text, space-joined). Widgets without any text are
/// skipped.
pub fn extract_all(doc: &MarkupDocument) -> Result<Vec<String>> {
    let widgets = doc.find_all(&BUYER_ADDRESS_SELECTOR)?;
    let total = widgets.len();

    let addresses: Vec<String> = widgets
        .into_iter()
        .map(|widget| stripped_strings(widget).join(" "))
        .filter(|address| !address.is_empty())
        .collect();

    if addresses.len() < total {
        tracing::debug!(
            "Skipped {} empty address widgets out of {}",
            total - addresses.len(),
            total
        );
    }
    Ok(addresses)
}

pub fn extract_all_markup(markup: &str) -> Result<Vec<String>> {
    let doc = MarkupDocument::parse(markup)?;
    extract_all(&doc)
}
