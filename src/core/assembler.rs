use crate::core::address::decompose;
use crate::core::markup::{child_elements, stripped_strings, MarkupDocument};
use crate::core::selectors::{
    ADDRESS_LINE_TAG, BUYER_ADDRESS_SELECTOR, ORDER_ID_SELECTOR, PHONE_SELECTOR,
};
use crate::domain::model::{AddressLine, OrderRecord};
use crate::utils::error::Result;

/// Lines of the buyer-address widget, one per direct child `span`.
///
/// Nested spans are folded into their parent line so they cannot shift
/// line positions. A missing widget yields an empty block.
pub fn address_block(doc: &MarkupDocument) -> Result<Vec<AddressLine>> {
    let Some(widget) = doc.find_first(&BUYER_ADDRESS_SELECTOR)? else {
        return Ok(Vec::new());
    };

    Ok(child_elements(widget, ADDRESS_LINE_TAG)
        .into_iter()
        .map(|line| AddressLine::new(stripped_strings(line)))
        .collect())
}

/// Builds the order record for one detail page. Anything not found on the
/// page is left as an empty string.
pub fn assemble(doc: &MarkupDocument) -> Result<OrderRecord> {
    let order_id = doc.first_text(&ORDER_ID_SELECTOR)?;
    let phone = doc.first_text(&PHONE_SELECTOR)?;
    let address = decompose(&address_block(doc)?);

    Ok(OrderRecord {
        order_id,
        recipient_name: address.name,
        phone,
        country: address.country,
        province: address.province,
        city: address.city,
        postal_code: address.postal_code,
        street_address: address.street_address,
    })
}

pub fn assemble_markup(markup: &str) -> Result<OrderRecord> {
    let doc = MarkupDocument::parse(markup)?;
    assemble(&doc)
}
