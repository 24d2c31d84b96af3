//! Selectors for the seller-central order pages. Adjust here if the site
//! renames its `data-test-id` hooks.

use crate::core::markup::ElementSelector;

pub const TEST_ID_ATTRIBUTE: &str = "data-test-id";

pub static ORDER_ID_SELECTOR: ElementSelector =
    ElementSelector::new("span", TEST_ID_ATTRIBUTE, "order-id-value");

pub static PHONE_SELECTOR: ElementSelector =
    ElementSelector::new("span", TEST_ID_ATTRIBUTE, "shipping-section-phone");

pub static BUYER_ADDRESS_SELECTOR: ElementSelector =
    ElementSelector::new("div", TEST_ID_ATTRIBUTE, "shipping-section-buyer-address");

/// Tag of one rendered line inside the buyer-address widget.
pub const ADDRESS_LINE_TAG: &str = "span";
