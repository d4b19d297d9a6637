//! WhatsApp deep link for sending a payment receipt.

use keystand_core::{Product, Settings};
use tracing::warn;
use url::Url;

/// Inert link used whenever a real one cannot be built.
pub const PLACEHOLDER_LINK: &str = "#";

/// WhatsApp click-to-chat endpoint.
pub const WHATSAPP_SEND_ENDPOINT: &str = "https://api.whatsapp.com/send";

/// Query parameter of the configured URL that holds the merchant's number.
const PHONE_PARAM: &str = "phone";

/// Build the "send receipt" link for `product`.
///
/// Returns [`PLACEHOLDER_LINK`] when there is no product, no configured URL,
/// the URL does not parse, or it has no `phone` parameter. Only the parse
/// failure is logged; none of these cases are errors for the page.
#[must_use]
pub fn whatsapp_link(product: Option<&Product>, settings: &Settings) -> String {
    let (Some(product), Some(raw_url)) = (product, settings.whatsapp_url()) else {
        return PLACEHOLDER_LINK.to_string();
    };

    let url = match Url::parse(raw_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(
                whatsapp_url = %raw_url,
                error = %e,
                "Invalid WhatsApp URL in settings"
            );
            return PLACEHOLDER_LINK.to_string();
        }
    };

    let Some(phone) = url
        .query_pairs()
        .find(|(key, _)| key == PHONE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|phone| !phone.is_empty())
    else {
        return PLACEHOLDER_LINK.to_string();
    };

    format!(
        "{WHATSAPP_SEND_ENDPOINT}?phone={}&text={}",
        encode_uri_component(&phone),
        encode_uri_component(&purchase_message(product))
    )
}

/// Message prefilled in the chat.
#[must_use]
pub fn purchase_message(product: &Product) -> String {
    format!(
        "I would like to purchase {} for ${}. I have completed the payment and this is my receipt.",
        product.title, product.price
    )
}

/// Percent-encode like JavaScript's `encodeURIComponent`.
///
/// `urlencoding` alone would also escape `! * ' ( )`.
fn encode_uri_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    let mut buf = [0u8; 4];
    for c in input.chars() {
        if c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    encoded
}
