//! Shareable checkout links.
//!
//! A link points at the hosted checkout page and carries the payment intent in
//! its query string:
//!
//! ```text
//! <base>/checkout?recipient=<address>&amount=<base-units>[&memo=..][&redirectUrl=..][&cancelUrl=..]
//! ```
//!
//! Values are form-urlencoded. Optional fields are omitted when absent or empty.
//!
//! # Example
//!
//! ```
//! use stackpay_lib::link::{build_payment_link, PaymentLinkOptions};
//! use stackpay_lib::PaymentIntent;
//!
//! let intent = PaymentIntent::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM", 1_000_000)
//!     .with_memo("Test payment");
//! let link = build_payment_link("https://stackpay-app-testnet.com", &intent.into()).unwrap();
//! assert!(link.as_str().contains("memo=Test+payment"));
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{PaymentIntent, Result, StackPayError};

const CHECKOUT_PATH: &str = "checkout";

/// Everything a checkout link encodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLinkOptions {
    /// The payment itself.
    pub intent: PaymentIntent,
    /// Where checkout sends the payer after success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Where checkout sends the payer after cancelling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

impl PaymentLinkOptions {
    /// Link options for `intent` with no redirects.
    pub fn new(intent: PaymentIntent) -> Self {
        Self {
            intent,
            redirect_url: None,
            cancel_url: None,
        }
    }

    /// Set the success redirect.
    pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// Set the cancel redirect.
    pub fn with_cancel_url(mut self, url: impl Into<String>) -> Self {
        self.cancel_url = Some(url.into());
        self
    }
}

impl From<PaymentIntent> for PaymentLinkOptions {
    fn from(intent: PaymentIntent) -> Self {
        Self::new(intent)
    }
}

/// Build a checkout link under `base`.
///
/// The intent is validated before any URL work.
///
/// # Errors
///
/// - [`StackPayError::InvalidRecipient`] / [`StackPayError::InvalidAmount`] for a bad intent
/// - [`StackPayError::InvalidConfig`] when `base` is not an absolute URL
pub fn build_payment_link(base: &str, options: &PaymentLinkOptions) -> Result<Url> {
    options.intent.validate()?;

    let mut url = Url::parse(base)
        .map_err(|e| StackPayError::invalid_config("checkout_base_url", e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(StackPayError::invalid_config(
            "checkout_base_url",
            format!("{base:?} cannot be a base URL"),
        ));
    }

    let path = format!("{}/{CHECKOUT_PATH}", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("recipient", &options.intent.recipient);
        query.append_pair("amount", &options.intent.amount.to_string());

        let optional = [
            ("memo", options.intent.memo()),
            ("redirectUrl", non_empty(&options.redirect_url)),
            ("cancelUrl", non_empty(&options.cancel_url)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                query.append_pair(key, value);
            }
        }
    }

    Ok(url)
}

/// Read a checkout link back into its options.
///
/// The decoded intent must satisfy the same checks as when building.
pub fn parse_payment_link(link: &str) -> Result<PaymentLinkOptions> {
    let url = Url::parse(link.trim())
        .map_err(|e| StackPayError::invalid_config("payment_link", e.to_string()))?;

    let mut recipient = None;
    let mut amount = None;
    let mut options = PaymentLinkOptions::new(PaymentIntent::new(String::new(), 0));

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "recipient" => recipient = Some(value.into_owned()),
            "amount" => amount = Some(value.into_owned()),
            "memo" if !value.is_empty() => options.intent.memo = Some(value.into_owned()),
            "redirectUrl" if !value.is_empty() => options.redirect_url = Some(value.into_owned()),
            "cancelUrl" if !value.is_empty() => options.cancel_url = Some(value.into_owned()),
            _ => {}
        }
    }

    options.intent.recipient = recipient.unwrap_or_default();
    options.intent.amount = match amount {
        Some(text) => text
            .parse()
            .map_err(|_| StackPayError::InvalidAmount(format!("{text:?} is not a base-unit amount")))?,
        None => 0,
    };

    options.intent.validate()?;
    Ok(options)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CHECKOUT_BASE_URL;
    use crate::test_utils::VALID_ADDRESS;

    fn build(options: PaymentLinkOptions) -> Result<String> {
        build_payment_link(DEFAULT_CHECKOUT_BASE_URL, &options).map(String::from)
    }

    #[test]
    fn test_minimal_link() {
        let link = build(PaymentIntent::new(VALID_ADDRESS, 1_000_000).into()).unwrap();

        assert_eq!(
            link,
            format!(
                "https://stackpay-app-testnet.com/checkout?recipient={VALID_ADDRESS}&amount=1000000"
            )
        );
        assert!(!link.contains("memo="));
        assert!(!link.contains("redirectUrl="));
        assert!(!link.contains("cancelUrl="));
    }

    #[test]
    fn test_full_link_encodes_and_orders_fields() {
        let options = PaymentLinkOptions::new(
            PaymentIntent::new(VALID_ADDRESS, 1_000_000).with_memo("Test payment"),
        )
        .with_redirect_url("https://example.com/success")
        .with_cancel_url("https://example.com/cancel");

        let link = build(options).unwrap();

        assert!(link.contains("memo=Test+payment"));
        assert!(link.contains("redirectUrl=https%3A%2F%2Fexample.com%2Fsuccess"));

        let positions: Vec<usize> = ["recipient=", "amount=", "memo=", "redirectUrl=", "cancelUrl="]
            .iter()
            .map(|key| link.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_optionals_are_omitted() {
        let options = PaymentLinkOptions::new(PaymentIntent::new(VALID_ADDRESS, 1).with_memo(""))
            .with_redirect_url("");
        let link = build(options).unwrap();
        assert!(!link.contains("memo="));
        assert!(!link.contains("redirectUrl="));
    }

    #[test]
    fn test_invalid_intent_rejected() {
        let err = build(PaymentIntent::new("invalid-address", 1_000_000).into()).unwrap_err();
        assert!(matches!(err, StackPayError::InvalidRecipient(_)));

        let err = build(PaymentIntent::new(VALID_ADDRESS, 0).into()).unwrap_err();
        assert!(matches!(err, StackPayError::InvalidAmount(_)));
    }

    #[test]
    fn test_intent_checked_before_base_url() {
        let options: PaymentLinkOptions = PaymentIntent::new("invalid-address", 1).into();
        let err = build_payment_link("not a url", &options).unwrap_err();
        assert!(matches!(err, StackPayError::InvalidRecipient(_)));

        let options: PaymentLinkOptions = PaymentIntent::new(VALID_ADDRESS, 1).into();
        let err = build_payment_link("not a url", &options).unwrap_err();
        assert!(matches!(err, StackPayError::InvalidConfig { .. }));
    }

    #[test]
    fn test_base_path_and_query_are_normalized() {
        let options: PaymentLinkOptions = PaymentIntent::new(VALID_ADDRESS, 1).into();
        let link = build_payment_link("http://localhost:3000/shop/?stale=1#frag", &options).unwrap();
        assert_eq!(link.path(), "/shop/checkout");
        assert!(!link.as_str().contains("stale"));
        assert_eq!(link.fragment(), None);
    }

    #[test]
    fn test_parse_round_trip() {
        let options = PaymentLinkOptions::new(
            PaymentIntent::new(VALID_ADDRESS, 250).with_memo("Order #1 & co"),
        )
        .with_cancel_url("https://example.com/cancel?x=1");

        let link = build(options.clone()).unwrap();
        assert_eq!(parse_payment_link(&link).unwrap(), options);
    }

    #[test]
    fn test_parse_rejects_bad_links() {
        let missing_amount = format!("https://x.com/checkout?recipient={VALID_ADDRESS}");
        assert!(matches!(
            parse_payment_link(&missing_amount),
            Err(StackPayError::InvalidAmount(_))
        ));

        let bad_amount = format!("https://x.com/checkout?recipient={VALID_ADDRESS}&amount=1.5");
        assert!(matches!(
            parse_payment_link(&bad_amount),
            Err(StackPayError::InvalidAmount(_))
        ));

        assert!(matches!(
            parse_payment_link("https://x.com/checkout?amount=5"),
            Err(StackPayError::InvalidRecipient(_))
        ));
    }
}
