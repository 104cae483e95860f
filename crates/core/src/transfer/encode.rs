//! URL component encoding shared by every transfer mechanism.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::types::Disposition;

/// Bytes left alone by `encodeURIComponent`; everything else is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query component (`/` becomes `%2F`).
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// RFC 6266 `Content-Disposition` value carrying a UTF-8 file name.
#[must_use]
pub fn content_disposition(disposition: Disposition, name: &str) -> String {
    format!(
        "{}; filename*=UTF-8''{}",
        disposition.as_str(),
        encode_component(name)
    )
}
