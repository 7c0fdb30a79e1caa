use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// As defined in https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
///
/// Everything except the ASCII alphanumerics and `*-._` is percent-encoded.
/// Space is left out of the set so it can be written as `+` instead.
const FORM_URLENCODED_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Encodes a key or value for a query string, writing spaces as `+`.
///
/// Returns the input unchanged when nothing needs encoding.
pub fn encode(input: &str) -> Cow<'_, str> {
    let encoded: Cow<'_, str> =
        percent_encoding::utf8_percent_encode(input, FORM_URLENCODED_SET).into();
    if encoded.contains(' ') {
        Cow::Owned(encoded.replace(' ', "+"))
    } else {
        encoded
    }
}
