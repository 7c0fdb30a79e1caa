use std::borrow::Cow;

#[inline(always)]
fn char_to_digit(c: u8) -> Option<u32> {
    char::from(c).to_digit(16)
}

/// Decodes a query string key or value:
/// - Replaces `+` with a space
/// - Decodes percent-encoded characters, leaving malformed escapes as-is
/// - Converts the result to a string, replacing invalid UTF-8
pub fn decode(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                decoded.push(b' ');
                idx += 1;
            }
            b'%' => {
                let escaped = bytes
                    .get(idx + 1)
                    .and_then(|&h| char_to_digit(h))
                    .zip(bytes.get(idx + 2).and_then(|&l| char_to_digit(l)));
                match escaped {
                    Some((h, l)) => {
                        decoded.push((h * 0x10 + l) as u8);
                        idx += 3;
                    }
                    None => {
                        decoded.push(b'%');
                        idx += 1;
                    }
                }
            }
            b => {
                decoded.push(b);
                idx += 1;
            }
        }
    }

    match String::from_utf8(decoded) {
        Ok(s) => Cow::Owned(s),
        Err(err) => Cow::Owned(String::from_utf8_lossy(err.as_bytes()).into_owned()),
    }
}
