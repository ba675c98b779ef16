//! Percent encoding (RFC 3986)
//!
//! Cookie values pass through a `name=value; attr=value` line, so anything
//! outside the unreserved set is percent-encoded. Unlike form encoding,
//! `+` is a literal plus sign here.

/// Percent-encode a string for use as a cookie value
pub fn percent_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);

    for c in s.chars() {
        match c {
            // Unreserved characters (RFC 3986)
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => {
                result.push(c);
            }
            _ => {
                // Encode as UTF-8 bytes
                for byte in c.to_string().as_bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }

    result
}

/// Percent-decode a string
pub fn percent_decode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut iter = s.bytes().peekable();

    while let Some(b) = iter.next() {
        if b == b'%' {
            // Take the next two hex digits
            let h1 = iter.next();
            let h2 = iter.next();

            if let (Some(c1), Some(c2)) = (h1, h2) {
                let pair = [c1, c2];
                if let Some(byte) = std::str::from_utf8(&pair)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                {
                    bytes.push(byte);
                    continue;
                }
            }
            // Invalid encoding, keep as-is
            bytes.push(b'%');
            if let Some(c1) = h1 {
                bytes.push(c1);
            }
            if let Some(c2) = h2 {
                bytes.push(c2);
            }
        } else {
            bytes.push(b);
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_pass_through() {
        assert_eq!(percent_encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
    }

    #[test]
    fn test_cookie_syntax_encoded() {
        let encoded = percent_encode(r#"{"data":"a b","expiration":1}"#);
        assert!(!encoded.contains(';'));
        assert!(!encoded.contains('='));
        assert!(!encoded.contains(' '));
        assert_eq!(percent_decode(&encoded), r#"{"data":"a b","expiration":1}"#);
    }

    #[test]
    fn test_plus_is_literal() {
        assert_eq!(percent_decode("a%2Bb"), "a+b");
        assert_eq!(percent_decode("a+b"), "a+b");
    }

    #[test]
    fn test_utf8_round_trip() {
        let s = "größe=5; ügly";
        assert_eq!(percent_decode(&percent_encode(s)), s);
    }

    #[test]
    fn test_invalid_encoding_kept() {
        assert_eq!(percent_decode("50%"), "50%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
