//! ASCII-safe encoding for HTTP-header-borne API arguments.
//!
//! Content routes carry their JSON argument object in the
//! `Dropbox-API-Arg` header, and HTTP headers are restricted to ASCII.
//! Paths with Unicode characters therefore need escaping; the API
//! reverses the escaping server-side.

/// Escape every non-ASCII character as `\uxxxx` (lowercase hex,
/// zero-padded), leaving ASCII (≤ 0x7F) untouched.
///
/// The transform works per UTF-16 code unit, so characters outside the
/// Basic Multilingual Plane come out as a surrogate pair of two escapes —
/// the form the API expects.
pub fn http_header_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for unit in input.encode_utf16() {
        if unit <= 0x7f {
            // Safe: a UTF-16 unit ≤ 0x7F is a plain ASCII scalar.
            out.push(unit as u8 as char);
        } else {
            out.push_str(&format!("\\u{unit:04x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(http_header_encode("simple"), "simple");
    }

    #[test]
    fn empty_string() {
        assert_eq!(http_header_encode(""), "");
    }

    #[test]
    fn full_ascii_range_untouched() {
        let all: String = (0u8..=0x7f).map(|b| b as char).collect();
        assert_eq!(http_header_encode(&all), all);
    }

    #[test]
    fn em_dash_escaped() {
        assert_eq!(http_header_encode("simple\u{2014}text"), "simple\\u2014text");
    }

    #[test]
    fn partial_differential_in_path() {
        assert_eq!(
            http_header_encode("/t\u{2202}sts/simpl\u{2202}filé.txt"),
            "/t\\u2202sts/simpl\\u2202fil\\u00e9.txt"
        );
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(http_header_encode("\u{00E9}"), "\\u00e9");
        assert_eq!(http_header_encode("\u{FFFD}"), "\\ufffd");
    }

    #[test]
    fn supplementary_plane_becomes_surrogate_pair() {
        // U+1F600 → UTF-16 surrogates d83d/de00.
        assert_eq!(http_header_encode("\u{1F600}"), "\\ud83d\\ude00");
    }

    #[test]
    fn json_arg_stays_parseable_ascii() {
        let arg = r#"{"path":"/t∂sts/file.txt","mode":"overwrite"}"#;
        let encoded = http_header_encode(arg);
        assert!(encoded.is_ascii());
        assert!(encoded.contains("\\u2202"));
    }
}
