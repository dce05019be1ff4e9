//! Color utility functions shared across the application.
//!
//! Label colors travel through exported files as `#rrggbb` text, so this
//! module converts between that form and the RGB triples used in memory.

/// Format an RGB triple as lowercase `#rrggbb`.
pub fn to_hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Parse `#rrggbb` (the leading `#` is optional, case-insensitive).
///
/// Returns None for anything that is not exactly six hex digits.
pub fn parse_hex(text: &str) -> Option<[u8; 3]> {
    let digits = text.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_lowercase_padded() {
        assert_eq!(to_hex([0x01, 0x73, 0xb2]), "#0173b2");
        assert_eq!(to_hex([0, 0, 0]), "#000000");
    }

    #[test]
    fn test_parse_hex_accepts_optional_hash() {
        assert_eq!(parse_hex("#de8f05"), Some([0xde, 0x8f, 0x05]));
        assert_eq!(parse_hex("DE8F05"), Some([0xde, 0x8f, 0x05]));
        assert_eq!(parse_hex("  #029e73 "), Some([0x02, 0x9e, 0x73]));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert_eq!(parse_hex(""), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gg0000"), None);
        assert_eq!(parse_hex("cornflower blue"), None);
    }
}
