use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// HEX normalisation
// ---------------------------------------------------------------------------

/// Marker opacity (0.8).
const MARKER_ALPHA: u8 = 204;

/// Bring a catalog color code into `#RRGGBB` form.
///
/// A missing `#` is added and hex digits are upper-cased. Codes that are not
/// six hex digits are still prefixed so they can be displayed; [`parse_hex`]
/// rejects them later and the marker falls back to grey.
pub fn normalize_hex(raw: &str) -> String {
    let body = raw.trim().trim_start_matches('#');
    if body.len() == 6 && body.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{}", body.to_ascii_uppercase())
    } else {
        format!("#{body}")
    }
}

/// Parse a `#RRGGBB` string into an sRGB triplet.
pub fn parse_hex(hex: &str) -> Option<Srgb<u8>> {
    let body = hex.trim().trim_start_matches('#');
    if body.len() != 6 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    body.parse::<Srgb<u8>>().ok()
}

// ---------------------------------------------------------------------------
// Marker colours
// ---------------------------------------------------------------------------

/// Semi-transparent marker fill for a record's colour code.
pub fn color_for_hex(hex: &str) -> Color32 {
    match parse_hex(hex) {
        Some(c) => Color32::from_rgba_unmultiplied(c.red, c.green, c.blue, MARKER_ALPHA),
        None => {
            log::warn!("Unparseable colour code {hex:?}, drawing grey");
            Color32::from_rgba_unmultiplied(128, 128, 128, MARKER_ALPHA)
        }
    }
}

/// Opaque, darker shade of a record's colour for the ring around selected points.
pub fn highlight_color(hex: &str) -> Color32 {
    let Some(base) = parse_hex(hex) else {
        return Color32::DARK_GRAY;
    };
    let hsl: Hsl = base.into_format::<f32>().into_color();
    let darker: Srgb = hsl.darken(0.5).into_color();
    let out: Srgb<u8> = darker.into_format();
    Color32::from_rgb(out.red, out.green, out.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_prefix_and_uppercases() {
        assert_eq!(normalize_hex("a1b2c3"), "#A1B2C3");
        assert_eq!(normalize_hex("#ffffff"), "#FFFFFF");
        assert_eq!(normalize_hex("  00ff00 "), "#00FF00");
    }

    #[test]
    fn normalize_keeps_malformed_codes_prefixed() {
        assert_eq!(normalize_hex("xyz"), "#xyz");
        assert_eq!(normalize_hex(""), "#");
        assert!(parse_hex(&normalize_hex("xyz")).is_none());
    }

    #[test]
    fn parse_reads_channels() {
        let c = parse_hex("#102030").unwrap();
        assert_eq!((c.red, c.green, c.blue), (0x10, 0x20, 0x30));
        assert!(parse_hex("#123").is_none());
    }

    #[test]
    fn non_ascii_code_is_rejected_without_panicking() {
        // Six bytes, but not six hex digits.
        let code = normalize_hex("aééb");
        assert_eq!(code, "#aééb");
        assert!(parse_hex(&code).is_none());
        assert!(parse_hex("#ééé").is_none());
        assert_eq!(highlight_color(&code), Color32::DARK_GRAY);
        assert_eq!(
            color_for_hex(&code),
            Color32::from_rgba_unmultiplied(128, 128, 128, MARKER_ALPHA)
        );
    }

    #[test]
    fn unparseable_colour_falls_back_to_grey() {
        assert_eq!(
            color_for_hex("#nothex"),
            Color32::from_rgba_unmultiplied(128, 128, 128, MARKER_ALPHA)
        );
    }

    #[test]
    fn highlight_is_darker_shade() {
        let hl = highlight_color("#C8B4A0");
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(hl) < 200 + 180 + 160);
        assert_eq!(highlight_color("#bad"), Color32::DARK_GRAY);
    }
}
