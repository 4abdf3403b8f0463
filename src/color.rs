use anyhow::{Result, anyhow};
use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used to tell chromatogram peaks and FTIR bands apart.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hex conversion for the config file and the colour picker
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `#rgb`) into a colour.
pub fn parse_hex(s: &str) -> Result<Color32> {
    let rgb: Srgb<u8> = s
        .trim()
        .parse()
        .map_err(|e| anyhow!("invalid colour {s:?}: {e}"))?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Format a colour as `#rrggbb`, dropping alpha.
pub fn to_hex(c: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}

/// Same hue, lighter and semi-transparent; used for the reference overlay
/// and filled peak areas.
pub fn faded(c: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn hex_round_trip() {
        let c = parse_hex("#1f77b4").unwrap();
        assert_eq!(c, Color32::from_rgb(0x1f, 0x77, 0xb4));
        assert_eq!(to_hex(c), "#1f77b4");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hex("blue").is_err());
        assert!(parse_hex("#12345").is_err());
    }
}
