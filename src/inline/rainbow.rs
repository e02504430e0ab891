//! Hue cycle for rainbow text mode.

/// Running position in the 0..360 hue cycle.
///
/// One cursor is threaded through a whole resolve pass so consecutive
/// characters keep advancing the hue across atoms and nodes.
#[derive(Debug, Clone, Default)]
pub struct HueCursor {
    hue: u32,
}

impl HueCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the cycle at `hue` (taken modulo 360).
    pub fn starting_at(hue: u32) -> Self {
        Self { hue: hue % 360 }
    }

    /// Color for the next character, full saturation, half lightness.
    pub fn next_color(&mut self) -> String {
        let color = hsl_to_hex(self.hue, 100.0, 50.0);
        self.hue = (self.hue + 1) % 360;
        color
    }
}

/// `hue` in degrees, saturation and lightness in percent; returns `RRGGBB`.
pub fn hsl_to_hex(hue: u32, saturation: f64, lightness: f64) -> String {
    let s = saturation / 100.0;
    let l = lightness / 100.0;
    let a = s * l.min(1.0 - l);
    let h = f64::from(hue % 360);
    let channel = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let value = l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0);
        (value * 255.0).round() as u8
    };
    format!("{:02X}{:02X}{:02X}", channel(0.0), channel(8.0), channel(4.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsl_to_hex(0, 100.0, 50.0), "FF0000");
        assert_eq!(hsl_to_hex(120, 100.0, 50.0), "00FF00");
        assert_eq!(hsl_to_hex(240, 100.0, 50.0), "0000FF");
        assert_eq!(hsl_to_hex(60, 100.0, 50.0), "FFFF00");
    }

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = HueCursor::starting_at(359);
        cursor.next_color();
        assert_eq!(cursor.next_color(), "FF0000");
    }
}
