//! Unit conversion utilities.
//!
//! WordprocessingML measures lengths in twips (1/1440 inch) for paragraph
//! and page geometry, half-points for font sizes and EMUs for drawings.

pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const MM_PER_INCH: f64 = 25.4;
pub const TWIPS_PER_PT: f64 = 20.0;
/// EMUs per pixel at 96 DPI.
pub const EMUS_PER_PX: i64 = 9525;

#[inline]
pub fn mm_to_twip(mm: f64) -> i32 {
    (mm * TWIPS_PER_INCH / MM_PER_INCH).round() as i32
}

#[inline]
pub fn pt_to_twip(pt: f64) -> u32 {
    (pt * TWIPS_PER_PT).round() as u32
}

/// Font size in points to `w:sz` half-points.
#[inline]
pub fn pt_to_half_points(pt: f64) -> u32 {
    (pt * 2.0).round() as u32
}

#[inline]
pub fn px_to_emu(px: u32) -> i64 {
    (px as i64).saturating_mul(EMUS_PER_PX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_geometry() {
        assert_eq!(mm_to_twip(210.0), 11906);
        assert_eq!(mm_to_twip(297.0), 16838);
        assert_eq!(mm_to_twip(30.0), 1701);
        assert_eq!(mm_to_twip(165.0), 9354);
    }

    #[test]
    fn test_small_units() {
        assert_eq!(pt_to_twip(8.0), 160);
        assert_eq!(pt_to_half_points(12.0), 24);
        assert_eq!(px_to_emu(1), 9525);
        assert_eq!(mm_to_twip(-5.0), -283);
    }
}
