//! Packed 32-bit ARGB colors.
//!
//! Alpha occupies the top byte. Component arguments are `i32` and are not
//! range checked: out-of-range values are truncated to their low byte when
//! packed.

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const GRAY: u32 = 0xFF7F_7F7F;

/// Pack components into `a << 24 | r << 16 | g << 8 | b`.
pub fn compose_argb(r: i32, g: i32, b: i32, a: i32) -> u32 {
    ((a as u32) << 24) | ((r as u32 & 0xFF) << 16) | ((g as u32 & 0xFF) << 8) | (b as u32 & 0xFF)
}

/// Opaque color from RGB.
pub fn rgb(r: i32, g: i32, b: i32) -> u32 {
    compose_argb(r, g, b, 255)
}

/// Components as `[a, r, g, b]`.
pub fn argb_components(color: u32) -> [u8; 4] {
    color.to_be_bytes()
}

pub fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Replace the alpha byte.
pub fn with_alpha(color: u32, a: i32) -> u32 {
    let [_, r, g, b] = argb_components(color);
    compose_argb(r as i32, g as i32, b as i32, a)
}

/// RGB complement, alpha preserved.
pub fn complement(color: u32) -> u32 {
    let [a, r, g, b] = argb_components(color);
    compose_argb(255 - r as i32, 255 - g as i32, 255 - b as i32, a as i32)
}

/// RGB components scaled to `0.0..=1.0`.
pub fn rgb_unit(color: u32) -> (f64, f64, f64) {
    let [_, r, g, b] = argb_components(color);
    (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
}

/// Alpha scaled to `0.0..=1.0`.
pub fn alpha_unit(color: u32) -> f64 {
    alpha(color) as f64 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_and_split() {
        let c = compose_argb(10, 20, 30, 40);
        assert_eq!(c, 0x280A_141E);
        assert_eq!(argb_components(c), [40, 10, 20, 30]);
        assert_eq!(rgb(127, 127, 127), GRAY);
    }

    #[test]
    fn test_alpha_is_not_checked() {
        // 300 = 0x12C, only the low byte survives the shift
        assert_eq!(alpha(with_alpha(BLACK, 300)), 0x2C);
        assert_eq!(alpha(with_alpha(WHITE, -1)), 0xFF);
    }

    #[test]
    fn test_complement() {
        assert_eq!(complement(BLACK), WHITE);
        assert_eq!(complement(with_alpha(WHITE, 128)), with_alpha(BLACK, 128));
    }

    #[test]
    fn test_unit_values() {
        assert_eq!(rgb_unit(rgb(255, 0, 51)), (1.0, 0.0, 0.2));
        assert_eq!(alpha_unit(BLACK), 1.0);
    }
}
