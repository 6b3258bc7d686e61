//! Document color palette.

use std::collections::HashSet;

use bezkit_path::color;
use serde::{Deserialize, Serialize};

/// Order-preserving set of packed ARGB colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct Palette {
    colors: Vec<u32>,
    seen: HashSet<u32>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a color. Returns `false` if it was already present.
    pub fn add_color(&mut self, argb: u32) -> bool {
        if !self.seen.insert(argb) {
            return false;
        }
        self.colors.push(argb);
        true
    }

    /// Add opaque black, white and mid gray.
    pub fn add_black_white_gray(&mut self) {
        self.add_color(color::BLACK);
        self.add_color(color::WHITE);
        self.add_color(color::GRAY);
    }

    pub fn contains(&self, argb: u32) -> bool {
        self.seen.contains(&argb)
    }

    /// Colors in insertion order.
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn clear(&mut self) {
        self.colors.clear();
        self.seen.clear();
    }
}

impl From<Vec<u32>> for Palette {
    fn from(colors: Vec<u32>) -> Self {
        colors.into_iter().collect()
    }
}

impl From<Palette> for Vec<u32> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl FromIterator<u32> for Palette {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut palette = Palette::new();
        palette.extend(iter);
        palette
    }
}

impl Extend<u32> for Palette {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for argb in iter {
            self.add_color(argb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicates_in_order() {
        let mut palette = Palette::new();
        assert!(palette.add_color(3));
        assert!(palette.add_color(1));
        assert!(!palette.add_color(3));
        assert_eq!(palette.colors(), &[3, 1]);
        assert!(palette.contains(1));
    }

    #[test]
    fn test_black_white_gray() {
        let mut palette = Palette::new();
        palette.add_color(color::WHITE);
        palette.add_black_white_gray();
        assert_eq!(palette.colors(), &[color::WHITE, color::BLACK, color::GRAY]);
    }

    #[test]
    fn test_serde_as_list() {
        let palette: Palette = vec![1, 2, 2, 3].into();
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, palette);
    }
}
