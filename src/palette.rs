/// An RGB triple as uploaded to the display surface.
pub type Rgb = [u8; 3];

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    [r, g, b]
}

pub const BLACK: Rgb = rgb(0, 0, 0);

/// The fixed 16-entry display palette. Color indices stored in the screen
/// window select entries from this table.
pub const PALETTE: [Rgb; 16] = [
    BLACK,              // 0 black
    rgb(29, 43, 83),    // 1 dark blue
    rgb(126, 37, 83),   // 2 dark purple
    rgb(0, 135, 81),    // 3 dark green
    rgb(171, 82, 54),   // 4 brown
    rgb(95, 87, 79),    // 5 dark gray
    rgb(194, 195, 199), // 6 light gray
    rgb(255, 241, 232), // 7 white
    rgb(255, 0, 77),    // 8 red
    rgb(255, 255, 0),   // 9 orange
    rgb(255, 240, 36),  // 10 yellow
    rgb(0, 231, 86),    // 11 green
    rgb(41, 173, 255),  // 12 blue
    rgb(131, 118, 156), // 13 indigo
    rgb(255, 119, 168), // 14 pink
    rgb(255, 204, 170), // 15 peach
];

/// Look up the display color for a palette index.
///
/// Panics if `idx > 15`. Callers are expected to pass validated indices,
/// e.g. the output of [`crate::Console::pget`].
pub fn color_rgb(idx: u8) -> Rgb {
    PALETTE[idx as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_zero_is_pure_black() {
        assert_eq!(color_rgb(0), [0, 0, 0]);
    }

    #[test]
    fn every_index_resolves() {
        for idx in 0..16 {
            let _ = color_rgb(idx);
        }
        assert_eq!(color_rgb(7), [255, 241, 232]);
        assert_eq!(color_rgb(8), [255, 0, 77]);
    }

    #[test]
    #[should_panic]
    fn index_sixteen_panics() {
        let _ = color_rgb(16);
    }
}
