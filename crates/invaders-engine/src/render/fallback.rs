//! Procedural pixel-art sprites used when an image asset cannot be loaded.

/// Tightly packed RGBA8 bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Pixmap {
    /// RGBA of the pixel at (`x`, `y`), top-left origin.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    fn from_grid<const W: usize, const H: usize>(
        grid: &[[u8; W]; H],
        palette: &[[u8; 4]],
    ) -> Self {
        let mut rgba = Vec::with_capacity(W * H * 4);
        for row in grid {
            for &idx in row {
                rgba.extend_from_slice(&palette[idx as usize]);
            }
        }
        Self {
            width: W as u32,
            height: H as u32,
            rgba,
        }
    }
}

/// Picks the fallback sprite for a failed asset URL by substring.
///
/// Returns `None` when the URL names neither known sprite; the caller keeps its placeholder.
pub fn fallback_for_url(url: &str) -> Option<Pixmap> {
    if url.contains("ship") {
        Some(generate_ship())
    } else if url.contains("invader") {
        Some(generate_invader())
    } else {
        None
    }
}

// Ship palette indices.
const T: u8 = 0; // transparent
const K: u8 = 1; // outline
const G: u8 = 2; // hull
const D: u8 = 3; // hull shade
const C: u8 = 4; // canopy
const P: u8 = 5; // wings
const O: u8 = 6; // exhaust
const Y: u8 = 7; // flame

const SHIP_PALETTE: [[u8; 4]; 8] = [
    [0, 0, 0, 0],
    [17, 17, 17, 255],
    [50, 215, 75, 255],
    [26, 138, 46, 255],
    [0, 255, 255, 255],
    [124, 58, 237, 255],
    [255, 136, 0, 255],
    [255, 220, 50, 255],
];

#[rustfmt::skip]
const SHIP_GRID: [[u8; 16]; 16] = [
    [T,T,T,T,T,T,T,K,K,T,T,T,T,T,T,T],
    [T,T,T,T,T,T,K,G,G,K,T,T,T,T,T,T],
    [T,T,T,T,T,K,G,C,C,G,K,T,T,T,T,T],
    [T,T,T,T,T,K,G,G,G,G,K,T,T,T,T,T],
    [T,T,T,T,K,G,D,G,G,D,G,K,T,T,T,T],
    [T,T,T,K,P,G,D,G,G,D,G,P,K,T,T,T],
    [T,T,K,P,P,G,D,G,G,D,G,P,P,K,T,T],
    [T,K,P,P,K,G,K,G,G,K,G,K,P,P,K,T],
    [K,P,P,K,T,K,K,G,G,K,K,T,K,P,P,K],
    [T,K,P,K,T,K,D,G,G,D,K,T,K,P,K,T],
    [T,T,K,T,T,K,D,D,D,D,K,T,T,K,T,T],
    [T,T,T,T,T,K,D,K,K,D,K,T,T,T,T,T],
    [T,T,T,T,T,K,K,K,K,K,K,T,T,T,T,T],
    [T,T,T,T,T,T,O,T,T,O,T,T,T,T,T,T],
    [T,T,T,T,T,T,Y,T,T,Y,T,T,T,T,T,T],
    [T,T,T,T,T,T,T,T,T,T,T,T,T,T,T,T],
];

const INVADER_PALETTE: [[u8; 4]; 2] = [[0, 0, 0, 0], [57, 255, 20, 255]];

#[rustfmt::skip]
const INVADER_GRID: [[u8; 8]; 8] = [
    [0,0,1,1,1,1,0,0],
    [0,1,1,1,1,1,1,0],
    [1,1,0,1,1,0,1,1],
    [1,1,1,1,1,1,1,1],
    [0,0,1,0,0,1,0,0],
    [0,1,0,1,1,0,1,0],
    [1,0,1,0,0,1,0,1],
    [0,0,0,0,0,0,0,0],
];

/// 16×16 starfighter.
pub fn generate_ship() -> Pixmap {
    Pixmap::from_grid(&SHIP_GRID, &SHIP_PALETTE)
}

/// 8×8 single-color invader.
pub fn generate_invader() -> Pixmap {
    Pixmap::from_grid(&INVADER_GRID, &INVADER_PALETTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ship ──────────────────────────────────────────────────────────────

    #[test]
    fn ship_is_16_by_16() {
        let ship = generate_ship();
        assert_eq!((ship.width, ship.height), (16, 16));
        assert_eq!(ship.rgba.len(), 16 * 16 * 4);
    }

    #[test]
    fn ship_pixels_follow_palette() {
        let ship = generate_ship();
        assert_eq!(ship.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(ship.pixel(7, 0), [17, 17, 17, 255]);
        assert_eq!(ship.pixel(7, 2), [0, 255, 255, 255]);
        assert_eq!(ship.pixel(6, 13), [255, 136, 0, 255]);
        assert_eq!(ship.pixel(9, 14), [255, 220, 50, 255]);
    }

    #[test]
    fn ship_is_horizontally_symmetric() {
        let ship = generate_ship();
        for y in 0..16 {
            for x in 0..8 {
                assert_eq!(ship.pixel(x, y), ship.pixel(15 - x, y), "row {y} col {x}");
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate_ship(), generate_ship());
        assert_eq!(generate_invader(), generate_invader());
    }

    // ── invader ───────────────────────────────────────────────────────────

    #[test]
    fn invader_is_8_by_8_green_on_transparent() {
        let inv = generate_invader();
        assert_eq!((inv.width, inv.height), (8, 8));
        assert_eq!(inv.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(inv.pixel(2, 0), [57, 255, 20, 255]);
        // bottom row is empty
        for x in 0..8 {
            assert_eq!(inv.pixel(x, 7)[3], 0);
        }
    }

    // ── url selection ─────────────────────────────────────────────────────

    #[test]
    fn url_substring_selects_generator() {
        assert_eq!(fallback_for_url("assets/ship.png").map(|p| p.width), Some(16));
        assert_eq!(
            fallback_for_url("https://cdn.example/invader_a.png").map(|p| p.width),
            Some(8)
        );
        assert!(fallback_for_url("assets/background.png").is_none());
    }

    #[test]
    fn ship_wins_when_both_substrings_match() {
        let pm = fallback_for_url("ship_vs_invader.png").unwrap();
        assert_eq!(pm.width, 16);
    }
}
