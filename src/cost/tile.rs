//! Tile-based image token pricing.
//!
//! Images are billed as a fixed base plus a per-tile charge after two
//! shrink-only clamp stages: the longer side is clamped to 2048 pixels
//! preserving aspect ratio, then the shorter side is clamped to 768.
//! The clamped image is covered with 512x512 tiles and each tile is
//! charged on top of the base.

/// Longest side allowed after the bounding-box clamp.
pub const MAX_LONG_SIDE: u32 = 2048;

/// Shortest side allowed after the second clamp stage.
pub const MAX_SHORT_SIDE: u32 = 768;

/// Edge length of one billing tile.
pub const TILE_SIZE: u32 = 512;

/// Fixed token charge per image.
pub const BASE_TOKENS: u64 = 85;

/// Token charge per 512x512 tile.
pub const TOKENS_PER_TILE: u64 = 170;

/// Compute the billed token count for an image of the given pixel size.
///
/// Both dimensions must be positive; zero dimensions have no aspect
/// ratio and must be rejected by the caller before this point. All
/// scaling uses integer floor division, matching the billing model's
/// truncation semantics. Neither clamp stage ever enlarges a dimension.
///
/// # Example
///
/// ```
/// use pdftally::cost::tile_cost;
///
/// assert_eq!(tile_cost(100, 100), 255);
/// assert_eq!(tile_cost(1024, 1024), 765);
/// assert_eq!(tile_cost(3000, 1000), 1445);
/// ```
pub fn tile_cost(width: u32, height: u32) -> u64 {
    debug_assert!(
        width > 0 && height > 0,
        "zero-sized image has no aspect ratio"
    );

    let (mut w, mut h) = (width as u64, height as u64);
    let long = MAX_LONG_SIDE as u64;
    let short = MAX_SHORT_SIDE as u64;
    let tile = TILE_SIZE as u64;

    // Stage 1: clamp the longer side to 2048, preserving aspect ratio.
    if w > long || h > long {
        if w >= h {
            h = long * h / w;
            w = long;
        } else {
            w = long * w / h;
            h = long;
        }
    }

    // Stage 2: clamp the shorter side to 768. At most one branch fires;
    // square images take the first.
    if w >= h && h > short {
        w = w * short / h;
        h = short;
    } else if h > w && w > short {
        h = h * short / w;
        w = short;
    }

    let tiles_w = w.div_ceil(tile);
    let tiles_h = h.div_ceil(tile);

    BASE_TOKENS + TOKENS_PER_TILE * tiles_w * tiles_h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tile_minimum() {
        assert_eq!(tile_cost(1, 1), 255);
        assert_eq!(tile_cost(100, 100), 255);
        assert_eq!(tile_cost(512, 512), 255);
    }

    #[test]
    fn test_all_small_sizes_cost_minimum() {
        for w in [1, 64, 256, 512] {
            for h in [1, 64, 256, 512] {
                assert_eq!(tile_cost(w, h), 255, "{}x{}", w, h);
            }
        }
    }

    #[test]
    fn test_square_clamps_to_768() {
        // 1024x1024 and 2048x2048 both end at 768x768 after the
        // short-side clamp: 2x2 tiles.
        assert_eq!(tile_cost(1024, 1024), 85 + 170 * 2 * 2);
        assert_eq!(tile_cost(2048, 2048), 85 + 170 * 2 * 2);
    }

    #[test]
    fn test_wide_image_skips_short_side_clamp() {
        // 4096x1024 clamps to 2048x512; 512 is already under 768, so the
        // second stage does not fire. Tiles: 4x1.
        assert_eq!(tile_cost(4096, 1024), 85 + 170 * 4);
    }

    #[test]
    fn test_landscape_clamp_truncates() {
        // 3000x1000 clamps to 2048x682 (floor of 2048*1000/3000); the
        // short side is under 768 so stage two is skipped. Tiles: 4x2.
        assert_eq!(tile_cost(3000, 1000), 85 + 170 * 4 * 2);
    }

    #[test]
    fn test_portrait_mirrors_landscape() {
        assert_eq!(tile_cost(1000, 3000), tile_cost(3000, 1000));
        assert_eq!(tile_cost(1024, 4096), tile_cost(4096, 1024));
    }

    #[test]
    fn test_bounding_box_scaling_invariance() {
        // Doubling both sides above the bounding box changes nothing.
        assert_eq!(tile_cost(4096, 4096), tile_cost(2048, 2048));
        assert_eq!(tile_cost(8192, 8192), tile_cost(2048, 2048));
        assert_eq!(tile_cost(6000, 2000), tile_cost(3000, 1000));
    }

    #[test]
    fn test_tall_narrow_image() {
        // 10x5000 clamps to 4x2048, then height>width with width 4 not
        // above 768: stage two skipped. Tiles: 1x4.
        assert_eq!(tile_cost(10, 5000), 85 + 170 * 4);
    }

    #[test]
    fn test_minimum_cost_floor() {
        for (w, h) in [(1, 1), (640, 480), (5000, 3000), (10000, 10)] {
            assert!(tile_cost(w, h) >= 255, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_pure_and_idempotent() {
        assert_eq!(tile_cost(1920, 1080), tile_cost(1920, 1080));
        assert_eq!(tile_cost(3000, 1000), 1445);
        assert_eq!(tile_cost(3000, 1000), 1445);
    }
}
