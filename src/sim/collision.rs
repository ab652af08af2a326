//! Collision queries between the player's feet and platform tops
//!
//! Platforms are one-way: they only catch the player from above, so a contact
//! is a downward crossing of the platform's top line during one tick.

use glam::Vec2;

/// Did the feet cross `top` (platform center) moving down this tick?
///
/// `reach` is the combined half width of the feet and the platform.
#[inline]
pub fn feet_cross_platform(prev_feet: Vec2, feet: Vec2, reach: f32, top: Vec2) -> bool {
    if prev_feet.y < top.y || feet.y > top.y {
        return false;
    }
    // Horizontal position at the moment of crossing
    let dy = prev_feet.y - feet.y;
    let t = if dy > f32::EPSILON {
        (prev_feet.y - top.y) / dy
    } else {
        1.0
    };
    let x = prev_feet.x + (feet.x - prev_feet.x) * t;
    (x - top.x).abs() <= reach
}

/// Mirror a horizontal coordinate across the vertical axis once it leaves
/// `[-extent, extent]`
///
/// The result lands on the opposite edge, never beyond it, so the next frame
/// doesn't bounce it straight back.
#[inline]
pub fn wrap_horizontal(x: f32, extent: f32) -> Option<f32> {
    (x.abs() > extent).then(|| -x.clamp(-extent, extent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_from_above() {
        let top = Vec2::new(0.0, 1.0);
        assert!(feet_cross_platform(Vec2::new(0.0, 1.1), Vec2::new(0.0, 0.95), 1.0, top));
        // Landing exactly on the surface counts
        assert!(feet_cross_platform(Vec2::new(0.0, 1.1), Vec2::new(0.0, 1.0), 1.0, top));
    }

    #[test]
    fn test_no_crossing_from_below_or_beside() {
        let top = Vec2::new(0.0, 1.0);
        // Rising through from below
        assert!(!feet_cross_platform(Vec2::new(0.0, 0.9), Vec2::new(0.0, 1.1), 1.0, top));
        // Still above
        assert!(!feet_cross_platform(Vec2::new(0.0, 1.3), Vec2::new(0.0, 1.1), 1.0, top));
        // Beside it
        assert!(!feet_cross_platform(Vec2::new(2.0, 1.1), Vec2::new(2.0, 0.9), 1.0, top));
    }

    #[test]
    fn test_crossing_uses_interpolated_x() {
        let top = Vec2::new(0.0, 1.0);
        // Ends far to the right but crossed the top line at x = 0.5
        assert!(feet_cross_platform(Vec2::new(0.0, 2.0), Vec2::new(1.0, 0.0), 0.6, top));
        assert!(!feet_cross_platform(Vec2::new(0.0, 2.0), Vec2::new(1.0, 0.0), 0.4, top));
    }

    #[test]
    fn test_wrap_horizontal() {
        assert_eq!(wrap_horizontal(3.0, 2.75), Some(-2.75));
        assert_eq!(wrap_horizontal(-2.8, 2.75), Some(2.75));
        assert_eq!(wrap_horizontal(1.0, 2.75), None);
        assert_eq!(wrap_horizontal(2.75, 2.75), None);
    }
}
