//! Viewport - zoom and pan transform between world and screen space.

use emath::{Pos2, Vec2};

/// Smallest zoom level a viewport accepts.
pub const MIN_ZOOM_FLOOR: f32 = 0.01;

/// Zoom/pan transform: `screen = world * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub translate: Vec2,
    min_scale: f32,
    max_scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.1, 4.0)
    }
}

impl Viewport {
    /// Identity transform with the given zoom limits.
    ///
    /// Limits are put in order and floored at [`MIN_ZOOM_FLOOR`]; a
    /// non-finite limit falls back to the default extent.
    pub fn new(min_scale: f32, max_scale: f32) -> Self {
        let (min_scale, max_scale) = if min_scale.is_finite() && max_scale.is_finite() {
            (min_scale.min(max_scale), min_scale.max(max_scale))
        } else {
            (0.1, 4.0)
        };
        let min_scale = min_scale.max(MIN_ZOOM_FLOOR);
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
            min_scale,
            max_scale: max_scale.max(min_scale),
        }
    }

    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.scale + self.translate).to_pos2()
    }

    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.translate) / self.scale).to_pos2()
    }

    /// Zoom by `factor` keeping the screen point `anchor` fixed.
    pub fn zoom_by(&mut self, factor: f32, anchor: Pos2) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world_anchor = self.to_world(anchor);
        self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        self.translate = anchor.to_vec2() - world_anchor.to_vec2() * self.scale;
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.translate += delta;
        }
    }

    /// Back to the identity transform.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.translate = Vec2::ZERO;
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.translate == Vec2::ZERO
    }

    /// SVG `transform` attribute value.
    pub fn transform_attr(&self) -> String {
        format!(
            "translate({:.2},{:.2}) scale({:.4})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_transform() {
        let mut viewport = Viewport::default();
        viewport.zoom_by(2.0, Pos2::new(100.0, 100.0));
        viewport.pan(Vec2::new(10.0, -5.0));

        let world = Pos2::new(37.0, 12.0);
        let back = viewport.to_world(viewport.to_screen(world));
        assert!(back.distance(world) < 1e-3);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut viewport = Viewport::default();
        let anchor = Pos2::new(200.0, 150.0);
        let before = viewport.to_world(anchor);

        viewport.zoom_by(1.5, anchor);

        assert_eq!(viewport.scale, 1.5);
        assert!(viewport.to_world(anchor).distance(before) < 1e-3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::new(0.5, 2.0);
        viewport.zoom_by(100.0, Pos2::ZERO);
        assert_eq!(viewport.scale, 2.0);
        viewport.zoom_by(0.001, Pos2::ZERO);
        assert_eq!(viewport.scale, 0.5);
        viewport.zoom_by(-1.0, Pos2::ZERO);
        assert_eq!(viewport.scale, 0.5);
    }

    #[test]
    fn test_reversed_limits_are_reordered() {
        let mut viewport = Viewport::new(4.0, 0.5);
        assert_eq!(viewport.min_scale(), 0.5);
        assert_eq!(viewport.max_scale(), 4.0);

        viewport.zoom_by(10.0, Pos2::new(10.0, 10.0));
        assert_eq!(viewport.scale, 4.0);
    }

    #[test]
    fn test_zero_and_nan_limits_stay_usable() {
        let mut viewport = Viewport::new(0.0, 0.0);
        assert_eq!(viewport.min_scale(), MIN_ZOOM_FLOOR);
        assert_eq!(viewport.max_scale(), MIN_ZOOM_FLOOR);
        viewport.zoom_by(0.5, Pos2::ZERO);
        assert!(viewport.to_world(Pos2::new(1.0, 1.0)).is_finite());

        let fallback = Viewport::new(f32::NAN, 2.0);
        assert_eq!(fallback, Viewport::default());
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::default();
        viewport.zoom_by(3.0, Pos2::new(50.0, 50.0));
        viewport.pan(Vec2::new(20.0, 20.0));
        assert!(!viewport.is_identity());

        viewport.reset();
        assert!(viewport.is_identity());
        assert_eq!(viewport.transform_attr(), "translate(0.00,0.00) scale(1.0000)");
    }
}
