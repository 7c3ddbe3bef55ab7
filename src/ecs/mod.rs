pub mod components;
pub mod systems;

use glam::Vec2;

/// Window size in pixels, as seen by the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub w: f32,
    pub h: f32,
}

impl Viewport {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Clamp `p` to the window shrunk by `margin` on every side.
    pub fn clamp(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(margin, (self.w - margin).max(margin)),
            p.y.clamp(margin, (self.h - margin).max(margin)),
        )
    }
}
