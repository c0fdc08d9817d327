/// Viewport size in pixels.
///
/// Renderers treat this as the coordinate basis for converting pixel positions
/// to NDC in shaders; the game uses it as the play-field size.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport as a rect anchored at the origin.
    #[inline]
    pub fn bounds(self) -> super::Rect {
        super::Rect::new(0.0, 0.0, self.width, self.height)
    }
}
