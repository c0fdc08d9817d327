//! CPU side of sprite batching.
//!
//! Sprites accumulate into a fixed scratch area. A flush moves the populated prefix
//! into the frame's vertex stream and records one [`DrawCall`]. The GPU renderer
//! uploads the stream once per frame and replays the calls in order.

use bytemuck::{Pod, Zeroable};

use super::texture::TextureId;

/// Sprites the scratch area holds before a forced flush.
pub const MAX_SPRITES: usize = 1000;

/// Two triangles per sprite.
pub const VERTICES_PER_SPRITE: usize = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// Pixel space, top-left origin.
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    #[inline]
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// One recorded flush: draw `vertex_count` vertices from `first_vertex` with `texture` bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: TextureId,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

pub struct SpriteBatch {
    scratch: Box<[SpriteVertex]>,
    count: usize,
    current: Option<TextureId>,

    stream: Vec<SpriteVertex>,
    calls: Vec<DrawCall>,
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self {
            scratch: vec![SpriteVertex::zeroed(); MAX_SPRITES * VERTICES_PER_SPRITE]
                .into_boxed_slice(),
            count: 0,
            current: None,
            stream: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Starts a frame: empties the scratch area, the stream and the call list,
    /// and forgets the bound texture.
    pub fn begin(&mut self) {
        self.count = 0;
        self.current = None;
        self.stream.clear();
        self.calls.clear();
    }

    /// Appends one axis-aligned quad with its top-left corner at (`x`, `y`).
    ///
    /// Returns `true` when the texture differs from the bound one, i.e. the caller
    /// must bind `texture` before the next draw.
    pub fn draw_sprite(&mut self, texture: TextureId, x: f32, y: f32, w: f32, h: f32) -> bool {
        if self.count >= MAX_SPRITES {
            self.flush();
        }

        let switched = self.current != Some(texture);
        if switched {
            self.flush();
            self.current = Some(texture);
        }

        let (x0, y0, x1, y1) = (x, y, x + w, y + h);
        let base = self.count * VERTICES_PER_SPRITE;
        self.scratch[base..base + VERTICES_PER_SPRITE].copy_from_slice(&[
            SpriteVertex::new(x0, y0, 0.0, 0.0),
            SpriteVertex::new(x1, y0, 1.0, 0.0),
            SpriteVertex::new(x0, y1, 0.0, 1.0),
            SpriteVertex::new(x1, y0, 1.0, 0.0),
            SpriteVertex::new(x1, y1, 1.0, 1.0),
            SpriteVertex::new(x0, y1, 0.0, 1.0),
        ]);
        self.count += 1;

        switched
    }

    /// Moves the populated prefix into the stream as one draw call. No-op when empty.
    pub fn flush(&mut self) {
        if self.count == 0 {
            return;
        }
        let Some(texture) = self.current else {
            self.count = 0;
            return;
        };

        let used = self.count * VERTICES_PER_SPRITE;
        let first_vertex = self.stream.len() as u32;
        self.stream.extend_from_slice(&self.scratch[..used]);
        self.calls.push(DrawCall {
            texture,
            first_vertex,
            vertex_count: used as u32,
        });
        self.count = 0;
    }

    /// Final flush for the frame.
    pub fn end(&mut self) {
        self.flush();
    }

    /// Sprites waiting in the scratch area.
    #[inline]
    pub fn pending(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.stream
    }

    #[inline]
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (TextureId, TextureId) {
        (TextureId::next(), TextureId::next())
    }

    // ── flush rules ───────────────────────────────────────────────────────

    #[test]
    fn empty_frame_records_nothing() {
        let mut b = SpriteBatch::new();
        b.begin();
        b.flush();
        b.end();
        assert!(b.draw_calls().is_empty());
        assert!(b.vertices().is_empty());
    }

    #[test]
    fn same_texture_sprites_share_one_call() {
        let (a, _) = ids();
        let mut b = SpriteBatch::new();
        b.begin();
        assert!(b.draw_sprite(a, 0.0, 0.0, 8.0, 8.0));
        for i in 1..50 {
            assert!(!b.draw_sprite(a, i as f32, 0.0, 8.0, 8.0));
        }
        b.end();
        assert_eq!(
            b.draw_calls(),
            &[DrawCall {
                texture: a,
                first_vertex: 0,
                vertex_count: 300
            }]
        );
    }

    #[test]
    fn texture_switch_flushes_previous_run() {
        let (a, c) = ids();
        let mut b = SpriteBatch::new();
        b.begin();
        b.draw_sprite(a, 0.0, 0.0, 1.0, 1.0);
        b.draw_sprite(a, 0.0, 0.0, 1.0, 1.0);
        b.draw_sprite(c, 0.0, 0.0, 1.0, 1.0);
        b.draw_sprite(a, 0.0, 0.0, 1.0, 1.0);
        b.end();

        let calls: Vec<_> = b
            .draw_calls()
            .iter()
            .map(|d| (d.texture, d.first_vertex, d.vertex_count))
            .collect();
        assert_eq!(calls, vec![(a, 0, 12), (c, 12, 6), (a, 18, 6)]);
    }

    #[test]
    fn capacity_forces_flush() {
        let (a, _) = ids();
        let mut b = SpriteBatch::new();
        b.begin();
        for _ in 0..MAX_SPRITES + 1 {
            b.draw_sprite(a, 0.0, 0.0, 1.0, 1.0);
        }
        assert_eq!(b.draw_calls().len(), 1);
        assert_eq!(b.draw_calls()[0].vertex_count as usize, MAX_SPRITES * 6);
        assert_eq!(b.pending(), 1);
        b.end();
        assert_eq!(b.draw_calls().len(), 2);
        assert_eq!(b.draw_calls()[1].vertex_count, 6);
    }

    #[test]
    fn begin_resets_bound_texture() {
        let (a, _) = ids();
        let mut b = SpriteBatch::new();
        b.begin();
        b.draw_sprite(a, 0.0, 0.0, 1.0, 1.0);
        b.end();
        b.begin();
        assert!(b.draw_sprite(a, 0.0, 0.0, 1.0, 1.0));
        assert_eq!(b.draw_calls().len(), 0);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn quad_covers_rect_with_unit_uvs() {
        let (a, _) = ids();
        let mut b = SpriteBatch::new();
        b.begin();
        b.draw_sprite(a, 10.0, 20.0, 30.0, 40.0);
        b.end();

        let v = b.vertices();
        assert_eq!(v.len(), 6);
        assert_eq!(v[0], SpriteVertex::new(10.0, 20.0, 0.0, 0.0));
        assert_eq!(v[1], SpriteVertex::new(40.0, 20.0, 1.0, 0.0));
        assert_eq!(v[2], SpriteVertex::new(10.0, 60.0, 0.0, 1.0));
        assert_eq!(v[4], SpriteVertex::new(40.0, 60.0, 1.0, 1.0));
    }
}
