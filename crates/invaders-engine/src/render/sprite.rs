use std::collections::HashMap;

use crate::coords::Viewport;
use crate::error::RenderError;

use super::batch::{SpriteBatch, SpriteVertex, MAX_SPRITES, VERTICES_PER_SPRITE};
use super::common::{alpha_blend, begin_pass, uniform_layout, SpriteUniform};
use super::ctx::{RenderCtx, RenderTarget};
use super::shader::{ProgramDesc, ShaderProgram};
use super::texture::{Texture, TextureId};

const SPRITE_VS: &str = include_str!("shaders/sprite_vs.wgsl");
const SPRITE_FS: &str = include_str!("shaders/sprite_fs.wgsl");

/// Batched textured-quad renderer.
///
/// Usage per frame: [`begin`](Self::begin), any number of
/// [`draw_sprite`](Self::draw_sprite), then [`end`](Self::end) with the target.
/// Geometry is in pixels of the viewport passed to `begin`, top-left origin.
pub struct SpriteRenderer {
    program: ShaderProgram,
    batch: SpriteBatch,
    resolution: [f32; 2],

    uniform_ubo: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    vbo: wgpu::Buffer,

    /// Bind groups of textures drawn this frame.
    textures: HashMap<TextureId, wgpu::BindGroup>,
}

impl SpriteRenderer {
    /// Builds the sprite program for `target_format`. Shader failures are fatal.
    pub fn new(ctx: &RenderCtx<'_>, target_format: wgpu::TextureFormat) -> Result<Self, RenderError> {
        let uniform_bgl = uniform_layout(ctx.device, "invaders sprite uniform bgl");

        let program = ShaderProgram::new(
            ctx.device,
            &ProgramDesc {
                label: "invaders sprite program",
                vertex_src: SPRITE_VS,
                fragment_src: SPRITE_FS,
                vertex_buffers: &[SpriteVertex::layout()],
                bind_group_layouts: &[&uniform_bgl, ctx.texture_layout],
                target_format,
                blend: Some(alpha_blend()),
            },
        )?;

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("invaders sprite ubo"),
            size: std::mem::size_of::<SpriteUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("invaders sprite uniform bind group"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        // Sized for one full scratch area; grows if a frame flushes more than that.
        let vbo = create_vbo(ctx.device, MAX_SPRITES * VERTICES_PER_SPRITE);

        Ok(Self {
            program,
            batch: SpriteBatch::new(),
            resolution: [1.0, 1.0],
            uniform_ubo,
            uniform_bind_group,
            vbo,
            textures: HashMap::new(),
        })
    }

    /// Resets the batch and sets the resolution uniform from `viewport`.
    pub fn begin(&mut self, viewport: Viewport) {
        self.batch.begin();
        self.textures.clear();
        self.resolution = [viewport.width.max(1.0), viewport.height.max(1.0)];
    }

    pub fn draw_sprite(&mut self, texture: &Texture, x: f32, y: f32, w: f32, h: f32) {
        if self.batch.draw_sprite(texture.id(), x, y, w, h) {
            self.textures
                .entry(texture.id())
                .or_insert_with(|| texture.bind_group().clone());
        }
    }

    /// Final flush: uploads the frame's vertices once and replays every recorded draw.
    pub fn end(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.batch.end();
        let calls = self.batch.draw_calls();
        if calls.is_empty() {
            return;
        }

        let u = SpriteUniform {
            resolution: self.resolution,
            _pad: [0.0; 2],
            tint: [1.0, 1.0, 1.0, 1.0],
        };
        ctx.queue.write_buffer(&self.uniform_ubo, 0, bytemuck::bytes_of(&u));

        let vertices = self.batch.vertices();
        let needed = (vertices.len() * std::mem::size_of::<SpriteVertex>()) as u64;
        if needed > self.vbo.size() {
            self.vbo = create_vbo(ctx.device, vertices.len().next_power_of_two());
        }
        ctx.queue.write_buffer(&self.vbo, 0, bytemuck::cast_slice(vertices));

        let mut rpass = begin_pass(
            target.encoder,
            target.color_view,
            wgpu::LoadOp::Load,
            "invaders sprite pass",
        );

        self.program.bind(&mut rpass);
        rpass.set_bind_group(0, &self.uniform_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vbo.slice(..));

        let mut bound: Option<TextureId> = None;
        for call in calls {
            if bound != Some(call.texture) {
                let Some(bg) = self.textures.get(&call.texture) else { continue };
                rpass.set_bind_group(1, bg, &[]);
                bound = Some(call.texture);
            }
            rpass.draw(call.first_vertex..call.first_vertex + call.vertex_count, 0..1);
        }
    }
}

fn create_vbo(device: &wgpu::Device, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("invaders sprite vbo"),
        size: (vertices * std::mem::size_of::<SpriteVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
