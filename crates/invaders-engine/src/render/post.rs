use wgpu::util::DeviceExt;

use crate::coords::{ColorRgba, Viewport};
use crate::error::RenderError;

use super::batch::SpriteVertex;
use super::common::{begin_pass, uniform_layout, CrtUniform, FULLSCREEN_QUAD};
use super::ctx::RenderCtx;
use super::shader::{ProgramDesc, ShaderProgram};
use super::texture::Texture;

const CRT_VS: &str = include_str!("shaders/crt_vs.wgsl");
const CRT_FS: &str = include_str!("shaders/crt_fs.wgsl");

/// Off-screen scene target plus the CRT composite pass.
///
/// Sprites draw into the scene texture (sized to the play field); the composite
/// stretches it over the whole surface through the CRT shader.
pub struct PostProcessor {
    field: Viewport,
    format: wgpu::TextureFormat,

    scene: Texture,
    scene_view: wgpu::TextureView,

    program: ShaderProgram,
    quad_vbo: wgpu::Buffer,
    crt_ubo: wgpu::Buffer,
    crt_bind_group: wgpu::BindGroup,
}

impl PostProcessor {
    pub fn new(ctx: &RenderCtx<'_>, field: Viewport) -> Result<Self, RenderError> {
        let format = ctx.surface_format;
        let crt_bgl = uniform_layout(ctx.device, "invaders crt uniform bgl");

        let program = ShaderProgram::new(
            ctx.device,
            &ProgramDesc {
                label: "invaders crt program",
                vertex_src: CRT_VS,
                fragment_src: CRT_FS,
                vertex_buffers: &[SpriteVertex::layout()],
                bind_group_layouts: &[ctx.texture_layout, &crt_bgl],
                target_format: format,
                blend: None,
            },
        )?;

        let (scene, scene_view) =
            Texture::offscreen(ctx, field.width as u32, field.height as u32, format);

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("invaders crt quad vbo"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let crt_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("invaders crt ubo"),
            size: std::mem::size_of::<CrtUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let crt_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("invaders crt bind group"),
            layout: &crt_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: crt_ubo.as_entire_binding(),
            }],
        });

        Ok(Self {
            field,
            format,
            scene,
            scene_view,
            program,
            quad_vbo,
            crt_ubo,
            crt_bind_group,
        })
    }

    /// Play-field size the scene target was created with.
    #[inline]
    pub fn field(&self) -> Viewport {
        self.field
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Clears the scene target to opaque black and returns it for sprite drawing.
    pub fn bind_for_writing(&self, encoder: &mut wgpu::CommandEncoder) -> &wgpu::TextureView {
        let _rpass = begin_pass(
            encoder,
            &self.scene_view,
            wgpu::LoadOp::Clear(ColorRgba::black().to_wgpu()),
            "invaders scene clear",
        );
        &self.scene_view
    }

    /// Draws the scene through the CRT shader into `surface_view`.
    ///
    /// `time` is elapsed seconds; it drives scanline drift and flicker.
    pub fn render_to_screen(
        &self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        time: f32,
    ) {
        let u = CrtUniform {
            time,
            _pad: [0.0; 3],
        };
        ctx.queue.write_buffer(&self.crt_ubo, 0, bytemuck::bytes_of(&u));

        let mut rpass = begin_pass(
            encoder,
            surface_view,
            wgpu::LoadOp::Clear(ColorRgba::black().to_wgpu()),
            "invaders crt pass",
        );
        self.program.bind(&mut rpass);
        self.scene.bind(&mut rpass, 0);
        rpass.set_bind_group(1, &self.crt_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);
    }
}
