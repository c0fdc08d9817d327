//! Shared GPU types and utilities used by the sprite and CRT passes.

use bytemuck::{Pod, Zeroable};

use super::batch::SpriteVertex;

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight (non-premultiplied) alpha, matching decoded PNG data.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}

// ── uniforms ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct SpriteUniform {
    pub resolution: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
    pub tint: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CrtUniform {
    pub time: f32,
    pub _pad: [f32; 3],
}

pub(super) fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

// ── full-screen quad ──────────────────────────────────────────────────────

/// Two triangles covering NDC. V is flipped: texture rows run top to bottom.
pub(super) const FULLSCREEN_QUAD: [SpriteVertex; 6] = [
    SpriteVertex::new(-1.0, -1.0, 0.0, 1.0),
    SpriteVertex::new(1.0, -1.0, 1.0, 1.0),
    SpriteVertex::new(-1.0, 1.0, 0.0, 0.0),
    SpriteVertex::new(-1.0, 1.0, 0.0, 0.0),
    SpriteVertex::new(1.0, -1.0, 1.0, 1.0),
    SpriteVertex::new(1.0, 1.0, 1.0, 0.0),
];

// ── passes ────────────────────────────────────────────────────────────────

pub(super) fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &'e wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}
