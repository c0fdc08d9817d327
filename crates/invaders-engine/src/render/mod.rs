//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) for its whole lifetime.
//!
//! Convention:
//! - CPU geometry is in play-field pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a resolution uniform.

mod batch;
mod common;
mod ctx;
mod fallback;
mod post;
mod shader;
mod sprite;
mod texture;

pub use batch::{DrawCall, SpriteBatch, SpriteVertex, MAX_SPRITES, VERTICES_PER_SPRITE};
pub use ctx::{RenderCtx, RenderTarget};
pub use fallback::{fallback_for_url, generate_invader, generate_ship, Pixmap};
pub use post::PostProcessor;
pub use shader::{compile_stage, link_stages, ProgramDesc, ShaderProgram};
pub use sprite::SpriteRenderer;
pub use texture::{
    texture_bind_group_layout, LoadError, Texture, TextureId, TextureInfo, TextureSource,
};
