use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::RgbaImage;

use super::ctx::RenderCtx;
use super::fallback::{fallback_for_url, Pixmap};

const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 255, 255];

/// Identity of a [`Texture`], stable across in-place content replacement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

impl TextureId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Why an asynchronous texture load failed. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch `{0}`")]
    Fetch(String),
    #[error("failed to decode `{0}`")]
    Decode(String),
}

/// Which content a texture currently holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureSource {
    Placeholder,
    Image,
    Fallback,
    /// Off-screen color target filled by render passes.
    Offscreen,
}

/// Logical state of a texture, independent of the GPU resource.
///
/// Width and height stay 0 until an image or a fallback sprite replaces the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub source: TextureSource,
}

/// Pixel data that must be uploaded after a load resolves.
#[derive(Debug)]
pub(crate) enum Upload {
    /// Full mip chain, level 0 first.
    Mipmapped(Vec<RgbaImage>),
    /// Single level, nearest filtering.
    PixelArt(Pixmap),
}

impl TextureInfo {
    pub fn placeholder() -> Self {
        Self {
            width: 0,
            height: 0,
            source: TextureSource::Placeholder,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Applies the outcome of a load for `url` and returns what to upload, if anything.
    ///
    /// An image wider or taller than `max_dimension` cannot be created on the device
    /// and takes the fallback path like a decode failure.
    pub(crate) fn resolve(
        &mut self,
        url: &str,
        result: Result<RgbaImage, LoadError>,
        max_dimension: u32,
    ) -> Option<Upload> {
        let result = result.and_then(|img| {
            if img.width() > max_dimension || img.height() > max_dimension {
                log::warn!(
                    "`{url}` is {}×{}, over the device limit of {max_dimension}",
                    img.width(),
                    img.height()
                );
                Err(LoadError::Decode(url.to_owned()))
            } else {
                Ok(img)
            }
        });
        match result {
            Ok(img) => {
                self.width = img.width();
                self.height = img.height();
                self.source = TextureSource::Image;
                Some(Upload::Mipmapped(build_mip_chain(img)))
            }
            Err(err) => match fallback_for_url(url) {
                Some(pm) => {
                    log::warn!("{err}; using procedural sprite");
                    self.width = pm.width;
                    self.height = pm.height;
                    self.source = TextureSource::Fallback;
                    Some(Upload::PixelArt(pm))
                }
                None => {
                    log::warn!("{err}; no procedural sprite matches, keeping placeholder");
                    None
                }
            },
        }
    }
}

/// Halves `base` until 1×1. Level 0 is `base` itself.
pub(crate) fn build_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![base];
    loop {
        let (w, h) = levels[levels.len() - 1].dimensions();
        if w <= 1 && h <= 1 {
            break;
        }
        let next = image::imageops::resize(
            &levels[levels.len() - 1],
            (w / 2).max(1),
            (h / 2).max(1),
            image::imageops::FilterType::Triangle,
        );
        levels.push(next);
    }
    levels
}

/// Reads `url` (http(s) or a file path) and decodes it to RGBA8.
pub(crate) fn fetch_rgba(url: &str) -> Result<RgbaImage, LoadError> {
    let bytes = if url.starts_with("http://") || url.starts_with("https://") {
        reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map(|b| b.to_vec())
            .map_err(|_| LoadError::Fetch(url.to_owned()))?
    } else {
        std::fs::read(url).map_err(|_| LoadError::Fetch(url.to_owned()))?
    };

    image::load_from_memory(&bytes)
        .map(|img| img.to_rgba8())
        .map_err(|_| LoadError::Decode(url.to_owned()))
}

/// Layout shared by every sampled texture: texture view at 0, sampler at 1.
pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("invaders texture bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

struct Pending {
    url: String,
    rx: Receiver<Result<RgbaImage, LoadError>>,
}

/// A sampled 2D image.
///
/// Starts as a 1×1 opaque placeholder. [`Texture::load`] fetches in the background;
/// [`Texture::poll`] swaps the contents in place once the result arrives.
pub struct Texture {
    id: TextureId,
    info: TextureInfo,
    bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
    pending: Option<Pending>,
}

impl Texture {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let (texture, bind_group) = upload_levels(
            ctx,
            &[(1, 1, &PLACEHOLDER_RGBA[..])],
            wgpu::FilterMode::Nearest,
        );
        Self {
            id: TextureId::next(),
            info: TextureInfo::placeholder(),
            bind_group,
            _texture: texture,
            pending: None,
        }
    }

    /// Sampled color target of `width`×`height` in `format`, with linear filtering.
    ///
    /// Returns the view render passes draw into alongside the texture.
    pub(crate) fn offscreen(
        ctx: &RenderCtx<'_>,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> (Self, wgpu::TextureView) {
        let (width, height) = (width.max(1), height.max(1));
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("invaders offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = sampled_bind_group(ctx, &view, wgpu::FilterMode::Linear);

        let tex = Self {
            id: TextureId::next(),
            info: TextureInfo {
                width,
                height,
                source: TextureSource::Offscreen,
            },
            bind_group,
            _texture: texture,
            pending: None,
        };
        (tex, view)
    }

    /// Placeholder texture with a load of `url` already in flight.
    pub fn from_url(ctx: &RenderCtx<'_>, url: &str) -> Self {
        let mut tex = Self::new(ctx);
        tex.load(url);
        tex
    }

    /// Starts a background load. A load already in flight is abandoned.
    pub fn load(&mut self, url: &str) {
        let (tx, rx) = mpsc::channel();
        let owned = url.to_owned();
        let spawned = thread::Builder::new()
            .name("texture-load".into())
            .spawn(move || {
                let _ = tx.send(fetch_rgba(&owned));
            });

        match spawned {
            Ok(_) => {
                self.pending = Some(Pending {
                    url: url.to_owned(),
                    rx,
                })
            }
            Err(e) => log::warn!("could not spawn loader for `{url}`: {e}"),
        }
    }

    /// Applies a finished load, if any. Call once per frame.
    pub fn poll(&mut self, ctx: &RenderCtx<'_>) {
        let Some(pending) = &self.pending else {
            return;
        };
        let result = match pending.rx.try_recv() {
            Ok(r) => r,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(LoadError::Fetch(pending.url.clone())),
        };
        let url = pending.url.clone();
        self.pending = None;

        let max_dimension = ctx.device.limits().max_texture_dimension_2d;
        match self.info.resolve(&url, result, max_dimension) {
            Some(Upload::Mipmapped(levels)) => {
                let slices: Vec<(u32, u32, &[u8])> = levels
                    .iter()
                    .map(|l| (l.width(), l.height(), l.as_raw().as_slice()))
                    .collect();
                self.replace(ctx, &slices, wgpu::FilterMode::Nearest);
                log::debug!("texture `{url}` loaded ({}×{})", self.info.width, self.info.height);
            }
            Some(Upload::PixelArt(pm)) => {
                self.replace(ctx, &[(pm.width, pm.height, pm.rgba.as_slice())], wgpu::FilterMode::Nearest);
            }
            None => {}
        }
    }

    fn replace(&mut self, ctx: &RenderCtx<'_>, levels: &[(u32, u32, &[u8])], filter: wgpu::FilterMode) {
        let (texture, bind_group) = upload_levels(ctx, levels, filter);
        self._texture = texture;
        self.bind_group = bind_group;
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn info(&self) -> &TextureInfo {
        &self.info
    }

    /// Logical width; 0 until loaded.
    #[inline]
    pub fn width(&self) -> u32 {
        self.info.width
    }

    /// Logical height; 0 until loaded.
    #[inline]
    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Activates this texture on bind-group `slot` of `pass`.
    #[inline]
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, slot: u32) {
        pass.set_bind_group(slot, &self.bind_group, &[]);
    }
}

/// Creates an sRGB texture with one mip level per entry and its bind group.
fn upload_levels(
    ctx: &RenderCtx<'_>,
    levels: &[(u32, u32, &[u8])],
    filter: wgpu::FilterMode,
) -> (wgpu::Texture, wgpu::BindGroup) {
    let (w, h, _) = levels[0];
    let size = wgpu::Extent3d {
        width: w,
        height: h,
        depth_or_array_layers: 1,
    };

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("invaders sprite texture"),
        size,
        mip_level_count: levels.len() as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (mip, &(lw, lh, data)) in levels.iter().enumerate() {
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: mip as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * lw),
                rows_per_image: Some(lh),
            },
            wgpu::Extent3d {
                width: lw,
                height: lh,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = sampled_bind_group(ctx, &view, filter);
    (texture, bind_group)
}

fn sampled_bind_group(
    ctx: &RenderCtx<'_>,
    view: &wgpu::TextureView,
    filter: wgpu::FilterMode,
) -> wgpu::BindGroup {
    let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("invaders texture sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    });

    ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("invaders texture bind group"),
        layout: ctx.texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}
