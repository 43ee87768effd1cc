use glam::Vec2;
use serde::Deserialize;
use uuid::Uuid;

use crate::scene::MeshKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Wrap,
    Mirror,
}

impl WrapMode {
    fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Clamp,
            2 => Self::Mirror,
            _ => Self::Wrap,
        }
    }
}

/// Where the pixels of a texture come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// Loaded lazily by the host from a (root-resolved) url.
    Url(String),
    /// Decoded bytes embedded in the project.
    Bytes(Vec<u8>),
    /// Rendered into at runtime.
    RenderTarget,
}

/// Offscreen rendering settings of a render-target texture.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetInfo {
    pub size: u32,
    pub refresh_rate: i32,
    /// Meshes rendered into the target.
    pub render_list: Vec<MeshKey>,
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub uuid: Uuid,
    pub source: Option<TextureSource>,

    pub level: f32,
    pub has_alpha: bool,
    pub is_cube: bool,
    pub coordinates_index: u32,
    pub coordinates_mode: u32,

    pub scale: Vec2,
    pub offset: Vec2,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,

    pub render_target: Option<RenderTargetInfo>,
}

impl Texture {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: Uuid::new_v4(),
            source: None,
            level: 1.0,
            has_alpha: false,
            is_cube: false,
            coordinates_index: 0,
            coordinates_mode: 0,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
            wrap_u: WrapMode::Wrap,
            wrap_v: WrapMode::Wrap,
            render_target: None,
        }
    }

    /// Creates a texture from already-decoded bytes.
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mut texture = Self::new(name);
        texture.source = Some(TextureSource::Bytes(bytes));
        texture
    }

    /// Constructs a new texture from its serialized form.
    ///
    /// `resolve_url` turns the payload url into a loadable location;
    /// `render_list` holds the already-resolved meshes of a render target.
    #[must_use]
    pub fn parse(
        payload: &TexturePayload,
        resolve_url: impl Fn(&str) -> String,
        render_list: Vec<MeshKey>,
    ) -> Self {
        let mut texture = Self::new(payload.name.as_deref().unwrap_or_default());
        if payload.is_render_target {
            texture.source = Some(TextureSource::RenderTarget);
            texture.render_target = Some(RenderTargetInfo {
                size: payload.render_target_size.unwrap_or(256),
                refresh_rate: payload.refresh_rate.unwrap_or(1),
                render_list,
            });
        } else {
            let url = payload.url.as_deref().or(payload.name.as_deref());
            texture.source = url.map(|url| TextureSource::Url(resolve_url(url)));
        }
        texture.apply(payload);
        texture
    }

    /// Applies a serialized texture in place. The source is never reloaded.
    pub fn apply(&mut self, payload: &TexturePayload) {
        if let Some(level) = payload.level {
            self.level = level;
        }
        if let Some(has_alpha) = payload.has_alpha {
            self.has_alpha = has_alpha;
        }
        if let Some(is_cube) = payload.is_cube {
            self.is_cube = is_cube;
        }
        if let Some(index) = payload.coordinates_index {
            self.coordinates_index = index;
        }
        if let Some(mode) = payload.coordinates_mode {
            self.coordinates_mode = mode;
        }
        if let Some(u) = payload.u_scale {
            self.scale.x = u;
        }
        if let Some(v) = payload.v_scale {
            self.scale.y = v;
        }
        if let Some(u) = payload.u_offset {
            self.offset.x = u;
        }
        if let Some(v) = payload.v_offset {
            self.offset.y = v;
        }
        if let Some(wrap) = payload.wrap_u {
            self.wrap_u = WrapMode::from_code(wrap);
        }
        if let Some(wrap) = payload.wrap_v {
            self.wrap_v = WrapMode::from_code(wrap);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_render_target(&self) -> bool {
        self.render_target.is_some()
    }
}

/// Serialized form of a texture, including render-target textures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturePayload {
    pub name: Option<String>,
    pub url: Option<String>,

    pub level: Option<f32>,
    pub has_alpha: Option<bool>,
    pub is_cube: Option<bool>,
    pub coordinates_index: Option<u32>,
    pub coordinates_mode: Option<u32>,

    pub u_scale: Option<f32>,
    pub v_scale: Option<f32>,
    pub u_offset: Option<f32>,
    pub v_offset: Option<f32>,
    pub wrap_u: Option<u32>,
    pub wrap_v: Option<u32>,

    #[serde(default)]
    pub is_render_target: bool,
    pub render_target_size: Option<u32>,
    pub refresh_rate: Option<i32>,
    /// Ids of the meshes rendered into a render target.
    #[serde(default)]
    pub render_list: Vec<String>,
}
