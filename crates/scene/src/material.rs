use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Linear RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `0xRRGGBB`, fully opaque.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Index of a texture in a [`TextureStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Per-frame refresh contract for textures whose content changes over time.
pub trait Refreshable {
    /// Mark the current content stale so the next draw re-uploads it.
    fn refresh(&mut self);

    /// Number of refreshes so far.
    fn generation(&self) -> u64;
}

/// A texture decoded once from a still image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTexture {
    pub source: PathBuf,
    /// Flat colour used by backends that do not sample the image.
    pub tint: Color,
}

/// A texture fed by a playing video stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoTexture {
    pub source: PathBuf,
    pub tint: Color,
    generation: u64,
}

impl VideoTexture {
    pub fn new(source: impl Into<PathBuf>, tint: Color) -> Self {
        Self {
            source: source.into(),
            tint,
            generation: 0,
        }
    }
}

impl Refreshable for VideoTexture {
    fn refresh(&mut self) {
        self.generation += 1;
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Texture {
    Image(ImageTexture),
    Video(VideoTexture),
}

impl Texture {
    pub fn tint(&self) -> Color {
        match self {
            Self::Image(t) => t.tint,
            Self::Video(t) => t.tint,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video(_))
    }
}

/// Owns every texture in the scene. Materials refer to entries by id.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    textures: Vec<Texture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Every texture that needs a per-frame refresh.
    pub fn refreshables_mut(&mut self) -> impl Iterator<Item = &mut dyn Refreshable> {
        self.textures.iter_mut().filter_map(|t| match t {
            Texture::Video(v) => Some(v as &mut dyn Refreshable),
            Texture::Image(_) => None,
        })
    }

    /// Refresh all video textures. Returns how many were refreshed.
    pub fn refresh_all(&mut self) -> usize {
        let mut n = 0;
        for t in self.refreshables_mut() {
            t.refresh();
            n += 1;
        }
        n
    }
}

/// Highlight material drawn around a hovered box.
///
/// Samples the box's own texture in the interior and blends to `color` within
/// `border` (UV units) of each edge; geometry is inflated by `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineParams {
    pub texture: Option<TextureId>,
    pub color: Color,
    pub border: f32,
    pub scale: f32,
}

impl OutlineParams {
    pub fn around(texture: Option<TextureId>) -> Self {
        Self {
            texture,
            color: Color::CYAN,
            border: 0.02,
            scale: 1.15,
        }
    }
}

/// Surface appearance of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Colour from surface normals; used for untextured boxes.
    Normal,
    /// Unlit colour, optionally modulated by a texture.
    Basic { map: Option<TextureId>, color: Color },
    Outline(OutlineParams),
    /// Transmissive glass-like surface.
    Physical { roughness: f32, transmission: f32 },
}

impl Material {
    pub fn textured(map: TextureId) -> Self {
        Self::Basic {
            map: Some(map),
            color: Color::WHITE,
        }
    }

    pub fn flat(color: Color) -> Self {
        Self::Basic { map: None, color }
    }

    pub fn glass() -> Self {
        Self::Physical {
            roughness: 0.0,
            transmission: 1.0,
        }
    }

    /// Texture sampled by this material, if any.
    pub fn map(&self) -> Option<TextureId> {
        match self {
            Self::Basic { map, .. } => *map,
            Self::Outline(o) => o.texture,
            Self::Normal | Self::Physical { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Basic { map: Some(_), .. } => "textured",
            Self::Basic { map: None, .. } => "flat",
            Self::Outline(_) => "outline",
            Self::Physical { .. } => "physical",
        }
    }

    /// Single representative colour for backends that do not sample textures.
    pub fn base_color(&self, textures: &TextureStore) -> Color {
        match self {
            Self::Normal => Color::WHITE,
            Self::Basic { map, color } => map
                .and_then(|id| textures.get(id))
                .map(Texture::tint)
                .unwrap_or(*color),
            Self::Outline(o) => o.color,
            Self::Physical { .. } => Color {
                a: 0.25,
                ..Color::WHITE
            },
        }
    }
}
