//! Block shape catalog
//!
//! Each entry pairs a sprite (image key + size) with a tint color. The
//! collider kind follows from the image key: "square" sprites get a box,
//! everything else a hull traced from the sprite's opaque pixels.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Block sprite identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeId {
    /// Flat 4x1 slab
    Square256x64,
    /// 2x2 square
    Square128x128,
    Shape1,
    Shape2,
    /// Mirror image of `Shape1`
    Shape1Flipped,
    /// Mirror image of `Shape2`
    Shape2Flipped,
}

impl ShapeId {
    /// Texture name the host engine loads for this shape
    pub fn image_key(&self) -> &'static str {
        match self {
            ShapeId::Square256x64 => "square_256x64",
            ShapeId::Square128x128 => "square_128x128",
            ShapeId::Shape1 => "shape_1",
            ShapeId::Shape2 => "shape_2",
            ShapeId::Shape1Flipped => "shape_1_f",
            ShapeId::Shape2Flipped => "shape_2_f",
        }
    }

    /// Native sprite size in field units
    pub fn sprite_size(&self) -> Vec2 {
        match self {
            ShapeId::Square256x64 => Vec2::new(256.0, 64.0),
            ShapeId::Square128x128 => Vec2::new(128.0, 128.0),
            ShapeId::Shape1 | ShapeId::Shape2 | ShapeId::Shape1Flipped | ShapeId::Shape2Flipped => {
                Vec2::new(192.0, 128.0)
            }
        }
    }

    pub fn collider_kind(&self) -> ColliderKind {
        if self.image_key().starts_with("square") {
            ColliderKind::Box
        } else {
            ColliderKind::Hull
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderKind {
    /// Axis-aligned box matching the sprite bounds
    Box,
    /// Polygon hull derived from the sprite's opaque pixels
    Hull,
}

/// Collision shape handed to the physics backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Box { size: Vec2 },
    /// The backend traces the hull from the texture named by `shape`
    Hull { shape: ShapeId, size: Vec2 },
}

impl Collider {
    pub fn for_spec(spec: &ShapeSpec) -> Self {
        match spec.shape.collider_kind() {
            ColliderKind::Box => Collider::Box {
                size: spec.effective_size(),
            },
            ColliderKind::Hull => Collider::Hull {
                shape: spec.shape,
                size: spec.effective_size(),
            },
        }
    }
}

/// Tint colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColor {
    Red,
    Green,
    Blue,
    Yellow,
    White,
}

impl BlockColor {
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            BlockColor::Red => [1.0, 0.0, 0.0, 1.0],
            BlockColor::Green => [0.0, 1.0, 0.0, 1.0],
            BlockColor::Blue => [0.0, 0.0, 1.0, 1.0],
            BlockColor::Yellow => [1.0, 1.0, 0.0, 1.0],
            BlockColor::White => [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Blend a greyscale texel with this color at `COLOR_BLEND_FACTOR`
    pub fn tint(&self, grey: f32) -> [f32; 4] {
        let factor = crate::consts::COLOR_BLEND_FACTOR;
        let [r, g, b, a] = self.rgba();
        [
            grey + (r - grey) * factor,
            grey + (g - grey) * factor,
            grey + (b - grey) * factor,
            a,
        ]
    }
}

/// One catalog row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub shape: ShapeId,
    pub color: BlockColor,
    /// Sprite size; zero means the shape's native size
    #[serde(default)]
    pub size: Vec2,
}

impl ShapeSpec {
    pub fn new(shape: ShapeId, color: BlockColor) -> Self {
        Self {
            shape,
            color,
            size: shape.sprite_size(),
        }
    }

    /// Size to build the block with
    pub fn effective_size(&self) -> Vec2 {
        if self.size.x > 0.0 && self.size.y > 0.0 {
            self.size
        } else {
            self.shape.sprite_size()
        }
    }
}

/// Default table. Squares appear twice so they come up more often than the
/// look-alike mirrored shapes.
pub fn default_catalog() -> Vec<ShapeSpec> {
    vec![
        ShapeSpec::new(ShapeId::Square256x64, BlockColor::Red),
        ShapeSpec::new(ShapeId::Square128x128, BlockColor::Green),
        ShapeSpec::new(ShapeId::Square256x64, BlockColor::Red),
        ShapeSpec::new(ShapeId::Square128x128, BlockColor::Green),
        ShapeSpec::new(ShapeId::Shape1, BlockColor::Blue),
        ShapeSpec::new(ShapeId::Shape2, BlockColor::Yellow),
        ShapeSpec::new(ShapeId::Shape1Flipped, BlockColor::Blue),
        ShapeSpec::new(ShapeId::Shape2Flipped, BlockColor::Yellow),
    ]
}

/// Uniformly pick a row; duplicates weigh proportionally
pub fn pick_random_shape<R: Rng + ?Sized>(catalog: &[ShapeSpec], rng: &mut R) -> Option<ShapeSpec> {
    if catalog.is_empty() {
        return None;
    }
    let index = rng.random_range(0..catalog.len());
    Some(catalog[index])
}
