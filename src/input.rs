//! Gesture input and view-to-field mapping
//!
//! Hosts deliver pan and tap gestures in view coordinates (origin top-left,
//! y down). The field uses origin bottom-left, y up, and is scaled to fill
//! the view while keeping its aspect ratio.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Recognizer state attached to a continuous gesture update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GesturePhase {
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// One gesture update in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Drag/drop
    Pan { phase: GesturePhase, point: Vec2 },
    Tap { point: Vec2 },
}

/// Aspect-fill mapping between the host view and the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub view_size: Vec2,
    pub field_size: Vec2,
}

impl ViewTransform {
    pub fn new(view_size: Vec2, field_size: Vec2) -> Self {
        Self {
            view_size,
            field_size,
        }
    }

    /// View and field share units and size
    pub fn identity(field_size: Vec2) -> Self {
        Self::new(field_size, field_size)
    }

    /// View units per field unit
    pub fn scale(&self) -> f32 {
        let sx = self.view_size.x / self.field_size.x;
        let sy = self.view_size.y / self.field_size.y;
        let scale = sx.max(sy);
        if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
    }

    /// View position of the field's top-left corner (negative when cropped)
    fn offset(&self) -> Vec2 {
        (self.view_size - self.field_size * self.scale()) * 0.5
    }

    pub fn to_field(&self, view_point: Vec2) -> Vec2 {
        let local = (view_point - self.offset()) / self.scale();
        Vec2::new(local.x, self.field_size.y - local.y)
    }

    pub fn to_view(&self, field_point: Vec2) -> Vec2 {
        let flipped = Vec2::new(field_point.x, self.field_size.y - field_point.y);
        flipped * self.scale() + self.offset()
    }
}
