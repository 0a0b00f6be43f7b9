//! Composite texture definitions
//!
//! A composite texture is assembled by drawing patches onto a shared canvas.
//! Definitions are produced by a texture-definition parser (or the
//! `[textures.*]` tables of `lumptex.toml`) and are read-only to the loaders.

use serde::{Deserialize, Serialize};

use crate::resource::{ResourceId, ResourceLookup};
use crate::warning::Warning;

/// One patch drawn onto a composite canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchPlacement {
    /// Source patch, or `None` for an empty slot that is skipped
    pub resource: Option<ResourceId>,
    /// Left edge on the canvas; may be negative or past the right edge
    pub origin_x: i32,
    /// Top edge on the canvas; may be negative or past the bottom edge
    pub origin_y: i32,
}

impl PatchPlacement {
    pub fn new(resource: ResourceId, origin_x: i32, origin_y: i32) -> Self {
        Self {
            resource: Some(resource),
            origin_x,
            origin_y,
        }
    }

    /// A placement with no source patch.
    pub fn none(origin_x: i32, origin_y: i32) -> Self {
        Self {
            resource: None,
            origin_x,
            origin_y,
        }
    }
}

/// Output size, scale and ordered patch list of a composite texture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositeTextureDefinition {
    pub width: u16,
    pub height: u16,
    /// Horizontal scale in eighths; zero keeps the default scale
    pub scale_x: u8,
    /// Vertical scale in eighths; zero keeps the default scale
    pub scale_y: u8,
    /// Placements in draw order; later ones overwrite earlier ones
    pub patches: Vec<PatchPlacement>,
}

impl CompositeTextureDefinition {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_patch(mut self, placement: PatchPlacement) -> Self {
        self.patches.push(placement);
        self
    }

    pub fn with_scale(mut self, scale_x: u8, scale_y: u8) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }
}

/// A patch placement as written in configuration, naming its patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSpec {
    /// Patch resource name; omitted for an empty slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// A composite texture as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSpec {
    pub width: u16,
    pub height: u16,
    #[serde(default)]
    pub scale_x: u8,
    #[serde(default)]
    pub scale_y: u8,
    #[serde(default)]
    pub patches: Vec<PatchSpec>,
}

impl TextureSpec {
    /// Resolve patch names to resource ids.
    ///
    /// Names that cannot be found become empty slots and are reported as
    /// warnings, so a missing patch contributes nothing to the texture.
    pub fn resolve<L: ResourceLookup + ?Sized>(
        &self,
        lookup: &L,
    ) -> (CompositeTextureDefinition, Vec<Warning>) {
        let mut warnings = Vec::new();
        let patches = self
            .patches
            .iter()
            .map(|spec| {
                let resource = spec.patch.as_deref().and_then(|name| {
                    let found = lookup.find(name);
                    if found.is_none() {
                        warnings.push(Warning::new(format!("patch '{}' not found", name)));
                    }
                    found
                });
                PatchPlacement {
                    resource,
                    origin_x: spec.x,
                    origin_y: spec.y,
                }
            })
            .collect();

        let def = CompositeTextureDefinition {
            width: self.width,
            height: self.height,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            patches,
        };
        (def, warnings)
    }
}
