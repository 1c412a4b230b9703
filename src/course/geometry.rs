//! Geometry descriptors handed to the emitter
//!
//! Positions are local to the owning segment (or obstacle pivot); the
//! emitter adds the owner's world origin.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{MaterialId, MaterialPalette};
use crate::consts::WALL_THICKNESS;

/// RGBA tint used when no material handle is available
pub type Tint = [f32; 4];

pub const FLOOR_TINT: Tint = [0.85, 0.85, 0.9, 1.0];
pub const WALL_TINT: Tint = [0.7, 0.7, 0.8, 0.5];
pub const FINISH_TINT: Tint = [1.0, 0.85, 0.0, 1.0];
pub const SLIME_TINT: Tint = [0.2, 0.85, 0.15, 0.8];
pub const START_ARCH_TINT: Tint = [0.2, 0.8, 0.3, 1.0];
pub const GOLD_TINT: Tint = [1.0, 0.84, 0.0, 1.0];
pub const CHECKPOINT_TINT: Tint = [0.2, 0.6, 1.0, 1.0];
pub const FALLING_BLOCK_TINT: Tint = [0.9, 0.3, 0.3, 0.9];

/// Primitive shape kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Flat box used for floors and platforms
    Slab,
    Cube,
    Cylinder,
    Sphere,
    /// Invisible trigger volume
    Trigger,
}

/// How a shape should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    Material(MaterialId),
    Tint(Tint),
}

impl Surface {
    /// Material if present, otherwise a fallback tint
    pub fn or_tint(material: Option<MaterialId>, fallback: Tint) -> Self {
        material.map(Surface::Material).unwrap_or(Surface::Tint(fallback))
    }
}

/// Local transform relative to the owner origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Sinusoidal motion bound onto a moving platform or punch wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Peak offset from the rest position
    pub amplitude: Vec3,
    /// Seconds per full cycle
    pub period: f32,
}

/// Gameplay role the runtime should attach to a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeRole {
    Floor,
    Wall,
    Decoration,
    /// Low-friction trigger patch
    SlimeZone,
    /// Block that falls after `warning` seconds once touched
    FallingBlock {
        warning: f32,
        respawn_delay: f32,
        respawns: bool,
    },
    MovingPlatform(Oscillation),
    Checkpoint,
    FinishLine,
    /// Visual/collision piece of an obstacle; behavior lives on the placement
    ObstaclePart,
}

/// One emitted primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub name: String,
    pub kind: ShapeKind,
    pub transform: Transform,
    pub surface: Surface,
    pub role: ShapeRole,
}

impl ShapeDescriptor {
    pub fn new(
        name: impl Into<String>,
        kind: ShapeKind,
        transform: Transform,
        surface: Surface,
        role: ShapeRole,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            transform,
            surface,
            role,
        }
    }

    /// Floor slab
    pub fn platform(position: Vec3, scale: Vec3, surface: Surface) -> Self {
        Self::new(
            "Platform",
            ShapeKind::Slab,
            Transform::new(position, scale),
            surface,
            ShapeRole::Floor,
        )
    }

    /// Side wall
    pub fn wall(position: Vec3, scale: Vec3, surface: Surface) -> Self {
        Self::new(
            "Wall",
            ShapeKind::Cube,
            Transform::new(position, scale),
            surface,
            ShapeRole::Wall,
        )
    }

    /// Obstacle piece with a fixed tint
    pub fn part(name: &str, kind: ShapeKind, transform: Transform, tint: Tint) -> Self {
        Self::new(
            name,
            kind,
            transform,
            Surface::Tint(tint),
            ShapeRole::ObstaclePart,
        )
    }

    pub fn with_role(mut self, role: ShapeRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }
}

/// Pair of side walls for a run of floor `width` wide and `length` long,
/// lifted by `base_y` and extended by `extra_height`
pub fn side_walls(
    width: f32,
    length: f32,
    wall_height: f32,
    base_y: f32,
    extra_height: f32,
    surface: Surface,
) -> [ShapeDescriptor; 2] {
    let x = width / 2.0 + WALL_THICKNESS / 2.0;
    let y = base_y + wall_height / 2.0;
    let scale = Vec3::new(WALL_THICKNESS, wall_height + extra_height, length);
    [
        ShapeDescriptor::wall(Vec3::new(-x, y, length / 2.0), scale, surface),
        ShapeDescriptor::wall(Vec3::new(x, y, length / 2.0), scale, surface),
    ]
}

/// Palette with missing slots replaced by tints, resolved once per run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPalette {
    pub segments: Vec<MaterialId>,
    pub wall: Surface,
    pub finish: Surface,
    pub slime: Surface,
}

impl ResolvedPalette {
    pub fn resolve(palette: &MaterialPalette) -> Self {
        if palette.segments.is_empty() {
            log::warn!("No segment materials configured, floors use the default tint");
        }
        Self {
            segments: palette.segments.clone(),
            wall: resolve_slot("wall", palette.wall, WALL_TINT),
            finish: resolve_slot("finish", palette.finish, FINISH_TINT),
            slime: resolve_slot("slime", palette.slime, SLIME_TINT),
        }
    }

    /// Floor surface for a segment index, cycling through the palette
    pub fn floor(&self, index: usize) -> Surface {
        if self.segments.is_empty() {
            Surface::Tint(FLOOR_TINT)
        } else {
            Surface::Material(self.segments[index % self.segments.len()])
        }
    }
}

fn resolve_slot(slot: &str, material: Option<MaterialId>, fallback: Tint) -> Surface {
    if material.is_none() {
        log::warn!("No {} material configured, using default tint", slot);
    }
    Surface::or_tint(material, fallback)
}

/// Contiguous run of entries in one of a course's arenas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArenaSpan {
    pub start: usize,
    pub len: usize,
}

impl ArenaSpan {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
