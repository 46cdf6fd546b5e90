//! Placed-object entities: player marker, sky handle and decorative props.
//!
//! Entities live outside the grid. Each remembers its displacement from the
//! grid origin so that panning can move it on screen without changing where
//! it sits in the level.

use std::fmt;

use crate::types::{ItemId, ObjectLayer, Pixel, Point};

/// Stable handle to a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{}", self.0)
    }
}

/// What an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    SkyHandle,
    Prop { item: ItemId, layer: ObjectLayer },
}

/// An independently addressable object on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Current screen position.
    position: Point,
    /// World position, i.e. displacement from the grid origin.
    displacement: Pixel,
}

impl PlacedObject {
    /// Place an entity at a screen point under the given origin.
    pub fn new(id: EntityId, kind: EntityKind, position: Point, origin: Point) -> Self {
        Self {
            id,
            kind,
            position,
            displacement: position.to_world(origin),
        }
    }

    /// Place an entity directly at a world pixel.
    pub fn at_world(id: EntityId, kind: EntityKind, world: Pixel, origin: Point) -> Self {
        Self {
            id,
            kind,
            position: Point::from_world(world, origin),
            displacement: world,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn displacement(&self) -> Pixel {
        self.displacement
    }

    /// Follow a new origin, keeping the world position.
    pub fn update_position(&mut self, origin: Point) {
        self.position = Point::from_world(self.displacement, origin);
    }

    /// Drop the entity at a new screen point and remember its new world
    /// position.
    pub fn move_to(&mut self, position: Point, origin: Point) {
        self.position = position;
        self.displacement = position.to_world(origin);
    }

    /// Player and sky handle can be moved but never deleted.
    pub fn is_deletable(&self) -> bool {
        matches!(self.kind, EntityKind::Prop { .. })
    }
}
