//! The persisted level format.
//!
//! A level document has exactly eight named layers. Every key is an
//! absolute world pixel; `player` and `sky_handle` hold exactly one entry.
//!
//! ```text
//! {'player': {(200, 300): 'idle_right'}, 'sky_handle': {(640, 360): 'sky_handle'},
//!  'water': {(0, 64): 'top'}, 'land': {(0, 0): 'X'}, 'coin': {(32, 32): 'gold'},
//!  'enemy': {}, 'foreground': {(90, 12): ('palm_fg', 'small')}, 'background': {}}
//! ```
//!
//! The runtime consumes this document (never the live grid), either as
//! text or through the JSON view from [`LevelDocument::to_json`].

mod writer;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};

use crate::types::Pixel;

pub use writer::write_level;

/// Layer names in document order.
pub const LAYER_NAMES: [&str; 8] = [
    "player",
    "sky_handle",
    "water",
    "land",
    "coin",
    "enemy",
    "foreground",
    "background",
];

/// Value stored for the player marker.
pub const PLAYER_STATUS: &str = "idle_right";
/// Value stored for the sky handle.
pub const SKY_HANDLE_VALUE: &str = "sky_handle";

/// Whether a water cell has water above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterSurface {
    Top,
    Bottom,
}

impl WaterSurface {
    pub fn as_str(self) -> &'static str {
        match self {
            WaterSurface::Top => "top",
            WaterSurface::Bottom => "bottom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(WaterSurface::Top),
            "bottom" => Some(WaterSurface::Bottom),
            _ => None,
        }
    }

    pub fn from_bottom(bottom: bool) -> Self {
        if bottom {
            WaterSurface::Bottom
        } else {
            WaterSurface::Top
        }
    }
}

impl fmt::Display for WaterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single entry of a spawn layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawn {
    pub position: Pixel,
    pub value: String,
}

impl Spawn {
    pub fn new(position: Pixel, value: impl Into<String>) -> Self {
        Self {
            position,
            value: value.into(),
        }
    }
}

/// A `(category, subtype)` identity as stored in object layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    pub category: String,
    pub subtype: String,
}

impl ObjectRef {
    pub fn new(category: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subtype: subtype.into(),
        }
    }
}

/// A whole level in its fixed eight-layer shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDocument {
    pub player: Spawn,
    pub sky_handle: Spawn,
    pub water: BTreeMap<Pixel, WaterSurface>,
    pub land: BTreeMap<Pixel, String>,
    pub coin: BTreeMap<Pixel, String>,
    pub enemy: BTreeMap<Pixel, String>,
    pub foreground: BTreeMap<Pixel, ObjectRef>,
    pub background: BTreeMap<Pixel, ObjectRef>,
}

impl LevelDocument {
    /// A document with only the two spawn singletons.
    pub fn new(player: Pixel, sky_handle: Pixel) -> Self {
        Self {
            player: Spawn::new(player, PLAYER_STATUS),
            sky_handle: Spawn::new(sky_handle, SKY_HANDLE_VALUE),
            water: BTreeMap::new(),
            land: BTreeMap::new(),
            coin: BTreeMap::new(),
            enemy: BTreeMap::new(),
            foreground: BTreeMap::new(),
            background: BTreeMap::new(),
        }
    }

    /// Number of entries in a layer, by name.
    pub fn layer_len(&self, name: &str) -> Option<usize> {
        let len = match name {
            "player" | "sky_handle" => 1,
            "water" => self.water.len(),
            "land" => self.land.len(),
            "coin" => self.coin.len(),
            "enemy" => self.enemy.len(),
            "foreground" => self.foreground.len(),
            "background" => self.background.len(),
            _ => return None,
        };
        Some(len)
    }

    /// True when there is no terrain, item or object at all.
    pub fn is_blank(&self) -> bool {
        self.water.is_empty()
            && self.land.is_empty()
            && self.coin.is_empty()
            && self.enemy.is_empty()
            && self.foreground.is_empty()
            && self.background.is_empty()
    }

    /// Render the literal text form.
    pub fn to_text(&self) -> String {
        write_level(self)
    }

    /// Machine-readable view: each layer becomes a list of
    /// `{"position": [x, y], "value": ...}` entries.
    pub fn to_json(&self) -> Value {
        fn entries<V>(layer: &BTreeMap<Pixel, V>, value: impl Fn(&V) -> Value) -> Value {
            Value::Array(
                layer
                    .iter()
                    .map(|(p, v)| json!({ "position": [p.x, p.y], "value": value(v) }))
                    .collect(),
            )
        }

        let spawn = |s: &Spawn| json!([{ "position": [s.position.x, s.position.y], "value": s.value }]);
        let object = |o: &ObjectRef| json!([o.category, o.subtype]);

        json!({
            "player": spawn(&self.player),
            "sky_handle": spawn(&self.sky_handle),
            "water": entries(&self.water, |w| json!(w.as_str())),
            "land": entries(&self.land, |v| json!(v)),
            "coin": entries(&self.coin, |v| json!(v)),
            "enemy": entries(&self.enemy, |v| json!(v)),
            "foreground": entries(&self.foreground, object),
            "background": entries(&self.background, object),
        })
    }
}
