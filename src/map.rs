//! This module contains all the plain-data structures for
//! representing a loaded map. There are several conventions for this module.
//!
//! ## Simplicity
//! The data must be as simple as possible, so it can be decoded from any
//! possible format: Tiled JSON, binary, etc.
//!
//! ## Plain-Data
//! All fields are public and do not represent any complex data structure:
//! * If you have a list, use a `Vec<T>`
//! * If you have a map, use `HashMap<S, T>`
//! * No rendering-engine types anywhere. Translating placements into
//!   sprites, scene nodes or light sources is an adapter's job.
//!
//! ## Zero-dependency
//! The only okay dependency is `serde`. Existing data structures may be
//! duplicated here.
//!
//! ## Readability First
//! * All fields must be named, tuple structs are not allowed
//! * All data-containing enums must be externally tagged

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Tile layers that receive a spatial-index hint when decoded. These
/// are the layers collision queries are expected to hit the most.
pub const SPATIAL_INDEX_LAYERS: &[&str] =
    &["trees_blocking", "misc_blocking", "bridges", "water_blocking"];

/// Substring marking a tile layer as impassable. Every layer whose
/// name contains it is folded into [`WALL_LAYER`] by the decoder.
pub const BLOCKING_MARKER: &str = "_blocking";

/// Name of the merged collision layer. Always present in a decoded
/// map, possibly empty.
pub const WALL_LAYER: &str = "wall";

/// Light radius used when a light object does not specify one.
pub const DEFAULT_LIGHT_RADIUS: f32 = 150.0;

/// The root of a loaded map. This type contains all information an
/// engine adapter needs to instantiate the map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameMap {
    /// The map's identifier: the source file's stem.
    pub name: String,
    /// Tile layers in source order, with [`WALL_LAYER`] appended last.
    /// Blocking layers are already merged away, see [`BLOCKING_MARKER`].
    pub layers: Vec<TileLayer>,
    /// Placements from the "characters" object group.
    pub characters: Vec<CharacterDef>,
    /// Lights from the "lights" object group, or the single default
    /// light when the map declares none.
    pub lights: Vec<LightDef>,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// The map's background color, if the author set one.
    pub background_color: Option<Color>,
    /// The map's custom property bag.
    pub properties: HashMap<String, PropertyValue>,
}

impl GameMap {
    /// Look a layer up by name. Layer order is meaningful, so layers
    /// live in a `Vec`; maps have few enough layers for a scan.
    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// The merged collision layer.
    pub fn walls(&self) -> Option<&TileLayer> {
        self.layer(WALL_LAYER)
    }
}

/// A single tile layer: the non-empty cells of one grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileLayer {
    pub name: String,
    /// Hint for the consumer to back this layer with a spatial hash.
    #[serde(default)]
    pub spatial_index: bool,
    /// Non-empty cells in row-major order.
    pub tiles: Vec<TilePlacement>,
}

/// One placed tile. `gid` refers to the map's tileset numbering with
/// the flip bits already stripped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TilePlacement {
    pub col: u32,
    pub row: u32,
    pub gid: u32,
}

/// A character placed on the map, resolved against the character
/// dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterDef {
    /// The character's key in the dictionary.
    pub kind: String,
    /// Sprite sheet path resolved from the dictionary.
    pub image: String,
    pub spawn: Spawn,
    pub movement: Movement,
}

/// Where and how a character is placed. Decided once at parse time;
/// consumers never have to inspect shape geometry again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Spawn {
    Point {
        pos: Position,
    },
    /// A patrol path. The character is anchored at the first point.
    Path {
        points: Vec<Position>,
    },
}

impl Spawn {
    /// The position the character starts at.
    pub fn anchor(&self) -> Position {
        match self {
            Spawn::Point { pos } => *pos,
            // Paths are built with at least one point.
            Spawn::Path { points } => points.first().copied().unwrap_or_default(),
        }
    }
}

/// Movement behavior of a placed character.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    #[default]
    Static,
    RandomWander,
    FollowPath,
}

/// A placed light source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LightDef {
    pub pos: Position,
    pub radius: f32,
    pub color: Color,
    pub falloff: Falloff,
}

impl LightDef {
    /// The light synthesized for maps that declare no "lights" group.
    pub fn default_light() -> Self {
        LightDef {
            pos: Position { x: 0.0, y: 0.0 },
            radius: 1.0,
            color: Color::WHITE,
            falloff: Falloff::Soft,
        }
    }
}

/// Light falloff kind. Only soft falloff is authored today.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    #[default]
    Soft,
}

/// A library-agnostic position representation, in the map's pixel
/// space (y grows downward, as authored in Tiled).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// An RGB color. Tiled's alpha channel is dropped on parse.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parse a Tiled color string: `#RRGGBB` or `#AARRGGBB`, with the
    /// leading `#` optional.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return None;
        }
        let channels = match hex.len() {
            6 => 0usize,
            8 => 1usize,
            _ => return None,
        };
        let byte = |i: usize| u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).ok();
        Some(Color {
            r: byte(channels)?,
            g: byte(channels + 1)?,
            b: byte(channels + 2)?,
        })
    }
}

/// A custom property value, as decoded from a Tiled `{name, type,
/// value}` property entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Color(Color),
    File(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::File(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PropertyValue::Int(i) => Some(*i as f32),
            PropertyValue::Float(f) => Some(*f as f32),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropertyValue::Color(c) => Some(*c),
            PropertyValue::String(s) => Color::from_hex(s),
            _ => None,
        }
    }
}
