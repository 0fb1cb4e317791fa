//! Serde schema for the subset of the Tiled editor's JSON export this
//! crate consumes. Field names follow the format's own spelling, so
//! everything here is `rename`d raw data; the decode module turns it
//! into the crate's plain-data types.
//!
//! Tile layer data is only supported in its array encoding (the JSON
//! export default). Base64/compressed data fails to parse; infinite
//! maps store chunks instead of `data` and decode as empty layers.

use serde::Deserialize;
use serde_json::Value;

/// Tiled GIDs carry flip flags in their top bits.
pub const GID_FLAG_MASK: u32 = 0x1FFF_FFFF;

#[derive(Debug, Deserialize)]
pub struct RawMap {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default, rename = "backgroundcolor")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub layers: Vec<RawLayer>,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum RawLayer {
    #[serde(rename = "tilelayer")]
    Tile {
        name: String,
        #[serde(default)]
        width: u32,
        #[serde(default)]
        data: Vec<u32>,
    },
    #[serde(rename = "objectgroup")]
    Objects {
        name: String,
        #[serde(default)]
        objects: Vec<RawObject>,
    },
    #[serde(rename = "imagelayer")]
    Image { name: String },
    #[serde(rename = "group")]
    Group { name: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawObject {
    pub id: u32,
    pub name: String,
    /// The editor's class field: `class` since Tiled 1.9, `type`
    /// before that.
    #[serde(rename = "type", alias = "class")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub point: bool,
    pub ellipse: bool,
    /// Points relative to (x, y).
    pub polygon: Option<Vec<RawPoint>>,
    /// Points relative to (x, y).
    pub polyline: Option<Vec<RawPoint>>,
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
}

/// One `{name, type, value}` entry of a property list. The value is
/// kept as raw JSON because its shape depends on `type`.
#[derive(Debug, Deserialize)]
pub struct RawProperty {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}
