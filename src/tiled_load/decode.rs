//! This module contains logic for decoding [`GameMap`] from a parsed
//! Tiled JSON map.
//!
//! Two failure tiers live here. Structural problems (a tile layer whose
//! data does not match its dimensions, an unparseable background color)
//! abort the load with a [`DecodeError`]. Per-object problems (a
//! character without a type, a light without a color, a shape we do not
//! understand) are logged and the object is skipped; they are counted
//! in [`LoadStats`] but never affect the rest of the load.

use hashbrown::HashMap;
use log::{debug, info, warn};
use thiserror::Error;

use super::tiled_json::{GID_FLAG_MASK, RawLayer, RawMap, RawObject, RawProperty};
use crate::characters::CharacterDictionary;
use crate::map::{
    BLOCKING_MARKER, CharacterDef, Color, DEFAULT_LIGHT_RADIUS, Falloff, GameMap, LightDef,
    Movement, Position, PropertyValue, SPATIAL_INDEX_LAYERS, Spawn, TileLayer, TilePlacement,
    WALL_LAYER,
};

static CHARACTERS_GROUP: &str = "characters";
static LIGHTS_GROUP: &str = "lights";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(
        "Map {map:?}, layer {layer:?}: tile data length {found} does not match {expected} cells"
    )]
    TileDataMismatch {
        map: String,
        layer: String,
        expected: usize,
        found: usize,
    },
    #[error("Map {map:?}: bad background color {value:?}")]
    BadBackgroundColor { map: String, value: String },
}

/// Counters for the per-object skip/default events of one load. Purely
/// observational: the same information is also logged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub characters_added: u32,
    pub characters_skipped: u32,
    pub lights_added: u32,
    pub lights_skipped: u32,
    /// Set when the map declared no "lights" group and the default
    /// light was synthesized.
    pub default_light: bool,
}

/// A decoded map together with its load counters.
#[derive(Debug)]
pub struct DecodedMap {
    pub map: GameMap,
    pub stats: LoadStats,
}

/// Decode a parsed Tiled JSON map into a [`GameMap`] named `name`,
/// resolving character placements against `characters`.
pub fn decode_map(
    name: &str,
    raw: &RawMap,
    characters: &CharacterDictionary,
) -> Result<DecodedMap, DecodeError> {
    let mut stats = LoadStats::default();
    let mut layers = Vec::new();
    let mut character_defs = Vec::new();
    let mut lights = Vec::new();
    let mut saw_lights_group = false;

    for layer in &raw.layers {
        match layer {
            RawLayer::Tile {
                name: layer_name,
                width,
                data,
            } => {
                layers.push(decode_tile_layer(name, layer_name, *width, data, raw)?);
            }
            RawLayer::Objects {
                name: layer_name,
                objects,
            } if layer_name == CHARACTERS_GROUP => {
                for object in objects {
                    match decode_character(name, object, characters) {
                        Some(def) => {
                            info!("Adding character {} at {:?}", def.kind, def.spawn.anchor());
                            stats.characters_added += 1;
                            character_defs.push(def);
                        }
                        None => stats.characters_skipped += 1,
                    }
                }
            }
            RawLayer::Objects {
                name: layer_name,
                objects,
            } if layer_name == LIGHTS_GROUP => {
                saw_lights_group = true;
                for object in objects {
                    match decode_light(name, object) {
                        Some(light) => {
                            info!("Added light {:?} radius {}", light.color, light.radius);
                            stats.lights_added += 1;
                            lights.push(light);
                        }
                        None => stats.lights_skipped += 1,
                    }
                }
            }
            RawLayer::Objects {
                name: layer_name, ..
            } => {
                debug!("Ignoring object group {layer_name:?} in map {name:?}");
            }
            RawLayer::Image { name: layer_name } | RawLayer::Group { name: layer_name } => {
                debug!("Ignoring layer {layer_name:?} in map {name:?}");
            }
        }
    }

    if !saw_lights_group {
        lights.push(LightDef::default_light());
        stats.default_light = true;
        info!("Added default light to map {name:?}");
    }

    // All blocking layers collapse into a single spatially indexed
    // wall layer, losing their original slots.
    let mut wall = TileLayer {
        name: WALL_LAYER.to_string(),
        spatial_index: true,
        tiles: Vec::new(),
    };
    layers.retain_mut(|layer| {
        if !layer.name.contains(BLOCKING_MARKER) {
            return true;
        }
        wall.tiles.append(&mut layer.tiles);
        false
    });
    layers.push(wall);

    let background_color = match &raw.background_color {
        None => None,
        Some(value) => Some(Color::from_hex(value).ok_or_else(|| {
            DecodeError::BadBackgroundColor {
                map: name.to_string(),
                value: value.clone(),
            }
        })?),
    };

    Ok(DecodedMap {
        map: GameMap {
            name: name.to_string(),
            layers,
            characters: character_defs,
            lights,
            width: raw.width,
            height: raw.height,
            tile_width: raw.tile_width,
            tile_height: raw.tile_height,
            background_color,
            properties: property_map(name, &raw.properties),
        },
        stats,
    })
}

fn decode_tile_layer(
    map_name: &str,
    layer_name: &str,
    width: u32,
    data: &[u32],
    raw: &RawMap,
) -> Result<TileLayer, DecodeError> {
    let width = if width > 0 { width } else { raw.width };
    let expected = (width * raw.height) as usize;
    if !data.is_empty() && data.len() != expected {
        return Err(DecodeError::TileDataMismatch {
            map: map_name.to_string(),
            layer: layer_name.to_string(),
            expected,
            found: data.len(),
        });
    }

    let tiles = data
        .iter()
        .enumerate()
        .filter(|(_, gid)| **gid != 0)
        .map(|(idx, gid)| TilePlacement {
            col: idx as u32 % width,
            row: idx as u32 / width,
            gid: gid & GID_FLAG_MASK,
        })
        .collect();

    Ok(TileLayer {
        name: layer_name.to_string(),
        spatial_index: SPATIAL_INDEX_LAYERS.contains(&layer_name),
        tiles,
    })
}

fn decode_character(
    map_name: &str,
    object: &RawObject,
    characters: &CharacterDictionary,
) -> Option<CharacterDef> {
    let props = property_map(map_name, &object.properties);
    // The original maps set the type as a custom property; newer Tiled
    // versions put it in the object's class field. Accept both.
    let kind = props
        .get("type")
        .and_then(|p| p.as_str())
        .or_else(|| (!object.kind.is_empty()).then_some(object.kind.as_str()));
    let Some(kind) = kind else {
        warn!(
            "No 'type' field for character (object {}) in map {map_name:?}",
            object.id
        );
        return None;
    };
    let Some(entry) = characters.get(kind) else {
        warn!("Unable to find {kind:?} in the character dictionary (map {map_name:?})");
        return None;
    };

    let Some(spawn) = object_spawn(object) else {
        warn!(
            "Unknown shape for character {kind:?} (object {}) in map {map_name:?}",
            object.id
        );
        return None;
    };
    let movement = match &spawn {
        Spawn::Path { .. } => Movement::FollowPath,
        Spawn::Point { .. } => {
            if props.get("movement").and_then(|p| p.as_str()) == Some("random") {
                Movement::RandomWander
            } else {
                Movement::Static
            }
        }
    };

    Some(CharacterDef {
        kind: kind.to_string(),
        image: entry.images.clone(),
        spawn,
        movement,
    })
}

fn decode_light(map_name: &str, object: &RawObject) -> Option<LightDef> {
    let props = property_map(map_name, &object.properties);
    let Some(color) = props.get("color").and_then(|p| p.as_color()) else {
        warn!(
            "No color for light (object {}) in map {map_name:?}",
            object.id
        );
        return None;
    };

    match object_spawn(object) {
        Some(Spawn::Point { pos }) => Some(LightDef {
            pos,
            radius: props
                .get("radius")
                .and_then(|p| p.as_f32())
                .unwrap_or(DEFAULT_LIGHT_RADIUS),
            color,
            falloff: Falloff::Soft,
        }),
        _ => {
            warn!(
                "Failed to add light (object {}) in map {map_name:?}: not a point",
                object.id
            );
            None
        }
    }
}

/// Classify an object's geometry into a [`Spawn`]. Point objects and
/// degenerate rectangles place at their position; polygons, polylines
/// and rectangles become paths with absolute coordinates. Ellipses are
/// not understood.
fn object_spawn(object: &RawObject) -> Option<Spawn> {
    if object.ellipse {
        return None;
    }
    if let Some(points) = object.polygon.as_ref().or(object.polyline.as_ref()) {
        if points.len() < 2 {
            return None;
        }
        let points = points
            .iter()
            .map(|p| Position {
                x: object.x + p.x,
                y: object.y + p.y,
            })
            .collect();
        return Some(Spawn::Path { points });
    }
    if object.point || (object.width == 0.0 && object.height == 0.0) {
        return Some(Spawn::Point {
            pos: Position {
                x: object.x,
                y: object.y,
            },
        });
    }

    // A plain rectangle: patrol its outline corner by corner.
    let (x, y, w, h) = (object.x, object.y, object.width, object.height);
    Some(Spawn::Path {
        points: vec![
            Position { x, y },
            Position { x: x + w, y },
            Position { x: x + w, y: y + h },
            Position { x, y: y + h },
        ],
    })
}

fn property_map(map_name: &str, props: &[RawProperty]) -> HashMap<String, PropertyValue> {
    let mut out = HashMap::with_capacity(props.len());
    for prop in props {
        match convert_property(prop) {
            Some(value) => {
                out.insert(prop.name.clone(), value);
            }
            None => warn!(
                "Skipping property {:?} of unsupported type {:?} in map {map_name:?}",
                prop.name, prop.kind
            ),
        }
    }
    out
}

fn convert_property(prop: &RawProperty) -> Option<PropertyValue> {
    let value = &prop.value;
    match prop.kind.as_str() {
        "bool" => value.as_bool().map(PropertyValue::Bool),
        "int" | "object" => value.as_i64().map(PropertyValue::Int),
        "float" => value.as_f64().map(PropertyValue::Float),
        "color" => value
            .as_str()
            .and_then(Color::from_hex)
            .map(PropertyValue::Color),
        "file" => value
            .as_str()
            .map(|s| PropertyValue::File(s.to_string())),
        "string" => value
            .as_str()
            .map(|s| PropertyValue::String(s.to_string())),
        // Untyped properties: infer from the JSON value.
        "" => match value {
            serde_json::Value::Bool(b) => Some(PropertyValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(PropertyValue::Int)
                .or_else(|| n.as_f64().map(PropertyValue::Float)),
            serde_json::Value::String(s) => Some(PropertyValue::String(s.clone())),
            _ => None,
        },
        _ => None,
    }
}
