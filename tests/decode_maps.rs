//! Decode semantics for single maps: shape classification, per-object
//! skips, light defaults and the blocking-layer merge.

use lib_gamemap::tiled_load::{DecodeError, DecodedMap, RawMap, decode_map};
use lib_gamemap::{
    CharacterDictionary, CharacterEntry, Color, Movement, Position, PropertyValue, Spawn,
};
use serde_json::{Value, json};

fn dictionary() -> CharacterDictionary {
    CharacterDictionary::from_entries([
        (
            "torchguy".to_string(),
            CharacterEntry {
                images: "torchguy/torchguy_idle.png".to_string(),
                extra: Default::default(),
            },
        ),
        (
            "zombie".to_string(),
            CharacterEntry {
                images: "zombie/zombie_idle.png".to_string(),
                extra: Default::default(),
            },
        ),
    ])
}

fn decode(map: Value) -> DecodedMap {
    try_decode(map).unwrap()
}

fn try_decode(map: Value) -> Result<DecodedMap, DecodeError> {
    let raw: RawMap = serde_json::from_value(map).unwrap();
    decode_map("test", &raw, &dictionary())
}

fn map_with_layers(layers: Value) -> Value {
    json!({
        "type": "map",
        "width": 2,
        "height": 2,
        "tilewidth": 16,
        "tileheight": 16,
        "layers": layers,
    })
}

fn characters_group(objects: Value) -> Value {
    map_with_layers(json!([
        { "type": "objectgroup", "name": "characters", "objects": objects }
    ]))
}

#[test]
fn point_character_is_static() {
    let decoded = decode(characters_group(json!([{
        "id": 1, "x": 12.0, "y": 20.0, "point": true,
        "properties": [{ "name": "type", "type": "string", "value": "torchguy" }]
    }])));

    assert_eq!(decoded.map.characters.len(), 1);
    let character = &decoded.map.characters[0];
    assert_eq!(character.kind, "torchguy");
    assert_eq!(character.image, "torchguy/torchguy_idle.png");
    assert_eq!(character.movement, Movement::Static);
    assert_eq!(
        character.spawn,
        Spawn::Point {
            pos: Position { x: 12.0, y: 20.0 }
        }
    );
    assert_eq!(decoded.stats.characters_added, 1);
    assert_eq!(decoded.stats.characters_skipped, 0);
}

#[test]
fn random_movement_property_makes_wanderer() {
    let decoded = decode(characters_group(json!([{
        "id": 1, "x": 4.0, "y": 4.0, "point": true,
        "properties": [
            { "name": "type", "type": "string", "value": "zombie" },
            { "name": "movement", "type": "string", "value": "random" }
        ]
    }])));

    assert_eq!(decoded.map.characters[0].movement, Movement::RandomWander);
}

#[test]
fn class_field_works_as_type_fallback() {
    let decoded = decode(characters_group(json!([{
        "id": 1, "x": 4.0, "y": 4.0, "point": true, "class": "zombie"
    }])));

    assert_eq!(decoded.map.characters[0].kind, "zombie");
}

#[test]
fn character_without_type_is_skipped() {
    let decoded = decode(characters_group(json!([{
        "id": 1, "x": 4.0, "y": 4.0, "point": true
    }])));

    assert!(decoded.map.characters.is_empty());
    assert_eq!(decoded.stats.characters_skipped, 1);
}

#[test]
fn unknown_character_type_is_skipped() {
    let decoded = decode(characters_group(json!([
        {
            "id": 1, "x": 4.0, "y": 4.0, "point": true,
            "properties": [{ "name": "type", "type": "string", "value": "dragon" }]
        },
        {
            "id": 2, "x": 8.0, "y": 8.0, "point": true,
            "properties": [{ "name": "type", "type": "string", "value": "torchguy" }]
        }
    ])));

    assert_eq!(decoded.map.characters.len(), 1);
    assert_eq!(decoded.map.characters[0].kind, "torchguy");
    assert_eq!(decoded.stats.characters_skipped, 1);
}

#[test]
fn polyline_character_follows_path() {
    let decoded = decode(characters_group(json!([{
        "id": 1, "x": 10.0, "y": 20.0,
        "polyline": [
            { "x": 0.0, "y": 0.0 },
            { "x": 32.0, "y": 0.0 },
            { "x": 32.0, "y": 16.0 }
        ],
        "properties": [{ "name": "type", "type": "string", "value": "torchguy" }]
    }])));

    let character = &decoded.map.characters[0];
    assert_eq!(character.movement, Movement::FollowPath);
    // Path points are absolute: object position plus each offset.
    assert_eq!(
        character.spawn,
        Spawn::Path {
            points: vec![
                Position { x: 10.0, y: 20.0 },
                Position { x: 42.0, y: 20.0 },
                Position { x: 42.0, y: 36.0 },
            ]
        }
    );
    assert_eq!(character.spawn.anchor(), Position { x: 10.0, y: 20.0 });
}

#[test]
fn rectangle_character_patrols_its_corners() {
    let decoded = decode(characters_group(json!([{
        "id": 1, "x": 8.0, "y": 8.0, "width": 16.0, "height": 4.0,
        "properties": [{ "name": "type", "type": "string", "value": "zombie" }]
    }])));

    let character = &decoded.map.characters[0];
    assert_eq!(character.movement, Movement::FollowPath);
    assert_eq!(
        character.spawn,
        Spawn::Path {
            points: vec![
                Position { x: 8.0, y: 8.0 },
                Position { x: 24.0, y: 8.0 },
                Position { x: 24.0, y: 12.0 },
                Position { x: 8.0, y: 12.0 },
            ]
        }
    );
}

#[test]
fn ellipse_character_is_skipped() {
    let decoded = decode(characters_group(json!([{
        "id": 1, "x": 8.0, "y": 8.0, "width": 16.0, "height": 16.0, "ellipse": true,
        "properties": [{ "name": "type", "type": "string", "value": "zombie" }]
    }])));

    assert!(decoded.map.characters.is_empty());
    assert_eq!(decoded.stats.characters_skipped, 1);
}

#[test]
fn absent_lights_group_synthesizes_default_light() {
    let decoded = decode(map_with_layers(json!([])));

    assert_eq!(decoded.map.lights.len(), 1);
    let light = &decoded.map.lights[0];
    assert_eq!(light.pos, Position { x: 0.0, y: 0.0 });
    assert_eq!(light.radius, 1.0);
    assert_eq!(light.color, Color::WHITE);
    assert!(decoded.stats.default_light);
}

#[test]
fn lights_decode_with_radius_default() {
    let decoded = decode(map_with_layers(json!([{
        "type": "objectgroup", "name": "lights",
        "objects": [
            {
                "id": 1, "x": 5.0, "y": 6.0, "point": true,
                "properties": [{ "name": "color", "type": "color", "value": "#ffc46b2f" }]
            },
            {
                "id": 2, "x": 7.0, "y": 8.0, "point": true,
                "properties": [
                    { "name": "color", "type": "color", "value": "#ffffff" },
                    { "name": "radius", "type": "int", "value": 40 }
                ]
            }
        ]
    }])));

    assert_eq!(decoded.map.lights.len(), 2);
    assert_eq!(decoded.map.lights[0].radius, 150.0);
    // Alpha channel is dropped from #AARRGGBB.
    assert_eq!(
        decoded.map.lights[0].color,
        Color {
            r: 0xc4,
            g: 0x6b,
            b: 0x2f
        }
    );
    assert_eq!(decoded.map.lights[1].radius, 40.0);
    assert!(!decoded.stats.default_light);
}

#[test]
fn lights_without_color_or_shape_are_skipped() {
    let decoded = decode(map_with_layers(json!([{
        "type": "objectgroup", "name": "lights",
        "objects": [
            { "id": 1, "x": 5.0, "y": 6.0, "point": true },
            {
                "id": 2, "x": 7.0, "y": 8.0,
                "polygon": [
                    { "x": 0.0, "y": 0.0 },
                    { "x": 8.0, "y": 0.0 },
                    { "x": 8.0, "y": 8.0 }
                ],
                "properties": [{ "name": "color", "type": "color", "value": "#ffffff" }]
            }
        ]
    }])));

    // Skipped objects do not suppress the group itself, so no default
    // light is added either.
    assert!(decoded.map.lights.is_empty());
    assert_eq!(decoded.stats.lights_skipped, 2);
    assert!(!decoded.stats.default_light);
}

#[test]
fn blocking_layers_merge_into_wall() {
    let decoded = decode(map_with_layers(json!([
        {
            "type": "tilelayer", "name": "ground",
            "width": 2, "data": [1, 1, 1, 1]
        },
        {
            "type": "tilelayer", "name": "trees_blocking",
            "width": 2, "data": [7, 0, 0, 7]
        },
        {
            "type": "tilelayer", "name": "bridges",
            "width": 2, "data": [0, 9, 0, 0]
        },
        {
            "type": "tilelayer", "name": "water_blocking",
            "width": 2, "data": [0, 0, 5, 0]
        }
    ])));
    let map = &decoded.map;

    assert!(map.layer("trees_blocking").is_none());
    assert!(map.layer("water_blocking").is_none());

    let wall = map.walls().unwrap();
    assert!(wall.spatial_index);
    let gids: Vec<u32> = wall.tiles.iter().map(|t| t.gid).collect();
    assert_eq!(gids, vec![7, 7, 5]);

    // Non-blocking layers keep their slots and order; wall goes last.
    let names: Vec<&str> = map.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["ground", "bridges", "wall"]);

    assert!(!map.layer("ground").unwrap().spatial_index);
    // Bridges are collision-relevant, so they keep the index hint.
    assert!(map.layer("bridges").unwrap().spatial_index);
}

#[test]
fn wall_layer_exists_even_without_blocking_layers() {
    let decoded = decode(map_with_layers(json!([
        { "type": "tilelayer", "name": "ground", "width": 2, "data": [1, 1, 1, 1] }
    ])));

    let wall = decoded.map.walls().unwrap();
    assert!(wall.spatial_index);
    assert!(wall.tiles.is_empty());
}

#[test]
fn gid_flip_flags_are_stripped() {
    let decoded = decode(map_with_layers(json!([
        {
            "type": "tilelayer", "name": "ground",
            "width": 2, "data": [0x80000005u32, 0, 0, 0]
        }
    ])));

    let ground = decoded.map.layer("ground").unwrap();
    assert_eq!(ground.tiles.len(), 1);
    assert_eq!(ground.tiles[0].gid, 5);
    assert_eq!((ground.tiles[0].col, ground.tiles[0].row), (0, 0));
}

#[test]
fn map_metadata_is_copied() {
    let decoded = decode(json!({
        "type": "map",
        "width": 4,
        "height": 3,
        "tilewidth": 32,
        "tileheight": 32,
        "backgroundcolor": "#3b7a57",
        "properties": [
            { "name": "music", "type": "string", "value": "town_theme" },
            { "name": "outdoors", "type": "bool", "value": true }
        ],
        "layers": []
    }));
    let map = &decoded.map;

    assert_eq!((map.width, map.height), (4, 3));
    assert_eq!((map.tile_width, map.tile_height), (32, 32));
    assert_eq!(
        map.background_color,
        Some(Color {
            r: 0x3b,
            g: 0x7a,
            b: 0x57
        })
    );
    assert_eq!(
        map.properties.get("music"),
        Some(&PropertyValue::String("town_theme".to_string()))
    );
    assert_eq!(
        map.properties.get("outdoors"),
        Some(&PropertyValue::Bool(true))
    );
}

#[test]
fn bad_background_color_is_fatal() {
    let result = try_decode(json!({
        "type": "map",
        "width": 1,
        "height": 1,
        "tilewidth": 16,
        "tileheight": 16,
        "backgroundcolor": "not-a-color",
        "layers": []
    }));

    assert!(matches!(
        result,
        Err(DecodeError::BadBackgroundColor { .. })
    ));
}

#[test]
fn tile_data_length_mismatch_is_fatal() {
    let result = try_decode(map_with_layers(json!([
        { "type": "tilelayer", "name": "ground", "width": 2, "data": [1, 1, 1] }
    ])));

    assert!(matches!(result, Err(DecodeError::TileDataMismatch { .. })));
}
