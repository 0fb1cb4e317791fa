use crate::map::GameMap;

/// Decode a map from its binary encoding.
pub fn load_from_memory(data: &[u8]) -> anyhow::Result<GameMap> {
    postcard::from_bytes(data).map_err(Into::into)
}

/// Map compilation. Pre-compiled maps skip the Tiled JSON decode path
/// entirely, which is what shipping builds want.
pub mod compile {
    use super::GameMap;
    use postcard::{ser_flavors::io::WriteFlavor, serialize_with_flavor};

    use std::io::Write;

    /// Write the map to `out` in binary format.
    pub fn write_map(map: &GameMap, out: impl Write) -> anyhow::Result<()> {
        serialize_with_flavor(map, WriteFlavor::new(out))?;
        Ok(())
    }
}
