use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::editor::TableEditor;
use crate::error::{PuzzleError, Result};
use crate::shape::Side;

/// Dense handle for a tile type, valid only for the [`ConnectionTable`] that issued it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TileId(pub(crate) usize);

impl Display for TileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Serialized form of one tile type: its glyph and, per side, the keys of the tiles it may touch there.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    #[serde(default = "TileSpec::default_glyph")]
    pub glyph: char,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub top: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub right: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub bottom: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub left: BTreeSet<String>,
}

impl TileSpec {
    fn default_glyph() -> char {
        '?'
    }

    pub(crate) fn side(&self, side: Side) -> &BTreeSet<String> {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut BTreeSet<String> {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }
}

/// Serialized form of a whole [`ConnectionTable`], as found in the bundled configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub start_tiles: BTreeSet<String>,
    pub end_tiles: BTreeSet<String>,
    pub tiles: BTreeMap<String, TileSpec>,
}

/// A resolved tile type.
#[derive(Clone, Debug)]
pub struct Tile {
    key: String,
    glyph: char,
    // indexed by Side::index
    profile: [HashSet<TileId>; 4],
}

impl Tile {
    /// The key this tile is known by in configuration.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Character used when printing a board.
    pub fn glyph(&self) -> char {
        self.glyph
    }

    /// The tiles this one accepts on `side`.
    pub fn accepts_on(&self, side: Side) -> &HashSet<TileId> {
        &self.profile[side.index()]
    }
}

/// Immutable reference data describing which tile may sit next to which, on which side.
///
/// Tiles live in an arena and are addressed by [`TileId`]; keys are interned once on load.
/// To change a table, take a [`TableEditor`] with [`Self::edit`] and [`commit`](TableEditor::commit) it into a new table.
#[derive(Clone, Debug)]
pub struct ConnectionTable {
    tiles: Vec<Tile>,
    ids: HashMap<String, TileId>,
    start_tiles: HashSet<TileId>,
    end_tiles: HashSet<TileId>,
}

impl ConnectionTable {
    /// Resolve a [`TableSpec`], checking every key it mentions.
    pub fn from_spec(spec: &TableSpec) -> Result<Self> {
        if spec.start_tiles.is_empty() {
            return Err(PuzzleError::EmptyAllowList("start"));
        }
        if spec.end_tiles.is_empty() {
            return Err(PuzzleError::EmptyAllowList("end"));
        }

        // BTreeMap order keeps ids stable across loads
        let ids: HashMap<String, TileId> = spec.tiles.keys()
            .enumerate()
            .map(|(ind, key)| (key.clone(), TileId(ind)))
            .collect();

        let mut tiles = Vec::with_capacity(spec.tiles.len());
        for (key, tile_spec) in &spec.tiles {
            let mut profile: [HashSet<TileId>; 4] = Default::default();
            for side in Side::VARIANTS {
                for reference in tile_spec.side(*side) {
                    let id = ids.get(reference).ok_or_else(|| PuzzleError::UnknownReference {
                        tile: key.clone(),
                        side: *side,
                        reference: reference.clone(),
                    })?;
                    profile[side.index()].insert(*id);
                }
            }

            tiles.push(Tile {
                key: key.clone(),
                glyph: tile_spec.glyph,
                profile,
            });
        }

        let resolve = |keys: &BTreeSet<String>| keys.iter()
            .map(|key| ids.get(key).copied().ok_or_else(|| PuzzleError::UnknownTile(key.clone())))
            .collect::<Result<HashSet<TileId>>>();
        let start_tiles = resolve(&spec.start_tiles)?;
        let end_tiles = resolve(&spec.end_tiles)?;

        debug!("loaded connection table with {} tiles, {} start and {} end types", tiles.len(), start_tiles.len(), end_tiles.len());

        Ok(Self {
            tiles,
            ids,
            start_tiles,
            end_tiles,
        })
    }

    /// Parse and resolve a JSON-encoded [`TableSpec`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_spec(&serde_json::from_str(json)?)
    }

    /// Convert back to the serialized form.
    pub fn to_spec(&self) -> TableSpec {
        let keys = |ids: &HashSet<TileId>| ids.iter()
            .map(|id| self.tiles[id.0].key.clone())
            .collect::<BTreeSet<String>>();

        let tiles = self.tiles.iter()
            .map(|tile| {
                let mut tile_spec = TileSpec {
                    glyph: tile.glyph,
                    ..Default::default()
                };
                for side in Side::VARIANTS {
                    *tile_spec.side_mut(*side) = keys(tile.accepts_on(*side));
                }
                (tile.key.clone(), tile_spec)
            })
            .collect();

        TableSpec {
            start_tiles: keys(&self.start_tiles),
            end_tiles: keys(&self.end_tiles),
            tiles,
        }
    }

    /// Start editing a copy of this table. `self` is left untouched.
    pub fn edit(&self) -> TableEditor {
        TableEditor::new(self.to_spec())
    }

    /// Look up a tile by key.
    pub fn id_of(&self, key: &str) -> Result<TileId> {
        self.ids.get(key).copied().ok_or_else(|| PuzzleError::UnknownTile(key.to_string()))
    }

    /// Look up a tile by id. Fails if the id was issued by another table.
    pub fn tile(&self, id: TileId) -> Result<&Tile> {
        self.tiles.get(id.0).ok_or(PuzzleError::MissingTileData(id))
    }

    /// All tiles, in id order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles.iter().enumerate().map(|(ind, tile)| (TileId(ind), tile))
    }

    /// Number of tile types.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether this table has no tile types at all.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether `id` may start a road.
    pub fn is_start_tile(&self, id: TileId) -> bool {
        self.start_tiles.contains(&id)
    }

    /// Whether `id` may end a road.
    pub fn is_end_tile(&self, id: TileId) -> bool {
        self.end_tiles.contains(&id)
    }

    /// Whether `tile` lists `neighbor` on `side`. This is one half of a connection; see [`Self::connects`].
    pub fn accepts(&self, tile: TileId, side: Side, neighbor: TileId) -> Result<bool> {
        Ok(self.tile(tile)?.accepts_on(side).contains(&neighbor))
    }

    /// Whether `tile` and `neighbor`, with `neighbor` on `side` of `tile`, form a road.
    ///
    /// Both halves must agree: `tile` lists `neighbor` on `side`, and `neighbor` lists `tile` on the opposite side.
    pub fn connects(&self, tile: TileId, side: Side, neighbor: TileId) -> Result<bool> {
        Ok(self.accepts(tile, side, neighbor)? && self.accepts(neighbor, side.opposite(), tile)?)
    }

    /// Every one-sided entry: `(tile, side, neighbor)` where `tile` lists `neighbor` on `side` but not vice versa.
    ///
    /// Such entries are legal but can never carry a road.
    pub fn asymmetries(&self) -> Vec<(TileId, Side, TileId)> {
        self.tiles()
            .flat_map(|(id, tile)| Side::VARIANTS.iter().flat_map(move |side| {
                tile.accepts_on(*side).iter().map(move |neighbor| (id, *side, *neighbor))
            }))
            .filter(|(id, side, neighbor)| !self.tiles[neighbor.0].accepts_on(side.opposite()).contains(id))
            .sorted()
            .collect()
    }
}

impl Serialize for ConnectionTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_spec().serialize(serializer)
    }
}
