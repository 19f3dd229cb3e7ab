use std::collections::BTreeSet;

use log::debug;

use crate::error::{PuzzleError, Result};
use crate::shape::Side;
use crate::tile::{ConnectionTable, TableSpec};

/// A scratch copy of a [`ConnectionTable`] that can be changed freely.
///
/// Nothing here touches the table it was taken from. Call [`Self::commit`] to obtain a new, validated table and swap it in yourself.
/// Like the board builder, every mutator returns `&mut Self` so edits chain.
#[derive(Clone, Debug)]
pub struct TableEditor {
    spec: TableSpec,
}

impl TableEditor {
    pub(crate) fn new(spec: TableSpec) -> Self {
        Self { spec }
    }

    fn check_key(&self, key: &str) -> Result<()> {
        match self.spec.tiles.contains_key(key) {
            true => Ok(()),
            false => Err(PuzzleError::UnknownTile(key.to_string())),
        }
    }

    /// Let `neighbor` sit on `side` of `tile`.
    ///
    /// With `mirror`, also let `tile` sit on the opposite side of `neighbor`, which is what a usable road needs.
    pub fn allow(&mut self, tile: &str, side: Side, neighbor: &str, mirror: bool) -> Result<&mut Self> {
        self.check_key(tile)?;
        self.check_key(neighbor)?;

        self.side_mut(tile, side).insert(neighbor.to_string());
        if mirror {
            self.side_mut(neighbor, side.opposite()).insert(tile.to_string());
        }

        Ok(self)
    }

    /// Stop `neighbor` from sitting on `side` of `tile`, optionally removing the mirrored entry too.
    pub fn forbid(&mut self, tile: &str, side: Side, neighbor: &str, mirror: bool) -> Result<&mut Self> {
        self.check_key(tile)?;
        self.check_key(neighbor)?;

        self.side_mut(tile, side).remove(neighbor);
        if mirror {
            self.side_mut(neighbor, side.opposite()).remove(tile);
        }

        Ok(self)
    }

    /// Replace the set of tiles a road may start on.
    pub fn set_start_tiles<I, S>(&mut self, keys: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.start_tiles = self.collect_keys(keys)?;
        Ok(self)
    }

    /// Replace the set of tiles a road may end on.
    pub fn set_end_tiles<I, S>(&mut self, keys: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.end_tiles = self.collect_keys(keys)?;
        Ok(self)
    }

    /// The table as currently edited.
    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Dump the edited table as pretty JSON, in the same format the bundled configuration uses.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.spec)?)
    }

    /// Validate the edits and produce a new table.
    pub fn commit(self) -> Result<ConnectionTable> {
        debug!("committing edited connection table");
        ConnectionTable::from_spec(&self.spec)
    }

    fn collect_keys<I, S>(&self, keys: I) -> Result<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter()
            .map(Into::into)
            .map(|key| self.check_key(&key).map(|_| key))
            .collect()
    }

    fn side_mut(&mut self, key: &str, side: Side) -> &mut BTreeSet<String> {
        // keys are checked by every caller
        self.spec.tiles.entry(key.to_string()).or_default().side_mut(side)
    }
}
