use std::collections::{hash_map::Entry, HashMap};

use shared::domain::{Cell, CellCoord};

/// Client-side replica of the board plus the highlighted coordinate.
#[derive(Debug, Default, Clone)]
pub struct GridState {
    cells: HashMap<CellCoord, Cell>,
    selection: Option<CellCoord>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly fetched grid. The new map is built before the old
    /// one is dropped, so readers only ever see one complete grid. When the
    /// input repeats a coordinate the first entry is kept.
    pub fn replace(&mut self, cells: Vec<Cell>) {
        let mut next = HashMap::with_capacity(cells.len());
        for cell in cells {
            if let Entry::Vacant(slot) = next.entry(cell.coord) {
                slot.insert(cell);
            }
        }
        self.cells = next;
    }

    pub fn lookup(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn set_selection(&mut self, coord: CellCoord) {
        self.selection = Some(coord);
    }

    pub fn selection(&self) -> Option<CellCoord> {
        self.selection
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/grid_state_tests.rs"]
mod tests;
