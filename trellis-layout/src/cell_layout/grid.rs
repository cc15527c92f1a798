//! Grid-only operations on [`CellLayout`].

use super::{CellCoord, CellLayout, ColumnSet, Orientation};
use crate::element::ElementId;
use crate::error::LayoutError;
use crate::slot::LayoutSlot;

impl CellLayout {
    fn require_grid(&self) -> Result<(), LayoutError> {
        if self.orientation == Orientation::Grid {
            Ok(())
        } else {
            Err(LayoutError::NotAGrid)
        }
    }

    pub fn columns(&self) -> usize {
        self.track_count(trellis_api::Axis::Horizontal)
    }

    pub fn rows(&self) -> usize {
        self.track_count(trellis_api::Axis::Vertical)
    }

    pub fn column_set(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn cell(&self, widget: ElementId) -> Option<CellCoord> {
        let position = self.position_of(widget)?;
        Some(self.cell_of(position))
    }

    /// The widget occupying `cell`, if any.
    pub fn widget_at(&self, cell: CellCoord) -> Option<ElementId> {
        self.cells
            .iter()
            .find(|(_, c)| **c == cell)
            .map(|(id, _)| *id)
    }

    /// First free cell in row-major order, adding a row when none is free.
    pub(super) fn first_free_cell(&mut self) -> CellCoord {
        for row in 0..self.rows {
            for column in 0..self.columns.len() {
                let cell = CellCoord::new(column, row);
                if self.widget_at(cell).is_none() {
                    return cell;
                }
            }
        }
        self.rows += 1;
        CellCoord::new(0, self.rows - 1)
    }

    /// Place a new child in a specific cell.
    pub fn add_child_at(&mut self, slot: LayoutSlot, cell: CellCoord) -> Result<(), LayoutError> {
        self.require_grid()?;
        if cell.column >= self.columns.len() {
            return Err(LayoutError::OutOfRange {
                index: cell.column,
                len: self.columns.len(),
            });
        }
        if cell.row >= self.rows {
            return Err(LayoutError::OutOfRange {
                index: cell.row,
                len: self.rows,
            });
        }
        match self.widget_at(cell) {
            Some(existing) if existing != slot.widget() => {
                return Err(LayoutError::CellOccupied {
                    column: cell.column,
                    row: cell.row,
                });
            }
            _ => {}
        }
        let widget = slot.widget();
        self.cells.insert(widget, cell);
        let position = self.position_of(widget).unwrap_or(self.slots.len());
        self.add_or_move_child(slot, position);
        Ok(())
    }

    fn highest_occupied(&self, column: bool) -> Option<usize> {
        self.cells
            .values()
            .map(|c| if column { c.column } else { c.row })
            .max()
    }

    pub fn set_columns(&mut self, count: usize) -> Result<(), LayoutError> {
        self.require_grid()?;
        if count == 0 {
            return Err(LayoutError::InvalidCount(count));
        }
        if let Some(highest) = self.highest_occupied(true).filter(|h| *h >= count) {
            return Err(LayoutError::OutOfRange { index: highest, len: count });
        }
        self.columns.resize(count);
        Ok(())
    }

    pub fn set_rows(&mut self, count: usize) -> Result<(), LayoutError> {
        self.require_grid()?;
        if count == 0 {
            return Err(LayoutError::InvalidCount(count));
        }
        if let Some(highest) = self.highest_occupied(false).filter(|h| *h >= count) {
            return Err(LayoutError::OutOfRange { index: highest, len: count });
        }
        self.rows = count;
        Ok(())
    }

    /// Insert an empty row before `at`. `at == rows()` appends.
    pub fn insert_row(&mut self, at: usize) -> Result<(), LayoutError> {
        self.require_grid()?;
        if at > self.rows {
            return Err(LayoutError::OutOfRange { index: at, len: self.rows });
        }
        for cell in self.cells.values_mut() {
            if cell.row >= at {
                cell.row += 1;
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Insert an empty column before `at`. `at == columns()` appends.
    pub fn insert_column(&mut self, at: usize) -> Result<(), LayoutError> {
        self.require_grid()?;
        if at > self.columns.len() {
            return Err(LayoutError::OutOfRange {
                index: at,
                len: self.columns.len(),
            });
        }
        for cell in self.cells.values_mut() {
            if cell.column >= at {
                cell.column += 1;
            }
        }
        self.columns.insert(at);
        Ok(())
    }

    /// Remove row `at` and the children in it. The last remaining row is
    /// only emptied.
    pub fn remove_row(&mut self, at: usize) -> Result<Vec<LayoutSlot>, LayoutError> {
        self.require_grid()?;
        if at >= self.rows {
            return Err(LayoutError::OutOfRange { index: at, len: self.rows });
        }
        let removed = self.remove_track_children(|c| c.row == at);
        if self.rows > 1 {
            for cell in self.cells.values_mut() {
                if cell.row > at {
                    cell.row -= 1;
                }
            }
            self.rows -= 1;
        }
        Ok(removed)
    }

    /// Remove column `at` and the children in it. The last remaining
    /// column is only emptied.
    pub fn remove_column(&mut self, at: usize) -> Result<Vec<LayoutSlot>, LayoutError> {
        self.require_grid()?;
        if at >= self.columns.len() {
            return Err(LayoutError::OutOfRange {
                index: at,
                len: self.columns.len(),
            });
        }
        let removed = self.remove_track_children(|c| c.column == at);
        if self.columns.len() > 1 {
            for cell in self.cells.values_mut() {
                if cell.column > at {
                    cell.column -= 1;
                }
            }
            self.columns.remove(at);
        }
        Ok(removed)
    }

    fn remove_track_children(&mut self, in_track: impl Fn(&CellCoord) -> bool) -> Vec<LayoutSlot> {
        let doomed: Vec<ElementId> = self
            .cells
            .iter()
            .filter(|(_, c)| in_track(c))
            .map(|(id, _)| *id)
            .collect();
        doomed.into_iter().filter_map(|id| self.remove_child(id)).collect()
    }

    /// Rename column `index`.
    pub fn set_column_key(&mut self, index: usize, key: &str) -> Result<(), LayoutError> {
        self.require_grid()?;
        self.columns.set_key(index, key)
    }

    /// Show exactly the named columns, in the given order.
    pub fn set_visible_columns(&mut self, keys: &[&str]) -> Result<(), LayoutError> {
        self.require_grid()?;
        self.columns.set_visible(keys)
    }
}
