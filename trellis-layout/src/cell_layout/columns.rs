//! Column keys and visibility for grid layouts.

use rustc_hash::FxHashSet;

use crate::error::LayoutError;

/// Keys of a grid's columns and which of them are shown, in display order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnSet {
    keys: Vec<String>,
    /// Column indices in display order.
    visible: Vec<usize>,
    next_key: usize,
}

impl ColumnSet {
    pub fn new(count: usize) -> Self {
        let mut set = Self::default();
        set.resize(count);
        set
    }

    fn fresh_key(&mut self) -> String {
        loop {
            let key = format!("column-{}", self.next_key);
            self.next_key += 1;
            if !self.keys.contains(&key) {
                return key;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Rename column `index`. Keys stay unique.
    pub fn set_key(&mut self, index: usize, key: &str) -> Result<(), LayoutError> {
        if index >= self.keys.len() {
            return Err(LayoutError::OutOfRange { index, len: self.keys.len() });
        }
        match self.index_of(key) {
            Some(existing) if existing != index => Err(LayoutError::DuplicateColumn(key.to_string())),
            _ => {
                self.keys[index] = key.to_string();
                Ok(())
            }
        }
    }

    /// Grow or shrink to `count` columns. New columns are visible.
    pub fn resize(&mut self, count: usize) {
        while self.keys.len() > count {
            let last = self.keys.len() - 1;
            self.remove(last);
        }
        while self.keys.len() < count {
            let at = self.keys.len();
            self.insert(at);
        }
    }

    /// Insert a visible column at `at`, shifting later columns right.
    ///
    /// The new column keeps natural order when the visible list is in
    /// natural order, otherwise it is shown last.
    pub fn insert(&mut self, at: usize) {
        let natural_order = self.visible.windows(2).all(|w| w[0] < w[1]);
        let key = self.fresh_key();
        self.keys.insert(at, key);
        for index in &mut self.visible {
            if *index >= at {
                *index += 1;
            }
        }
        if natural_order {
            let pos = self.visible.partition_point(|&i| i < at);
            self.visible.insert(pos, at);
        } else {
            self.visible.push(at);
        }
    }

    pub fn remove(&mut self, at: usize) {
        if at >= self.keys.len() {
            return;
        }
        self.keys.remove(at);
        self.visible.retain(|&i| i != at);
        for index in &mut self.visible {
            if *index > at {
                *index -= 1;
            }
        }
    }

    /// Show exactly the named columns, in the given order.
    ///
    /// Every key must exist and appear once. Nothing changes on error.
    pub fn set_visible(&mut self, keys: &[&str]) -> Result<(), LayoutError> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::with_capacity(keys.len());
        for key in keys {
            let index = self
                .index_of(key)
                .ok_or_else(|| LayoutError::UnknownColumn(key.to_string()))?;
            if !seen.insert(index) {
                return Err(LayoutError::DuplicateColumn(key.to_string()));
            }
            order.push(index);
        }
        self.visible = order;
        Ok(())
    }

    pub fn visible_order(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_keys(&self) -> Vec<&str> {
        self.visible.iter().map(|&i| self.keys[i].as_str()).collect()
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.contains(&index)
    }
}
