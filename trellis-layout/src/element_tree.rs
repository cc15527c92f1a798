//! In-memory element tree.
//!
//! A headless box tree implementing the element host traits. Each node has
//! declared sizing, an intrinsic size, and the space its parent allocated to
//! it. The rendered size follows from those the same way a browser would
//! resolve fixed, percentage and content-driven sizes.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use trellis_api::{Axis, SizeSpec};

use crate::element::{ElementHost, ElementHostMut, ElementId, LayoutKind, StyleProbe};
use crate::geometry::{BoxGeometry, Insets};

/// Padding that a style class sets. `None` sides are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaddingRule {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl PaddingRule {
    pub fn all(value: f64) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    fn apply(&self, insets: &mut Insets) {
        if let Some(v) = self.top {
            insets.top = v;
        }
        if let Some(v) = self.right {
            insets.right = v;
        }
        if let Some(v) = self.bottom {
            insets.bottom = v;
        }
        if let Some(v) = self.left {
            insets.left = v;
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    label: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    sizing: [SizeSpec; 2],
    intrinsic: [f64; 2],
    allocated: [Option<f64>; 2],
    position: [f64; 2],
    padding: Insets,
    border: Insets,
    margin: Insets,
    layout_kind: Option<LayoutKind>,
    scrolls_children: bool,
    visible: bool,
}

impl Node {
    fn new(label: &str, parent: Option<ElementId>) -> Self {
        Self {
            label: label.to_string(),
            parent,
            children: Vec::new(),
            sizing: [SizeSpec::Undefined; 2],
            intrinsic: [0.0; 2],
            allocated: [None; 2],
            position: [0.0; 2],
            padding: Insets::default(),
            border: Insets::default(),
            margin: Insets::default(),
            layout_kind: None,
            scrolls_children: false,
            visible: true,
        }
    }

    fn outer(&self, axis: Axis) -> f64 {
        let i = axis.index();
        match self.sizing[i] {
            SizeSpec::Fixed(px) => px,
            SizeSpec::Relative(pct) => self.allocated[i].map(|a| a * pct / 100.0).unwrap_or(0.0),
            SizeSpec::Undefined => self.intrinsic[i],
        }
    }
}

/// Headless element tree.
#[derive(Debug, Default)]
pub struct ElementTree {
    nodes: SlotMap<ElementId, Node>,
    stylesheet: FxHashMap<String, PaddingRule>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parentless element.
    pub fn add_root(&mut self, label: &str) -> ElementId {
        self.nodes.insert(Node::new(label, None))
    }

    /// Append a child element to `parent`.
    pub fn add_child(&mut self, parent: ElementId, label: &str) -> ElementId {
        let id = self.nodes.insert(Node::new(label, Some(parent)));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Remove `id` and its whole subtree.
    pub fn remove(&mut self, id: ElementId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        for child in node.children {
            self.remove(child);
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn set_sizing(&mut self, id: ElementId, axis: Axis, spec: SizeSpec) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.sizing[axis.index()] = spec;
        }
    }

    pub fn set_sizes(&mut self, id: ElementId, width: SizeSpec, height: SizeSpec) {
        self.set_sizing(id, Axis::Horizontal, width);
        self.set_sizing(id, Axis::Vertical, height);
    }

    /// Size the element has when it is sized by content.
    pub fn set_intrinsic_size(&mut self, id: ElementId, width: f64, height: f64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.intrinsic = [width, height];
        }
    }

    pub fn set_layout_kind(&mut self, id: ElementId, kind: Option<LayoutKind>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.layout_kind = kind;
        }
    }

    pub fn set_may_scroll_children(&mut self, id: ElementId, scrolls: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.scrolls_children = scrolls;
        }
    }

    pub fn set_padding(&mut self, id: ElementId, padding: Insets) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.padding = padding;
        }
    }

    pub fn set_border(&mut self, id: ElementId, border: Insets) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.border = border;
        }
    }

    pub fn set_margin(&mut self, id: ElementId, margin: Insets) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.margin = margin;
        }
    }

    /// Register the padding a style class produces on probe elements.
    pub fn add_style_rule(&mut self, class_name: &str, rule: PaddingRule) {
        self.stylesheet.insert(class_name.to_string(), rule);
    }

    pub fn outer_size(&self, id: ElementId, axis: Axis) -> f64 {
        self.nodes.get(id).map(|n| n.outer(axis)).unwrap_or(0.0)
    }

    pub fn position(&self, id: ElementId, axis: Axis) -> f64 {
        self.nodes.get(id).map(|n| n.position[axis.index()]).unwrap_or(0.0)
    }

    pub fn allocated(&self, id: ElementId, axis: Axis) -> Option<f64> {
        self.nodes.get(id).and_then(|n| n.allocated[axis.index()])
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
    }

    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.label.as_str())
    }
}

impl ElementHost for ElementTree {
    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes.get(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn sizing(&self, id: ElementId, axis: Axis) -> SizeSpec {
        self.nodes
            .get(id)
            .map(|n| n.sizing[axis.index()])
            .unwrap_or_default()
    }

    fn layout_kind(&self, id: ElementId) -> Option<LayoutKind> {
        self.nodes.get(id).and_then(|n| n.layout_kind)
    }

    fn may_scroll_children(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.scrolls_children)
    }

    fn box_geometry(&self, id: ElementId) -> Option<BoxGeometry> {
        let node = self.nodes.get(id)?;
        if !node.visible {
            return Some(BoxGeometry::default());
        }
        Some(BoxGeometry {
            outer_width: node.outer(Axis::Horizontal),
            outer_height: node.outer(Axis::Vertical),
            padding: node.padding,
            border: node.border,
            margin: node.margin,
        })
    }

    fn elements(&self) -> Vec<ElementId> {
        self.nodes.keys().collect()
    }

    fn describe(&self, id: ElementId) -> String {
        match self.nodes.get(id) {
            Some(node) => format!("{} ({id:?})", node.label),
            None => format!("<removed> ({id:?})"),
        }
    }
}

impl ElementHostMut for ElementTree {
    fn as_host(&self) -> &dyn ElementHost {
        self
    }

    fn place(&mut self, id: ElementId, axis: Axis, position: f64, allocated: f64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.position[axis.index()] = position;
            node.allocated[axis.index()] = Some(allocated);
        }
    }

    fn set_content_size(&mut self, id: ElementId, axis: Axis, size: f64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.intrinsic[axis.index()] = size;
        }
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.visible = visible;
        }
    }
}

impl StyleProbe for ElementTree {
    fn probe_padding(&self, class_names: &[String]) -> Insets {
        let mut insets = Insets::default();
        for class in class_names {
            if let Some(rule) = self.stylesheet.get(class) {
                rule.apply(&mut insets);
            }
        }
        insets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_size_resolution() {
        let mut tree = ElementTree::new();
        let root = tree.add_root("root");
        let child = tree.add_child(root, "child");
        tree.set_sizes(child, SizeSpec::Relative(50.0), SizeSpec::Undefined);
        tree.set_intrinsic_size(child, 10.0, 24.0);

        assert_eq!(tree.outer_size(child, Axis::Horizontal), 0.0);
        tree.place(child, Axis::Horizontal, 5.0, 200.0);
        assert_eq!(tree.outer_size(child, Axis::Horizontal), 100.0);
        assert_eq!(tree.outer_size(child, Axis::Vertical), 24.0);
        assert_eq!(tree.position(child, Axis::Horizontal), 5.0);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = ElementTree::new();
        let root = tree.add_root("root");
        let a = tree.add_child(root, "a");
        let b = tree.add_child(a, "b");
        tree.remove(a);
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_probe_padding_applies_rules_in_order() {
        let mut tree = ElementTree::new();
        tree.add_style_rule(
            "v-layout-margin-top",
            PaddingRule { top: Some(18.0), ..Default::default() },
        );
        tree.add_style_rule(
            "v-layout-margin-left",
            PaddingRule { left: Some(12.0), ..Default::default() },
        );
        let insets = tree.probe_padding(&[
            "v-layout-margin-top".to_string(),
            "v-layout-margin-left".to_string(),
            "unknown".to_string(),
        ]);
        assert_eq!(insets, Insets::new(18.0, 0.0, 0.0, 12.0));
    }

    #[test]
    fn test_hidden_element_measures_zero() {
        let mut tree = ElementTree::new();
        let root = tree.add_root("root");
        tree.set_sizes(root, SizeSpec::Fixed(40.0), SizeSpec::Fixed(40.0));
        tree.set_visible(root, false);
        assert_eq!(tree.box_geometry(root).unwrap().outer_width, 0.0);
    }
}
