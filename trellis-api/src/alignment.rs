//! Child alignment and layout margin bit sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Where a child sits inside the cell allocated to it.
    ///
    /// One horizontal bit and one vertical bit are normally set. An empty
    /// horizontal part behaves like `LEFT`, an empty vertical part like `TOP`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct AlignmentInfo: u8 {
        const LEFT = 1;
        const RIGHT = 2;
        const TOP = 4;
        const BOTTOM = 8;
        const HORIZONTAL_CENTER = 16;
        const VERTICAL_CENTER = 32;

        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOP_CENTER = Self::TOP.bits() | Self::HORIZONTAL_CENTER.bits();
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const MIDDLE_LEFT = Self::VERTICAL_CENTER.bits() | Self::LEFT.bits();
        const MIDDLE_CENTER = Self::VERTICAL_CENTER.bits() | Self::HORIZONTAL_CENTER.bits();
        const MIDDLE_RIGHT = Self::VERTICAL_CENTER.bits() | Self::RIGHT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOM_CENTER = Self::BOTTOM.bits() | Self::HORIZONTAL_CENTER.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

impl Default for AlignmentInfo {
    fn default() -> Self {
        AlignmentInfo::TOP_LEFT
    }
}

impl AlignmentInfo {
    pub fn is_left(self) -> bool {
        !self.intersects(AlignmentInfo::RIGHT | AlignmentInfo::HORIZONTAL_CENTER)
    }

    pub fn is_right(self) -> bool {
        self.contains(AlignmentInfo::RIGHT)
    }

    pub fn is_horizontal_center(self) -> bool {
        self.contains(AlignmentInfo::HORIZONTAL_CENTER)
    }

    pub fn is_top(self) -> bool {
        !self.intersects(AlignmentInfo::BOTTOM | AlignmentInfo::VERTICAL_CENTER)
    }

    pub fn is_bottom(self) -> bool {
        self.contains(AlignmentInfo::BOTTOM)
    }

    pub fn is_vertical_center(self) -> bool {
        self.contains(AlignmentInfo::VERTICAL_CENTER)
    }
}

bitflags! {
    /// Which sides of a layout have a margin enabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MarginInfo: u8 {
        const TOP = 1;
        const RIGHT = 2;
        const BOTTOM = 4;
        const LEFT = 8;
    }
}

impl Default for MarginInfo {
    fn default() -> Self {
        MarginInfo::empty()
    }
}

impl MarginInfo {
    /// Style-name suffixes of the enabled sides, in top/right/bottom/left order.
    pub fn side_suffixes(self) -> impl Iterator<Item = &'static str> {
        [
            (MarginInfo::TOP, "top"),
            (MarginInfo::RIGHT, "right"),
            (MarginInfo::BOTTOM, "bottom"),
            (MarginInfo::LEFT, "left"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, suffix)| suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alignment_is_top_left() {
        let a = AlignmentInfo::default();
        assert!(a.is_left());
        assert!(a.is_top());
        assert!(!a.is_right());
        assert!(!a.is_vertical_center());
    }

    #[test]
    fn test_empty_parts_fall_back_to_start() {
        let a = AlignmentInfo::BOTTOM;
        assert!(a.is_left());
        assert!(!a.is_top());
        assert!(a.is_bottom());
    }

    #[test]
    fn test_middle_center() {
        let a = AlignmentInfo::MIDDLE_CENTER;
        assert!(a.is_horizontal_center());
        assert!(a.is_vertical_center());
        assert!(!a.is_left());
        assert!(!a.is_top());
    }

    #[test]
    fn test_margin_side_suffixes() {
        let m = MarginInfo::TOP | MarginInfo::LEFT;
        assert_eq!(m.side_suffixes().collect::<Vec<_>>(), vec!["top", "left"]);
        assert_eq!(MarginInfo::all().side_suffixes().count(), 4);
        assert_eq!(MarginInfo::empty().side_suffixes().count(), 0);
    }
}
