//! Flow layout for frames. Children are placed in insertion order; hidden children are
//! skipped and keep their last position.

use crate::view::base_component::{ElementFlags, ElementId, FrameState};
use crate::view::element_tree::ElementTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Vertical,
    Horizontal,
    Grid,
}

impl LayoutMode {
    /// Grid wins over horizontal, horizontal over vertical.
    pub fn from_flags(flags: ElementFlags) -> Self {
        if flags.contains(ElementFlags::LAYOUT_GRID) {
            LayoutMode::Grid
        } else if flags.contains(ElementFlags::LAYOUT_HORIZONTAL) {
            LayoutMode::Horizontal
        } else {
            LayoutMode::Vertical
        }
    }
}

struct FlowCursor {
    x: i32,
    y: i32,
    row_height: i32,
    columns: usize,
}

/// Positions the children of `frame` and records the resulting content height.
/// Non-frames are ignored. Children with a zero dimension receive the frame's default size.
pub fn update_layout(tree: &mut ElementTree, frame: ElementId) {
    let Some(element) = tree.get(frame) else {
        return;
    };
    let Some(state) = element.as_frame() else {
        return;
    };
    let mode = LayoutMode::from_flags(element.core.flags);
    let frame_w = element.core.w;
    let config = state.clone();
    let children = element.core.children.clone();

    let mut cursor = FlowCursor {
        x: config.padding,
        y: config.padding,
        row_height: 0,
        columns: 0,
    };
    for child in children {
        let Some(child) = tree.get_mut(child) else {
            continue;
        };
        if child.core.is_hidden() {
            continue;
        }
        let (w, h) = config.child_size_for(child.core.w, child.core.h);
        child.core.w = w;
        child.core.h = h;
        let (x, y) = place(mode, &config, frame_w, &mut cursor, w, h);
        child.core.x = x;
        child.core.y = y;
    }

    if let Some(state) = tree.get_mut(frame).and_then(|el| el.as_frame_mut()) {
        state.content_height = cursor.y + cursor.row_height + config.padding;
    }
}

fn place(
    mode: LayoutMode,
    config: &FrameState,
    frame_w: i32,
    cursor: &mut FlowCursor,
    w: i32,
    h: i32,
) -> (i32, i32) {
    match mode {
        LayoutMode::Grid => {
            let overflows = cursor.x + w + config.padding > frame_w;
            let capped = config.max_grid_cols > 0 && cursor.columns >= config.max_grid_cols;
            if overflows || capped {
                cursor.x = config.padding;
                cursor.y += cursor.row_height + config.spacing;
                cursor.row_height = 0;
                cursor.columns = 0;
            }
            let at = (cursor.x, cursor.y);
            cursor.x += w + config.spacing;
            cursor.row_height = cursor.row_height.max(h);
            cursor.columns += 1;
            at
        }
        LayoutMode::Horizontal => {
            let at = (cursor.x, cursor.y);
            cursor.x += w + config.spacing;
            cursor.row_height = cursor.row_height.max(h);
            at
        }
        LayoutMode::Vertical => {
            let at = (cursor.x, cursor.y);
            cursor.y += h + config.spacing;
            at
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutMode, update_layout};
    use crate::view::base_component::{
        Element, ElementCore, ElementFlags, ElementKind, FrameState, LabelState,
    };
    use crate::view::element_tree::ElementTree;

    fn frame(w: i32, h: i32, flags: ElementFlags, padding: i32, spacing: i32) -> Element {
        let mut core = ElementCore::new(0, 0, w, h);
        core.flags = flags;
        Element::new(
            core,
            ElementKind::Frame(FrameState {
                padding,
                spacing,
                ..FrameState::default()
            }),
        )
    }

    fn sized(w: i32, h: i32) -> Element {
        Element::new(
            ElementCore::new(0, 0, w, h),
            ElementKind::Label(LabelState::new("x")),
        )
    }

    fn position(tree: &ElementTree, id: crate::view::ElementId) -> (i32, i32) {
        tree.get(id)
            .map(|el| (el.core.x, el.core.y))
            .unwrap_or((-1, -1))
    }

    #[test]
    fn grid_with_column_cap_wraps_fourth_child() {
        let mut tree = ElementTree::new();
        let grid = tree.insert(None, frame(200, 150, ElementFlags::LAYOUT_GRID, 0, 5));
        if let Some(state) = tree.get_mut(grid).and_then(|el| el.as_frame_mut()) {
            state.max_grid_cols = 3;
        }
        let ids: Vec<_> = (0..4).map(|_| tree.insert(Some(grid), sized(60, 60))).collect();

        let positions: Vec<_> = ids.iter().map(|id| position(&tree, *id)).collect();
        assert_eq!(positions, vec![(0, 0), (65, 0), (130, 0), (0, 65)]);
        let content = tree.get(grid).and_then(|el| el.as_frame()).map(|f| f.content_height);
        assert_eq!(content, Some(125));
    }

    #[test]
    fn grid_wraps_on_width_without_cap() {
        let mut tree = ElementTree::new();
        let grid = tree.insert(None, frame(150, 150, ElementFlags::LAYOUT_GRID, 10, 5));
        let a = tree.insert(Some(grid), sized(60, 40));
        let b = tree.insert(Some(grid), sized(60, 20));
        let c = tree.insert(Some(grid), sized(60, 20));
        assert_eq!(position(&tree, a), (10, 10));
        assert_eq!(position(&tree, b), (75, 10));
        // 140 + 60 + 10 > 150
        assert_eq!(position(&tree, c), (10, 55));
    }

    #[test]
    fn vertical_stack_fills_zero_sizes_and_skips_hidden() {
        let mut tree = ElementTree::new();
        let column = tree.insert(None, frame(300, 300, ElementFlags::empty(), 10, 8));
        let a = tree.insert(Some(column), sized(0, 0));
        let hidden = tree.insert(Some(column), sized(50, 50));
        if let Some(el) = tree.get_mut(hidden) {
            el.core.flags.insert(ElementFlags::HIDDEN);
        }
        let b = tree.insert(Some(column), sized(40, 20));
        update_layout(&mut tree, column);

        let a_size = tree.get(a).map(|el| (el.core.w, el.core.h));
        assert_eq!(a_size, Some((100, 30)));
        assert_eq!(position(&tree, a), (10, 10));
        assert_eq!(position(&tree, b), (10, 48));
        let content = tree.get(column).and_then(|el| el.as_frame()).map(|f| f.content_height);
        assert_eq!(content, Some(86));
    }

    #[test]
    fn horizontal_tracks_tallest_child() {
        let mut tree = ElementTree::new();
        let row = tree.insert(None, frame(500, 100, ElementFlags::LAYOUT_HORIZONTAL, 4, 2));
        let a = tree.insert(Some(row), sized(10, 30));
        let b = tree.insert(Some(row), sized(10, 50));
        assert_eq!(position(&tree, b), (16, 4));
        assert_eq!(position(&tree, a), (4, 4));
        let content = tree.get(row).and_then(|el| el.as_frame()).map(|f| f.content_height);
        assert_eq!(content, Some(58));
    }

    #[test]
    fn mode_precedence() {
        let both = ElementFlags::LAYOUT_GRID | ElementFlags::LAYOUT_HORIZONTAL;
        assert_eq!(LayoutMode::from_flags(both), LayoutMode::Grid);
        assert_eq!(
            LayoutMode::from_flags(ElementFlags::LAYOUT_HORIZONTAL | ElementFlags::LAYOUT_VERTICAL),
            LayoutMode::Horizontal
        );
        assert_eq!(LayoutMode::from_flags(ElementFlags::CLIP), LayoutMode::Vertical);
    }
}
