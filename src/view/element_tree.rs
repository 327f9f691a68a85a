use slotmap::SlotMap;

use crate::view::base_component::{Element, ElementFlags, ElementId, ElementKind};
use crate::view::layout::update_layout;

/// Owning arena for every element plus the ordered list of parentless roots.
pub struct ElementTree {
    elements: SlotMap<ElementId, Element>,
    roots: Vec<ElementId>,
    next_creation: u64,
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            roots: Vec::new(),
            next_creation: 0,
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id)
            .map_or(&[], |element| element.core.children.as_slice())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id)?.core.parent
    }

    /// Stamps a creation sequence and attaches the element under `parent`, or as a root when
    /// the parent is absent or unknown. A frame parent is laid out again.
    pub fn insert(&mut self, parent: Option<ElementId>, mut element: Element) -> ElementId {
        element.core.creation = self.next_creation;
        self.next_creation += 1;
        element.core.parent = None;
        let id = self.elements.insert(element);
        self.attach(id, parent.filter(|p| self.elements.contains_key(*p)));
        id
    }

    /// Moves `child` under `parent`. Rejects unknown ids and moves that would create a cycle.
    pub fn reparent(&mut self, child: ElementId, parent: ElementId) -> bool {
        if !self.contains(child) || !self.contains(parent) || self.is_within(parent, child) {
            return false;
        }
        self.detach(child);
        self.attach(child, Some(parent));
        true
    }

    /// Removes `id` and its whole subtree. Returns every removed id, `id` first.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.detach(id);
        let removed = self.descendants(id);
        for gone in &removed {
            self.elements.remove(*gone);
        }
        removed
    }

    /// Removes every root and everything below it.
    pub fn clear(&mut self) -> usize {
        let count = self.elements.len();
        self.elements.clear();
        self.roots.clear();
        count
    }

    /// `id` followed by all of its descendants, depth first.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if !self.contains(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `id` is `ancestor` or lies somewhere below it.
    pub fn is_within(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn set_hidden_recursive(&mut self, id: ElementId, hidden: bool) {
        for target in self.descendants(id) {
            if let Some(element) = self.elements.get_mut(target) {
                element.core.flags.set(ElementFlags::HIDDEN, hidden);
            }
        }
    }

    /// Visible members of `ids`, back to front: z ascending, then creation ascending.
    pub fn paint_order(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut ordered = self.visible(ids);
        ordered.sort_by_key(|(_, z, creation)| (*z, *creation));
        ordered.into_iter().map(|(id, _, _)| id).collect()
    }

    /// Visible members of `ids`, front to back: z descending, then creation descending.
    pub fn hit_order(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut ordered = self.visible(ids);
        ordered.sort_by(|a, b| (b.1, b.2).cmp(&(a.1, a.2)));
        ordered.into_iter().map(|(id, _, _)| id).collect()
    }

    /// Screen position of the element's top-left corner. Ancestor frames contribute their
    /// vertical scroll to `y` only.
    pub fn world_origin(&self, id: ElementId) -> Option<(i32, i32)> {
        let element = self.get(id)?;
        let (mut x, mut y) = (element.core.x, element.core.y);
        let mut cursor = element.core.parent;
        while let Some(parent_id) = cursor {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            x += parent.core.x;
            y += parent.core.y;
            if let ElementKind::Frame(frame) = &parent.kind {
                y -= frame.scroll_y;
            }
            cursor = parent.core.parent;
        }
        Some((x, y))
    }

    /// Nearest element at or above `id` that is a scrollable frame.
    pub fn scrollable_ancestor(&self, id: ElementId) -> Option<ElementId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let element = self.get(current)?;
            if matches!(element.kind, ElementKind::Frame(_))
                && element.core.flags.contains(ElementFlags::SCROLLABLE)
            {
                return Some(current);
            }
            cursor = element.core.parent;
        }
        None
    }

    fn visible(&self, ids: &[ElementId]) -> Vec<(ElementId, i32, u64)> {
        ids.iter()
            .filter_map(|id| {
                let element = self.get(*id)?;
                (!element.core.is_hidden()).then_some((
                    *id,
                    element.core.z_index,
                    element.core.creation,
                ))
            })
            .collect()
    }

    fn attach(&mut self, id: ElementId, parent: Option<ElementId>) {
        match parent.and_then(|p| self.elements.get_mut(p).map(|el| (p, el))) {
            Some((parent_id, parent_element)) => {
                parent_element.core.children.push(id);
                if let Some(element) = self.elements.get_mut(id) {
                    element.core.parent = Some(parent_id);
                }
                update_layout(self, parent_id);
            }
            None => self.roots.push(id),
        }
    }

    fn detach(&mut self, id: ElementId) {
        let parent = self.parent(id);
        match parent {
            Some(parent_id) => {
                if let Some(parent_element) = self.elements.get_mut(parent_id) {
                    parent_element.core.children.retain(|child| *child != id);
                }
                update_layout(self, parent_id);
            }
            None => self.roots.retain(|root| *root != id),
        }
        if let Some(element) = self.elements.get_mut(id) {
            element.core.parent = None;
        }
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ElementTree;
    use crate::view::base_component::{Element, ElementCore, ElementKind, FrameState, LabelState};

    fn frame() -> Element {
        Element::new(
            ElementCore::new(0, 0, 300, 300),
            ElementKind::Frame(FrameState::default()),
        )
    }

    fn label() -> Element {
        Element::new(
            ElementCore::new(0, 0, 0, 0),
            ElementKind::Label(LabelState::new("l")),
        )
    }

    #[test]
    fn remove_drops_the_whole_subtree_and_detaches() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, frame());
        let inner = tree.insert(Some(root), frame());
        let leaf = tree.insert(Some(inner), label());
        let sibling = tree.insert(Some(root), label());

        let removed = tree.remove(inner);
        assert_eq!(removed, vec![inner, leaf]);
        assert!(!tree.contains(leaf));
        assert_eq!(tree.children(root), &[sibling]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut tree = ElementTree::new();
        let outer = tree.insert(None, frame());
        let inner = tree.insert(Some(outer), frame());
        assert!(!tree.reparent(outer, inner));
        assert!(!tree.reparent(outer, outer));

        let loose = tree.insert(None, label());
        assert!(tree.reparent(loose, inner));
        assert_eq!(tree.roots(), &[outer]);
        assert_eq!(tree.parent(loose), Some(inner));
    }

    #[test]
    fn ordering_uses_z_then_creation() {
        let mut tree = ElementTree::new();
        let a = tree.insert(None, label());
        let b = tree.insert(None, label());
        let c = tree.insert(None, label());
        if let Some(element) = tree.get_mut(a) {
            element.core.z_index = 5;
        }
        assert_eq!(tree.paint_order(&[a, b, c]), vec![b, c, a]);
        assert_eq!(tree.hit_order(&[a, b, c]), vec![a, c, b]);

        tree.set_hidden_recursive(c, true);
        assert_eq!(tree.hit_order(&[a, b, c]), vec![a, b]);
    }

    #[test]
    fn world_origin_subtracts_scroll_from_y_only() {
        let mut tree = ElementTree::new();
        let outer = tree.insert(None, frame());
        let child = tree.insert(Some(outer), label());
        if let Some(element) = tree.get_mut(outer) {
            element.core.x = 20;
            element.core.y = 40;
        }
        if let Some(frame) = tree.get_mut(outer).and_then(|el| el.as_frame_mut()) {
            frame.scroll_y = 15;
        }
        // label sits at the padding offset (10, 10)
        assert_eq!(tree.world_origin(child), Some((30, 35)));
    }
}
