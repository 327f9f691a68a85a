use crate::view::base_component::ElementId;
use crate::view::element_tree::ElementTree;

/// Ordered pages where only the current one is shown. Visibility changes propagate to the
/// whole page subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageManager {
    pages: Vec<ElementId>,
    current: Option<usize>,
}

impl PageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[ElementId] {
        &self.pages
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_page(&self) -> Option<ElementId> {
        self.pages.get(self.current?).copied()
    }

    pub fn contains(&self, page: ElementId) -> bool {
        self.pages.contains(&page)
    }

    /// Appends a page. The first page becomes current and visible; later ones start hidden.
    pub fn add(&mut self, tree: &mut ElementTree, page: ElementId) {
        let position = self.pages.len();
        self.insert_at(tree, page, position);
    }

    /// Inserts at `position`, or appends when the position is past the end. The current
    /// page stays current even when its index shifts.
    pub fn insert_at(&mut self, tree: &mut ElementTree, page: ElementId, position: usize) {
        if !tree.contains(page) || self.contains(page) {
            return;
        }
        let position = position.min(self.pages.len());
        self.pages.insert(position, page);
        match self.current {
            None => {
                self.current = Some(0);
                tree.set_hidden_recursive(page, false);
            }
            Some(current) => {
                tree.set_hidden_recursive(page, true);
                if position <= current {
                    self.current = Some(current + 1);
                }
            }
        }
    }

    /// Shows the page at `index` and hides the previous one. Out-of-range indices are ignored.
    pub fn switch_to(&mut self, tree: &mut ElementTree, index: usize) {
        if index >= self.pages.len() {
            return;
        }
        if let Some(old) = self.current_page() {
            tree.set_hidden_recursive(old, true);
        }
        self.current = Some(index);
        tree.set_hidden_recursive(self.pages[index], false);
        log::debug!("switched to page {index} of {}", self.pages.len());
    }

    pub fn next(&mut self, tree: &mut ElementTree) {
        if self.pages.is_empty() {
            return;
        }
        let next = self.current.map_or(0, |current| (current + 1) % self.pages.len());
        self.switch_to(tree, next);
    }

    pub fn previous(&mut self, tree: &mut ElementTree) {
        if self.pages.is_empty() {
            return;
        }
        let previous = match self.current {
            Some(0) | None => self.pages.len() - 1,
            Some(current) => current - 1,
        };
        self.switch_to(tree, previous);
    }

    /// Forgets deleted pages. When the current page itself is gone, the page that slides
    /// into its slot (or the new last page) is shown instead.
    pub fn forget(&mut self, tree: &mut ElementTree, removed: &[ElementId]) {
        if !self.pages.iter().any(|page| removed.contains(page)) {
            return;
        }
        let current_page = self.current_page();
        let old_index = self.current.unwrap_or(0);
        self.pages.retain(|page| !removed.contains(page));

        if self.pages.is_empty() {
            self.current = None;
            return;
        }
        match current_page.and_then(|page| self.pages.iter().position(|p| *p == page)) {
            Some(index) => self.current = Some(index),
            None => {
                let index = old_index.min(self.pages.len() - 1);
                self.current = Some(index);
                tree.set_hidden_recursive(self.pages[index], false);
            }
        }
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::PageManager;
    use crate::view::base_component::{Element, ElementCore, ElementId, ElementKind, FrameState};
    use crate::view::element_tree::ElementTree;

    fn setup(count: usize) -> (ElementTree, Vec<ElementId>) {
        let mut tree = ElementTree::new();
        let pages = (0..count)
            .map(|_| {
                tree.insert(
                    None,
                    Element::new(
                        ElementCore::new(0, 0, 100, 100),
                        ElementKind::Frame(FrameState::default()),
                    ),
                )
            })
            .collect();
        (tree, pages)
    }

    fn visible(tree: &ElementTree, pages: &[ElementId]) -> Vec<bool> {
        pages
            .iter()
            .map(|id| tree.get(*id).is_some_and(|el| !el.core.is_hidden()))
            .collect()
    }

    #[test]
    fn only_the_first_added_page_is_visible() {
        let (mut tree, pages) = setup(3);
        let mut manager = PageManager::new();
        for page in &pages {
            manager.add(&mut tree, *page);
        }
        assert_eq!(manager.current(), Some(0));
        assert_eq!(visible(&tree, &pages), vec![true, false, false]);
    }

    #[test]
    fn switch_shows_exactly_the_target() {
        let (mut tree, pages) = setup(3);
        let mut manager = PageManager::new();
        for page in &pages {
            manager.add(&mut tree, *page);
        }
        manager.switch_to(&mut tree, 2);
        assert_eq!(visible(&tree, &pages), vec![false, false, true]);
        manager.switch_to(&mut tree, 7);
        assert_eq!(manager.current(), Some(2));
    }

    #[test]
    fn next_and_previous_wrap() {
        let (mut tree, pages) = setup(3);
        let mut manager = PageManager::new();
        for page in &pages {
            manager.add(&mut tree, *page);
        }
        manager.previous(&mut tree);
        assert_eq!(manager.current(), Some(2));
        manager.next(&mut tree);
        assert_eq!(manager.current(), Some(0));
        assert_eq!(visible(&tree, &pages), vec![true, false, false]);
    }

    #[test]
    fn insert_before_current_keeps_identity() {
        let (mut tree, pages) = setup(3);
        let mut manager = PageManager::new();
        manager.add(&mut tree, pages[0]);
        manager.add(&mut tree, pages[1]);
        manager.switch_to(&mut tree, 1);

        manager.insert_at(&mut tree, pages[2], 0);
        assert_eq!(manager.current(), Some(2));
        assert_eq!(manager.current_page(), Some(pages[1]));
        assert_eq!(visible(&tree, &pages), vec![false, true, false]);
    }

    #[test]
    fn out_of_range_insert_appends() {
        let (mut tree, pages) = setup(2);
        let mut manager = PageManager::new();
        manager.add(&mut tree, pages[0]);
        manager.insert_at(&mut tree, pages[1], 40);
        assert_eq!(manager.pages(), &[pages[0], pages[1]]);
        assert_eq!(manager.current(), Some(0));
    }

    #[test]
    fn forgetting_the_current_page_shows_its_successor() {
        let (mut tree, pages) = setup(3);
        let mut manager = PageManager::new();
        for page in &pages {
            manager.add(&mut tree, *page);
        }
        manager.switch_to(&mut tree, 1);
        tree.remove(pages[1]);
        manager.forget(&mut tree, &[pages[1]]);
        assert_eq!(manager.current_page(), Some(pages[2]));
        assert_eq!(visible(&tree, &[pages[0], pages[2]]), vec![false, true]);

        manager.forget(&mut tree, &[pages[0]]);
        assert_eq!(manager.current(), Some(0));
        assert_eq!(manager.current_page(), Some(pages[2]));
    }
}
