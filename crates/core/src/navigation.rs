//! Cursor and scroll management over a paginated list.
//!
//! The navigator only knows the number of navigable entries and the page
//! size. After every movement the highlighted index is within
//! `[0, len - 1]` and the scroll offset satisfies
//! `offset <= index < offset + limit` and `offset <= max(0, len - limit)`.

use std::ops::Range;

use crate::key::KeyCode;

/// Direction to move the highlight in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

impl Movement {
    #[must_use]
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown => Some(Self::PageDown),
            KeyCode::Home => Some(Self::Home),
            KeyCode::End => Some(Self::End),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListNavigator {
    len: usize,
    limit: usize,
    index: usize,
    offset: usize,
}

impl ListNavigator {
    /// Creates a navigator over `len` entries showing `limit` at a time.
    /// A `limit` of zero is treated as one.
    #[must_use]
    pub fn new(len: usize, limit: usize) -> Self {
        Self {
            len,
            limit: limit.max(1),
            index: 0,
            offset: 0,
        }
    }

    /// Highlights `index` (clamped) and scrolls it into view.
    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.len.saturating_sub(1));
        self.scroll_into_view();
    }

    /// Applies `movement`. Returns `true` if the highlight moved.
    pub fn apply(&mut self, movement: Movement) -> bool {
        if self.len == 0 {
            return false;
        }

        let last = self.len - 1;
        let previous = self.index;
        self.index = match movement {
            Movement::Up => self.index.saturating_sub(1),
            Movement::Down => (self.index + 1).min(last),
            Movement::PageUp => self.index.saturating_sub(self.limit),
            Movement::PageDown => (self.index + self.limit).min(last),
            Movement::Home => 0,
            Movement::End => last,
        };
        self.scroll_into_view();

        self.index != previous
    }

    /// Changes the number of entries, keeping the highlight where possible.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.select(self.index);
    }

    /// Resets the highlight to the first entry.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.index = 0;
        self.offset = 0;
    }

    fn scroll_into_view(&mut self) {
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + self.limit {
            self.offset = self.index + 1 - self.limit;
        }

        let max_offset = self.len.saturating_sub(self.limit);
        self.offset = self.offset.min(max_offset);
    }

    /// The highlighted entry, or `None` when the list is empty.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indexes of the entries currently in the window.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        self.offset..(self.offset + self.limit).min(self.len)
    }

    #[must_use]
    pub fn has_overflow(&self) -> bool {
        self.len > self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MOVES: [Movement; 6] = [
        Movement::Up,
        Movement::Down,
        Movement::PageUp,
        Movement::PageDown,
        Movement::Home,
        Movement::End,
    ];

    fn assert_invariants(nav: &ListNavigator) {
        let Some(index) = nav.index() else {
            assert_eq!(nav.offset(), 0);
            return;
        };
        assert!(index < nav.len());
        assert!(nav.offset() <= index);
        assert!(index < nav.offset() + nav.limit());
        assert!(nav.offset() <= nav.len().saturating_sub(nav.limit()));
    }

    #[test]
    fn test_down_scrolls_window() {
        let mut nav = ListNavigator::new(10, 3);
        nav.apply(Movement::Down);
        nav.apply(Movement::Down);
        assert_eq!((nav.index(), nav.offset()), (Some(2), 0));

        nav.apply(Movement::Down);
        assert_eq!((nav.index(), nav.offset()), (Some(3), 1));
        assert_eq!(nav.visible_range(), 1..4);
    }

    #[test]
    fn test_up_clamps_at_zero() {
        let mut nav = ListNavigator::new(4, 2);
        assert!(!nav.apply(Movement::Up));
        assert_eq!(nav.index(), Some(0));
    }

    #[test]
    fn test_page_moves_by_limit_and_clamps() {
        let mut nav = ListNavigator::new(12, 5);
        nav.apply(Movement::PageDown);
        assert_eq!((nav.index(), nav.offset()), (Some(5), 1));
        nav.apply(Movement::PageDown);
        assert_eq!((nav.index(), nav.offset()), (Some(10), 6));
        nav.apply(Movement::PageDown);
        assert_eq!((nav.index(), nav.offset()), (Some(11), 7));
        nav.apply(Movement::PageUp);
        assert_eq!((nav.index(), nav.offset()), (Some(6), 6));
    }

    #[test]
    fn test_home_and_end() {
        let mut nav = ListNavigator::new(8, 3);
        nav.apply(Movement::End);
        assert_eq!((nav.index(), nav.offset()), (Some(7), 5));
        nav.apply(Movement::Home);
        assert_eq!((nav.index(), nav.offset()), (Some(0), 0));
    }

    #[test]
    fn test_short_list_never_scrolls() {
        let mut nav = ListNavigator::new(2, 5);
        nav.apply(Movement::End);
        assert_eq!((nav.index(), nav.offset()), (Some(1), 0));
        assert!(!nav.has_overflow());
    }

    #[test]
    fn test_empty_list_has_no_highlight() {
        let mut nav = ListNavigator::new(0, 5);
        assert!(!nav.apply(Movement::Down));
        assert_eq!(nav.index(), None);
        assert_eq!(nav.visible_range(), 0..0);
    }

    #[test]
    fn test_set_len_reclamps() {
        let mut nav = ListNavigator::new(10, 3);
        nav.apply(Movement::End);
        nav.set_len(4);
        assert_eq!((nav.index(), nav.offset()), (Some(3), 1));
        assert_invariants(&nav);
    }

    #[test]
    fn test_invariants_hold_for_every_move_sequence() {
        for len in 0..9 {
            for limit in 1..5 {
                // Every sequence of three moves from every starting index.
                for start in 0..len.max(1) {
                    for a in ALL_MOVES {
                        for b in ALL_MOVES {
                            for c in ALL_MOVES {
                                let mut nav = ListNavigator::new(len, limit);
                                nav.select(start);
                                assert_invariants(&nav);
                                for movement in [a, b, c] {
                                    nav.apply(movement);
                                    assert_invariants(&nav);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
