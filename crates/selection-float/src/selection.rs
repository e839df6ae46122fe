//! Native selection snapshot and its classification

use std::fmt::Debug;
use std::rc::Rc;

use crate::geometry::Rect;

/// A text range owned by the editor surface
///
/// The range may outlive the nodes it points into, so geometry is fallible.
pub trait LiveRange: Debug {
    /// Per-line rectangles, or `None` once the underlying nodes are gone
    fn rects(&self) -> Option<Vec<Rect>>;
}

/// What the editor reports about its current selection
#[derive(Debug, Clone)]
pub struct NativeSelection {
    pub range: Option<Rc<dyn LiveRange>>,
    /// Anchor and focus coincide
    pub collapsed: bool,
    /// The caret sits inside a text node
    pub in_text: bool,
    /// Href of the link mark around the caret, if any
    pub link_href: Option<String>,
}

impl NativeSelection {
    pub fn caret(range: Rc<dyn LiveRange>) -> Self {
        Self {
            range: Some(range),
            collapsed: true,
            in_text: true,
            link_href: None,
        }
    }

    pub fn span(range: Rc<dyn LiveRange>) -> Self {
        Self {
            range: Some(range),
            collapsed: false,
            in_text: true,
            link_href: None,
        }
    }

    pub fn in_link(mut self, href: impl Into<String>) -> Self {
        self.link_href = Some(href.into());
        self
    }

    pub fn outside_text(mut self) -> Self {
        self.in_text = false;
        self
    }

    pub fn is_range(&self) -> bool {
        self.range.is_some() && !self.collapsed
    }
}

/// The editor surface the coordinator observes
pub trait SelectionHost {
    fn selection(&self) -> Option<NativeSelection>;
    /// Bounding rect of the editor container
    fn container_rect(&self) -> Rect;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    NoSelection,
    CollapsedInText,
    CollapsedOutsideText,
    RangeSelected,
}

pub fn classify(selection: Option<&NativeSelection>) -> SelectionKind {
    match selection {
        Some(sel) if sel.range.is_none() => SelectionKind::NoSelection,
        Some(sel) if !sel.collapsed => SelectionKind::RangeSelected,
        Some(sel) if sel.in_text => SelectionKind::CollapsedInText,
        Some(_) => SelectionKind::CollapsedOutsideText,
        None => SelectionKind::NoSelection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Line;

    impl LiveRange for Line {
        fn rects(&self) -> Option<Vec<Rect>> {
            Some(vec![Rect::new(0.0, 0.0, 10.0, 20.0)])
        }
    }

    #[test]
    fn test_classify() {
        let range: Rc<dyn LiveRange> = Rc::new(Line);

        assert_eq!(classify(None), SelectionKind::NoSelection);
        assert_eq!(
            classify(Some(&NativeSelection::caret(range.clone()))),
            SelectionKind::CollapsedInText
        );
        assert_eq!(
            classify(Some(&NativeSelection::caret(range.clone()).outside_text())),
            SelectionKind::CollapsedOutsideText
        );
        assert_eq!(
            classify(Some(&NativeSelection::span(range))),
            SelectionKind::RangeSelected
        );
    }

    #[test]
    fn test_selection_without_range() {
        let selection = NativeSelection {
            range: None,
            collapsed: false,
            in_text: true,
            link_href: None,
        };
        assert_eq!(classify(Some(&selection)), SelectionKind::NoSelection);
        assert!(!selection.is_range());
    }
}
