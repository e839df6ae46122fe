//! Positioning references synthesized from a live range

use std::rc::Rc;

use crate::geometry::{Rect, VirtualElement};
use crate::selection::LiveRange;

/// Anchors an overlay to the selected text itself
#[derive(Debug, Clone)]
pub struct RangeReference {
    range: Rc<dyn LiveRange>,
}

impl RangeReference {
    pub fn new(range: Rc<dyn LiveRange>) -> Self {
        Self { range }
    }
}

impl VirtualElement for RangeReference {
    fn bounding_rect(&self) -> Rect {
        match self.range.rects() {
            Some(rects) => Rect::bounding(&rects),
            None => {
                log::debug!("range detached, positioning against an empty rect");
                Rect::ZERO
            }
        }
    }

    fn client_rects(&self) -> Vec<Rect> {
        self.range.rects().unwrap_or_default()
    }
}

/// Anchors an overlay to the left gutter at the caret's line
///
/// Vertical position comes from the caret's first line, horizontal position from
/// the editor container, so the toolbar does not follow the caret sideways.
#[derive(Debug, Clone)]
pub struct GutterReference {
    range: Rc<dyn LiveRange>,
    container: Rect,
}

impl GutterReference {
    pub fn new(range: Rc<dyn LiveRange>, container: Rect) -> Self {
        Self { range, container }
    }
}

impl VirtualElement for GutterReference {
    fn bounding_rect(&self) -> Rect {
        let line = self
            .range
            .rects()
            .and_then(|rects| rects.first().copied());
        match line {
            Some(line) => Rect::new(self.container.left(), line.top(), 0.0, line.height),
            None => Rect::ZERO,
        }
    }

    fn client_rects(&self) -> Vec<Rect> {
        let rect = self.bounding_rect();
        if rect == Rect::ZERO {
            Vec::new()
        } else {
            vec![rect]
        }
    }
}
