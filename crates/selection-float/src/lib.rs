//! Floating toolbar coordination for a rich-text editing surface
//!
//! The editor reports pointer, keyboard and selection events to a [`Coordinator`],
//! which classifies the current selection and decides which overlay is open and
//! what it is anchored to:
//! - a range selection opens the inline formatting toolbar over the text
//! - a caret inside text opens the paragraph toolbar in the left gutter, plus the
//!   URL popover when the caret sits in a link
//! - anything else hides every overlay
//!
//! Timing is explicit. Callers pass an [`std::time::Instant`] with every event and
//! drive [`Coordinator::poll`] from their event loop.

mod coordinator;
mod debounce;
mod geometry;
mod reference;
mod selection;

pub use coordinator::{
    Coordinator, CoordinatorConfig, EditorEvent, EventTarget, Key, Overlay, OverlayState,
};
pub use debounce::Debouncer;
pub use geometry::{Rect, VirtualElement};
pub use reference::{GutterReference, RangeReference};
pub use selection::{LiveRange, NativeSelection, SelectionHost, SelectionKind, classify};
