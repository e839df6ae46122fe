//! Selection-driven overlay coordination

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::geometry::VirtualElement;
use crate::reference::{GutterReference, RangeReference};
use crate::selection::{NativeSelection, SelectionHost, SelectionKind, classify};

/// Floating overlays driven by the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// Character formatting toolbar over a selected range
    Inline,
    /// URL edit popover
    Link,
    ParagraphCollapsed,
    ParagraphExpanded,
}

impl Overlay {
    pub const ALL: [Overlay; 4] = [
        Overlay::Inline,
        Overlay::Link,
        Overlay::ParagraphCollapsed,
        Overlay::ParagraphExpanded,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    pub open: bool,
    pub reference: Option<Rc<dyn VirtualElement>>,
}

/// Where a pointer event landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Editor,
    /// Inside one of the floating overlays
    Overlay(Overlay),
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Other,
}

impl Key {
    /// Keys that move the caret without editing
    pub fn is_navigation(self) -> bool {
        !matches!(self, Key::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    MouseDown(EventTarget),
    MouseMove,
    MouseUp(EventTarget),
    SelectionChange,
    KeyUp(Key),
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Quiet window for selection changes
    pub debounce: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(50),
        }
    }
}

/// Derives overlay visibility and anchors from the host's selection
///
/// Events are fed in with [`Coordinator::handle_event`]; recomputation happens
/// either right away (mouse up), on the next [`Coordinator::poll`] (keyboard
/// navigation) or once the debounce window elapses (selection changes).
#[derive(Debug)]
pub struct Coordinator<H> {
    host: H,
    debouncer: Debouncer,
    immediate: bool,
    mouse_down: bool,
    dragging: bool,
    attached: bool,
    kind: SelectionKind,
    overlays: [OverlayState; 4],
    paragraph_expanded: bool,
    url: String,
    url_open: bool,
    recomputes: usize,
}

impl<H: SelectionHost> Coordinator<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, CoordinatorConfig::default())
    }

    pub fn with_config(host: H, config: CoordinatorConfig) -> Self {
        Self {
            host,
            debouncer: Debouncer::new(config.debounce),
            immediate: false,
            mouse_down: false,
            dragging: false,
            attached: true,
            kind: SelectionKind::NoSelection,
            overlays: Default::default(),
            paragraph_expanded: false,
            url: String::new(),
            url_open: false,
            recomputes: 0,
        }
    }

    pub fn handle_event(&mut self, event: EditorEvent, now: Instant) {
        if !self.attached {
            log::trace!("detached, ignoring {:?}", event);
            return;
        }

        match event {
            EditorEvent::MouseDown(EventTarget::Overlay(_))
            | EditorEvent::MouseUp(EventTarget::Overlay(_)) => {
                log::trace!("pointer event inside overlay ignored");
            }
            EditorEvent::MouseDown(_) => {
                self.mouse_down = true;
                self.dragging = self.selection_is_range();
            }
            EditorEvent::MouseMove => {
                if self.mouse_down && !self.dragging && self.selection_is_range() {
                    log::trace!("drag started");
                    self.dragging = true;
                }
            }
            EditorEvent::MouseUp(_) => {
                self.mouse_down = false;
                self.dragging = false;
                self.debouncer.cancel();
                self.recompute();
            }
            EditorEvent::SelectionChange => {
                if self.dragging {
                    return;
                }
                self.debouncer.call(now);
            }
            EditorEvent::KeyUp(key) => {
                if key.is_navigation() {
                    // A trailing debounced update would restore a stale caret position
                    self.debouncer.cancel();
                    self.immediate = true;
                }
            }
        }
    }

    /// Run whatever recompute is due. Returns whether one ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.attached {
            return false;
        }
        if std::mem::take(&mut self.immediate) || self.debouncer.poll(now) {
            self.recompute();
            return true;
        }
        false
    }

    /// When the event loop should call [`Coordinator::poll`] next
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        if self.immediate {
            Some(now)
        } else {
            self.debouncer.deadline()
        }
    }

    /// Stop reacting to events and hide everything
    pub fn detach(&mut self) {
        log::debug!("detaching selection coordinator");
        self.attached = false;
        self.debouncer.cancel();
        self.immediate = false;
        self.mouse_down = false;
        self.dragging = false;
        self.hide_all();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn selection_is_range(&self) -> bool {
        self.host
            .selection()
            .is_some_and(|selection| selection.is_range())
    }

    fn recompute(&mut self) {
        self.recomputes += 1;
        let selection = self.host.selection();
        self.kind = classify(selection.as_ref());
        log::trace!("selection recomputed as {:?}", self.kind);

        match (self.kind, selection) {
            (
                SelectionKind::RangeSelected,
                Some(NativeSelection {
                    range: Some(range), ..
                }),
            ) => {
                let anchor: Rc<dyn VirtualElement> = Rc::new(RangeReference::new(range));
                self.set_overlay(Overlay::Inline, true, Some(anchor));
                self.set_open(Overlay::ParagraphCollapsed, false);
                self.set_open(Overlay::ParagraphExpanded, false);
                self.set_url(None);
            }
            (
                SelectionKind::CollapsedInText,
                Some(NativeSelection {
                    range: Some(range),
                    link_href,
                    ..
                }),
            ) => {
                self.set_open(Overlay::Inline, false);

                let gutter: Rc<dyn VirtualElement> = Rc::new(GutterReference::new(
                    range.clone(),
                    self.host.container_rect(),
                ));
                // Both variants stay positioned so toggling does not jump
                self.set_overlay(
                    Overlay::ParagraphCollapsed,
                    !self.paragraph_expanded,
                    Some(gutter.clone()),
                );
                self.set_overlay(
                    Overlay::ParagraphExpanded,
                    self.paragraph_expanded,
                    Some(gutter),
                );

                match link_href {
                    Some(href) => {
                        let anchor: Rc<dyn VirtualElement> = Rc::new(RangeReference::new(range));
                        self.set_overlay(Overlay::Link, true, Some(anchor));
                        self.set_url(Some(href));
                    }
                    None => self.set_url(None),
                }
            }
            _ => self.hide_all(),
        }
    }

    fn set_overlay(
        &mut self,
        overlay: Overlay,
        open: bool,
        reference: Option<Rc<dyn VirtualElement>>,
    ) {
        self.overlays[overlay.index()] = OverlayState { open, reference };
    }

    fn set_open(&mut self, overlay: Overlay, open: bool) {
        self.overlays[overlay.index()].open = open;
    }

    fn set_url(&mut self, href: Option<String>) {
        match href {
            Some(href) => {
                self.url = href;
                self.url_open = true;
            }
            None => {
                self.url.clear();
                self.url_open = false;
                self.set_open(Overlay::Link, false);
            }
        }
    }

    fn hide_all(&mut self) {
        for overlay in Overlay::ALL {
            self.set_open(overlay, false);
        }
        self.set_url(None);
    }

    /// Switch between the collapsed and expanded paragraph toolbar
    pub fn toggle_paragraph_expanded(&mut self) {
        self.paragraph_expanded = !self.paragraph_expanded;
        if self.is_open(Overlay::ParagraphCollapsed) || self.is_open(Overlay::ParagraphExpanded) {
            self.set_open(Overlay::ParagraphCollapsed, !self.paragraph_expanded);
            self.set_open(Overlay::ParagraphExpanded, self.paragraph_expanded);
        }
    }

    pub fn close_url(&mut self) {
        self.set_url(None);
    }

    pub fn overlay(&self, overlay: Overlay) -> &OverlayState {
        &self.overlays[overlay.index()]
    }

    pub fn is_open(&self, overlay: Overlay) -> bool {
        self.overlay(overlay).open
    }

    pub fn reference(&self, overlay: Overlay) -> Option<Rc<dyn VirtualElement>> {
        self.overlay(overlay).reference.clone()
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_paragraph_expanded(&self) -> bool {
        self.paragraph_expanded
    }

    pub fn is_url_open(&self) -> bool {
        self.url_open
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
