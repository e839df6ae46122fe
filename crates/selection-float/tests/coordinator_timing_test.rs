use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use selection_float::{
    Coordinator, EditorEvent, EventTarget, LiveRange, NativeSelection, Overlay, Rect,
    SelectionHost,
};

#[derive(Debug)]
struct Text {
    rects: RefCell<Option<Vec<Rect>>>,
}

impl Text {
    fn at(rect: Rect) -> Rc<Self> {
        Rc::new(Self {
            rects: RefCell::new(Some(vec![rect])),
        })
    }
}

impl LiveRange for Text {
    fn rects(&self) -> Option<Vec<Rect>> {
        self.rects.borrow().clone()
    }
}

#[derive(Debug, Default)]
struct Editor {
    selection: Option<NativeSelection>,
}

impl SelectionHost for Editor {
    fn selection(&self) -> Option<NativeSelection> {
        self.selection.clone()
    }

    fn container_rect(&self) -> Rect {
        Rect::new(24.0, 0.0, 800.0, 600.0)
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_selection_changes_collapse_into_one_recompute() {
    let start = Instant::now();
    let mut coordinator = Coordinator::new(Editor::default());
    coordinator.host_mut().selection = Some(NativeSelection::caret(Text::at(Rect::new(
        100.0, 40.0, 1.0, 18.0,
    ))));

    for i in 0..10 {
        let now = start + ms(i);
        coordinator.handle_event(EditorEvent::SelectionChange, now);
        // The event loop polls between events; nothing is due yet
        assert!(!coordinator.poll(now));
    }

    assert!(!coordinator.poll(start + ms(58)));
    assert!(coordinator.poll(start + ms(60)));
    assert_eq!(coordinator.recompute_count(), 1);
    assert!(coordinator.is_open(Overlay::ParagraphCollapsed));
}

#[test]
fn test_selection_changes_after_quiet_window_recompute_each() {
    let start = Instant::now();
    let mut coordinator = Coordinator::new(Editor::default());
    coordinator.host_mut().selection = Some(NativeSelection::caret(Text::at(Rect::new(
        100.0, 40.0, 1.0, 18.0,
    ))));

    coordinator.handle_event(EditorEvent::SelectionChange, start);
    assert!(coordinator.poll(start + ms(50)));
    assert_eq!(coordinator.recompute_count(), 1);

    coordinator.handle_event(EditorEvent::SelectionChange, start + ms(60));
    assert!(!coordinator.poll(start + ms(100)));
    assert!(coordinator.poll(start + ms(110)));
    assert_eq!(coordinator.recompute_count(), 2);
}

#[test]
fn test_drag_suppresses_selection_changes_until_mouse_up() {
    let start = Instant::now();
    let text = Text::at(Rect::new(100.0, 40.0, 120.0, 18.0));
    let mut coordinator = Coordinator::new(Editor::default());

    coordinator.host_mut().selection = Some(NativeSelection::caret(text.clone()));
    coordinator.handle_event(EditorEvent::MouseDown(EventTarget::Editor), start);
    assert!(!coordinator.is_dragging());

    coordinator.host_mut().selection = Some(NativeSelection::span(text));
    coordinator.handle_event(EditorEvent::MouseMove, start + ms(5));
    assert!(coordinator.is_dragging());

    for i in 0..20 {
        coordinator.handle_event(EditorEvent::SelectionChange, start + ms(10 + i * 10));
        coordinator.poll(start + ms(10 + i * 10));
    }
    assert_eq!(coordinator.recompute_count(), 0);

    coordinator.handle_event(EditorEvent::MouseUp(EventTarget::Editor), start + ms(300));
    assert!(!coordinator.is_dragging());
    assert_eq!(coordinator.recompute_count(), 1);
    assert!(coordinator.is_open(Overlay::Inline));

    assert!(!coordinator.poll(start + ms(1000)));
    assert_eq!(coordinator.recompute_count(), 1);
}

#[test]
fn test_caret_in_link_opens_popover_with_exact_href() {
    let start = Instant::now();
    let href = "https://example.com/a path?q=1 ";
    let mut coordinator = Coordinator::new(Editor::default());
    coordinator.host_mut().selection = Some(
        NativeSelection::caret(Text::at(Rect::new(300.0, 80.0, 1.0, 18.0))).in_link(href),
    );

    coordinator.handle_event(EditorEvent::MouseDown(EventTarget::Editor), start);
    coordinator.handle_event(EditorEvent::MouseUp(EventTarget::Editor), start);

    assert!(coordinator.is_url_open());
    assert_eq!(coordinator.url(), href);
    assert!(coordinator.is_open(Overlay::Link));
    assert!(coordinator.is_open(Overlay::ParagraphCollapsed));

    // Moving the caret out of the link closes the popover again
    coordinator.host_mut().selection = Some(NativeSelection::caret(Text::at(Rect::new(
        20.0, 80.0, 1.0, 18.0,
    ))));
    coordinator.handle_event(EditorEvent::KeyUp(selection_float::Key::Left), start + ms(5));
    assert!(coordinator.poll(start + ms(5)));
    assert!(!coordinator.is_url_open());
    assert!(!coordinator.is_open(Overlay::Link));
}

#[test]
fn test_reference_survives_removed_text() {
    let start = Instant::now();
    let text = Text::at(Rect::new(100.0, 40.0, 120.0, 18.0));
    let mut coordinator = Coordinator::new(Editor::default());
    coordinator.host_mut().selection = Some(NativeSelection::span(text.clone()));
    coordinator.handle_event(EditorEvent::MouseUp(EventTarget::Editor), start);

    let reference = coordinator.reference(Overlay::Inline);
    text.rects.replace(None);

    let rect = reference.map(|r| r.bounding_rect());
    assert_eq!(rect, Some(Rect::ZERO));
}
