//! Command menu composition root
//!
//! [`CommandMenu`] owns the registry, scheduler, store and filter. Render code talks
//! to it through [`CommandContext`] handles; once the menu is dropped every context
//! operation fails with [`CommandError::OutsideProvider`].

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::CommandError;
use crate::options::MenuOptions;
use crate::provider::CommandItem;
use crate::registry::Registry;
use crate::scheduler::{Priority, Scheduler};
use crate::score::{CommandScore, Filter};
use crate::state::{Field, State};
use crate::store::Store;

/// Keys the menu reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    Home,
    End,
    Enter,
    /// Jump to the previous group
    AltUp,
    /// Jump to the next group
    AltDown,
    /// Jump to the first item
    MetaUp,
    /// Jump to the last item
    MetaDown,
    Ctrl(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    /// Enter on a selectable item
    Activated(String),
}

/// A visible run of items rendered under the same group (or none)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub group: Option<String>,
    pub items: Vec<String>,
}

struct Inner {
    registry: Registry,
    scheduler: Scheduler<Inner>,
    options: MenuOptions,
    filter: Box<dyn Filter>,
    store: Store,
    emit_requested: bool,
}

impl Inner {
    fn request_emit(&mut self) {
        self.emit_requested = true;
    }

    fn search(&self) -> String {
        self.store.read(|state| state.search.clone())
    }

    fn is_filtering(&self) -> bool {
        self.options.should_filter && self.store.read(|state| !state.search.is_empty())
    }

    fn score(&self, id: &str, search: &str) -> f64 {
        let Some(meta) = self.registry.meta(id) else {
            return 0.0;
        };
        if meta.value.is_empty() {
            return 0.0;
        }
        let score = self.filter.score(&meta.value, search, &meta.keywords);
        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        }
    }

    fn is_visible(&self, id: &str, filtering: bool, scores: &HashMap<String, f64>) -> bool {
        !filtering
            || self.registry.is_force_mounted(id)
            || scores.get(id).is_some_and(|score| *score > 0.0)
    }

    /// Re-score every mounted item, then recount
    fn filter_items(&mut self) {
        if self.is_filtering() {
            let search = self.search();
            let scores: HashMap<String, f64> = self
                .registry
                .items()
                .map(|id| (id.to_string(), self.score(id, &search)))
                .collect();
            self.store.update(|state| state.filtered.items = scores);
        }
        self.tally();
    }

    /// Recount visible items and groups from the current scores
    fn tally(&mut self) {
        let filtering = self.is_filtering();
        let (count, groups) = self.store.read(|state| {
            let scores = &state.filtered.items;
            let count = self
                .registry
                .items()
                .filter(|id| self.is_visible(id, filtering, scores))
                .count();
            let groups: HashSet<String> = self
                .registry
                .groups()
                .filter(|group| {
                    self.registry
                        .members(group)
                        .iter()
                        .any(|member| self.is_visible(member, filtering, scores))
                })
                .map(str::to_string)
                .collect();
            (count, groups)
        });

        self.store.update(|state| {
            state.filtered.count = count;
            state.filtered.groups = groups;
        });
    }

    /// Recompute render order.
    ///
    /// Ungrouped items come first, then each group's members under their first
    /// group. Without a search everything keeps mount order. While searching,
    /// ungrouped items and members sort by score and groups by their best member.
    fn sort(&mut self) {
        let filtering = self.is_filtering();
        let order: Vec<String> = self.store.read(|state| {
            let scores = &state.filtered.items;
            let score = |id: &str| scores.get(id).copied().unwrap_or(0.0);
            let primary = self.registry.primary_groups();

            let mut ungrouped: Vec<&str> = Vec::new();
            let mut grouped: HashMap<&str, Vec<&str>> = HashMap::new();
            for id in self
                .registry
                .items()
                .filter(|id| self.is_visible(id, filtering, scores))
            {
                match primary.get(id) {
                    Some(group) => grouped.entry(*group).or_default().push(id),
                    None => ungrouped.push(id),
                }
            }

            let mut sections: Vec<(f64, Vec<&str>)> = self
                .registry
                .groups()
                .filter_map(|group| grouped.remove(group))
                .map(|members| {
                    let best = members.iter().map(|id| score(*id)).fold(0.0, f64::max);
                    (best, members)
                })
                .collect();

            if filtering {
                // Stable sorts: ties keep mount order
                ungrouped.sort_by(|a, b| score(*b).total_cmp(&score(*a)));
                for (_, members) in &mut sections {
                    members.sort_by(|a, b| score(*b).total_cmp(&score(*a)));
                }
                sections.sort_by(|a, b| b.0.total_cmp(&a.0));
            }

            ungrouped
                .into_iter()
                .chain(sections.into_iter().flat_map(|(_, members)| members))
                .map(str::to_string)
                .collect()
        });

        self.store.update(|state| state.filtered.order = order);
    }

    /// Visible, enabled items in render order
    fn selectable(&self) -> Vec<String> {
        self.store.read(|state| {
            state
                .filtered
                .order
                .iter()
                .filter(|id| !self.registry.is_disabled(id))
                .cloned()
                .collect()
        })
    }

    fn selected(&self) -> Option<String> {
        self.store.read(|state| state.selected.clone())
    }

    fn selection_is_valid(&self) -> bool {
        match self.selected() {
            None => false,
            Some(id) => self.selectable().contains(&id),
        }
    }

    fn set_selected(&mut self, selected: Option<String>) {
        if self.selected() != selected {
            log::debug!("selected item: {:?}", selected);
            self.store.set_state(Field::Selected(selected));
        }
        self.request_emit();
    }

    fn select_first(&mut self) {
        let first = self.selectable().into_iter().next();
        self.set_selected(first);
    }

    fn select_first_if_invalid(&mut self) {
        if !self.selection_is_valid() {
            self.select_first();
        }
    }

    fn item_mounted(&mut self) {
        self.filter_items();
        self.sort();
        self.select_first_if_invalid();
        self.request_emit();
    }

    fn item_removed(&mut self) {
        self.filter_items();
        self.sort();
        self.select_first_if_invalid();
        self.request_emit();
    }

    fn resort(&mut self) {
        self.tally();
        self.sort();
        self.select_first_if_invalid();
        self.request_emit();
    }

    fn unregister_item(&mut self, id: &str) {
        if !self.registry.remove_item(id) {
            return;
        }
        log::debug!("unregistered item {}", id);
        self.store.update(|state| {
            state.filtered.items.remove(id);
            state.filtered.order.retain(|visible| visible != id);
        });
        self.scheduler
            .schedule(Priority::ItemRemoved, Inner::item_removed);
    }

    fn unregister_group(&mut self, id: &str) {
        if !self.registry.remove_group(id) {
            return;
        }
        log::debug!("unregistered group {}", id);
        self.store.update(|state| {
            state.filtered.groups.remove(id);
        });
    }

    fn move_by(&mut self, change: isize) {
        let items = self.selectable();
        if items.is_empty() {
            return;
        }
        let len = items.len() as isize;
        let current = self
            .selected()
            .and_then(|selected| items.iter().position(|id| *id == selected));

        let target = match current {
            None if change < 0 && self.options.loop_navigation => Some(len - 1),
            None => Some(0),
            Some(index) => {
                let next = index as isize + change;
                if self.options.loop_navigation {
                    Some(next.rem_euclid(len))
                } else {
                    (0..len).contains(&next).then_some(next)
                }
            }
        };

        if let Some(target) = target {
            self.set_selected(Some(items[target as usize].clone()));
        }
    }

    fn move_to_edge(&mut self, last: bool) {
        let items = self.selectable();
        let target = if last { items.last() } else { items.first() };
        if let Some(target) = target.cloned() {
            self.set_selected(Some(target));
        }
    }

    fn move_by_group(&mut self, change: isize) {
        let sections: Vec<Section> = self
            .sections()
            .into_iter()
            .filter(|section| section.group.is_some())
            .collect();
        let current = self.selected().and_then(|selected| {
            sections
                .iter()
                .position(|section| section.items.contains(&selected))
        });

        let Some(current) = current else {
            self.move_by(change);
            return;
        };

        let mut index = current as isize + change;
        while (0..sections.len() as isize).contains(&index) {
            let section = &sections[index as usize];
            if let Some(item) = section
                .items
                .iter()
                .find(|id| !self.registry.is_disabled(id))
            {
                let item = item.clone();
                self.set_selected(Some(item));
                return;
            }
            index += change;
        }

        self.move_by(change);
    }

    /// Consecutive runs of visible items sharing a group
    fn sections(&self) -> Vec<Section> {
        self.store.read(|state| {
            let mut sections: Vec<Section> = Vec::new();
            for id in &state.filtered.order {
                let group = self.registry.primary_group(id).map(str::to_string);
                let same_group = sections.last().is_some_and(|last| last.group == group);
                if same_group {
                    if let Some(last) = sections.last_mut() {
                        last.items.push(id.clone());
                    }
                } else {
                    sections.push(Section {
                        group,
                        items: vec![id.clone()],
                    });
                }
            }
            sections
        })
    }
}

/// Run everything scheduled so far, then emit once if any task asked for it
fn flush_shared(shared: &Rc<RefCell<Inner>>) -> Result<usize, CommandError> {
    let (ran, store) = {
        let mut inner = shared.try_borrow_mut().map_err(|_| CommandError::Busy)?;
        let batch = inner.scheduler.drain();
        if batch.is_empty() {
            return Ok(0);
        }
        let ran = batch.run(&mut *inner);
        let store = std::mem::take(&mut inner.emit_requested).then(|| inner.store.clone());
        (ran, store)
    };

    log::trace!("flushed {} scheduled task(s)", ran);
    if let Some(store) = store {
        store.emit();
    }
    Ok(ran)
}

/// The mounted command menu (provider)
pub struct CommandMenu {
    shared: Rc<RefCell<Inner>>,
    store: Store,
}

impl CommandMenu {
    /// Create a menu scored by [`CommandScore`]
    pub fn new(options: MenuOptions) -> Self {
        Self::with_filter(options, CommandScore)
    }

    pub fn with_filter(options: MenuOptions, filter: impl Filter + 'static) -> Self {
        let store = Store::default();
        log::debug!("mounting command menu {:?}", options.label);
        let inner = Inner {
            registry: Registry::new(),
            scheduler: Scheduler::new(),
            options,
            filter: Box::new(filter),
            store: store.clone(),
            emit_requested: false,
        };
        Self {
            shared: Rc::new(RefCell::new(inner)),
            store,
        }
    }

    pub fn context(&self) -> CommandContext {
        CommandContext {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn store(&self) -> Store {
        self.store.clone()
    }

    /// End of tick: run the scheduled batch. Returns how many tasks ran.
    pub fn flush(&self) -> usize {
        flush_shared(&self.shared).unwrap_or_else(|err| {
            log::warn!("skipping flush: {}", err);
            0
        })
    }

    pub fn has_pending(&self) -> bool {
        self.shared
            .try_borrow()
            .map(|inner| !inner.scheduler.is_empty())
            .unwrap_or(true)
    }
}

impl Default for CommandMenu {
    fn default() -> Self {
        Self::new(MenuOptions::default())
    }
}

impl fmt::Debug for CommandMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandMenu")
            .field("store", &self.store)
            .field("pending", &self.has_pending())
            .finish()
    }
}

/// Handle used by item, group and input code to talk to a [`CommandMenu`]
#[derive(Clone, Debug)]
pub struct CommandContext {
    shared: Weak<RefCell<Inner>>,
}

impl CommandContext {
    fn upgrade(&self) -> Result<Rc<RefCell<Inner>>, CommandError> {
        self.shared.upgrade().ok_or(CommandError::OutsideProvider)
    }

    /// Mutate the menu, emitting afterwards if the mutation asked for it
    fn mutate<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Result<R, CommandError> {
        let shared = self.upgrade()?;
        let (result, store) = {
            let mut inner = shared.try_borrow_mut().map_err(|_| CommandError::Busy)?;
            let result = f(&mut *inner);
            let store = std::mem::take(&mut inner.emit_requested).then(|| inner.store.clone());
            (result, store)
        };
        if let Some(store) = store {
            store.emit();
        }
        Ok(result)
    }

    fn read<R>(&self, f: impl FnOnce(&Inner) -> R) -> Result<R, CommandError> {
        let shared = self.upgrade()?;
        let inner = shared.try_borrow().map_err(|_| CommandError::Busy)?;
        Ok(f(&*inner))
    }

    /// Set the searchable text of an item.
    ///
    /// Unchanged values are ignored. Otherwise the item is re-scored right away and a
    /// re-sort is scheduled.
    pub fn value(&self, id: &str, value: &str, keywords: &[String]) -> Result<(), CommandError> {
        self.mutate(|inner| {
            if !inner.registry.set_item_value(id, value, keywords) {
                return;
            }
            if inner.is_filtering() && inner.registry.contains_item(id) {
                let score = inner.score(id, &inner.search());
                inner.store.update(|state| {
                    state.filtered.items.insert(id.to_string(), score);
                });
            }
            inner.scheduler.schedule(Priority::Sort, Inner::resort);
        })
    }

    /// Mount an item, optionally inside `group`
    pub fn item(&self, id: &str, group: Option<&str>) -> Result<Registration, CommandError> {
        self.mutate(|inner| {
            inner.registry.register_item(id, group);
            log::debug!("registered item {} (group {:?})", id, group);
            inner
                .scheduler
                .schedule(Priority::ItemMounted, Inner::item_mounted);
        })?;
        Ok(Registration::new(&self.shared, RegistrationKind::Item, id))
    }

    /// Mount a group. Does not re-filter; membership follows item registration.
    pub fn group(&self, id: &str) -> Result<Registration, CommandError> {
        self.mutate(|inner| inner.registry.register_group(id))?;
        Ok(Registration::new(&self.shared, RegistrationKind::Group, id))
    }

    pub fn set_disabled(&self, id: &str, disabled: bool) -> Result<(), CommandError> {
        self.mutate(|inner| {
            if inner.registry.is_disabled(id) != disabled {
                inner.registry.set_disabled(id, disabled);
                inner.scheduler.schedule(Priority::Sort, Inner::resort);
            }
        })
    }

    pub fn set_force_mount(&self, id: &str, force_mount: bool) -> Result<(), CommandError> {
        self.mutate(|inner| {
            if inner.registry.is_force_mounted(id) != force_mount {
                inner.registry.set_force_mount(id, force_mount);
                inner.scheduler.schedule(Priority::Sort, Inner::resort);
            }
        })
    }

    /// Mount a batch of items, e.g. everything a provider returned
    pub fn mount_items<A>(&self, items: &[CommandItem<A>]) -> Result<Vec<Registration>, CommandError> {
        items
            .iter()
            .map(|item| {
                self.value(&item.id, &item.value, &item.keywords)?;
                if item.disabled {
                    self.set_disabled(&item.id, true)?;
                }
                self.item(&item.id, item.group.as_deref())
            })
            .collect()
    }

    /// Whether items are scored and hidden automatically
    pub fn filter(&self) -> Result<bool, CommandError> {
        self.read(|inner| inner.options.should_filter)
    }

    pub fn disable_pointer_selection(&self) -> Result<bool, CommandError> {
        self.read(|inner| inner.options.disable_pointer_selection)
    }

    pub fn options(&self) -> Result<MenuOptions, CommandError> {
        self.read(|inner| inner.options.clone())
    }

    /// Change the search, re-filter and re-sort now; the first item is highlighted
    /// on the next flush.
    pub fn set_search(&self, search: &str) -> Result<(), CommandError> {
        self.mutate(|inner| {
            if inner.store.read(|state| state.search == search) {
                return;
            }
            log::debug!("search changed to {:?}", search);
            inner.store.set_state(Field::Search(search.to_string()));
            inner.filter_items();
            inner.sort();
            inner
                .scheduler
                .schedule(Priority::SelectFirst, Inner::select_first);
            inner.request_emit();
        })
    }

    /// Highlight `id`. Returns false if it is not visible or disabled.
    pub fn select(&self, id: &str) -> Result<bool, CommandError> {
        self.mutate(|inner| {
            if !inner.selectable().iter().any(|selectable| selectable == id) {
                return false;
            }
            inner.set_selected(Some(id.to_string()));
            true
        })
    }

    /// Pointer moved over `id`
    pub fn hover(&self, id: &str) -> Result<bool, CommandError> {
        if self.disable_pointer_selection()? {
            return Ok(false);
        }
        self.select(id)
    }

    pub fn select_next(&self) -> Result<(), CommandError> {
        self.mutate(|inner| inner.move_by(1))
    }

    pub fn select_prev(&self) -> Result<(), CommandError> {
        self.mutate(|inner| inner.move_by(-1))
    }

    pub fn select_first(&self) -> Result<(), CommandError> {
        self.mutate(|inner| inner.move_to_edge(false))
    }

    pub fn select_last(&self) -> Result<(), CommandError> {
        self.mutate(|inner| inner.move_to_edge(true))
    }

    pub fn select_next_group(&self) -> Result<(), CommandError> {
        self.mutate(|inner| inner.move_by_group(1))
    }

    pub fn select_prev_group(&self) -> Result<(), CommandError> {
        self.mutate(|inner| inner.move_by_group(-1))
    }

    /// The highlighted item, if it can be activated
    pub fn activate(&self) -> Result<Option<String>, CommandError> {
        self.read(|inner| {
            inner
                .selected()
                .filter(|selected| inner.selectable().contains(selected))
        })
    }

    pub fn handle_key(&self, key: MenuKey) -> Result<KeyOutcome, CommandError> {
        let vim_bindings = self.read(|inner| inner.options.vim_bindings)?;

        match key {
            MenuKey::Down => self.select_next()?,
            MenuKey::Up => self.select_prev()?,
            MenuKey::Home | MenuKey::MetaUp => self.select_first()?,
            MenuKey::End | MenuKey::MetaDown => self.select_last()?,
            MenuKey::AltDown => self.select_next_group()?,
            MenuKey::AltUp => self.select_prev_group()?,
            MenuKey::Ctrl('n' | 'j') if vim_bindings => self.select_next()?,
            MenuKey::Ctrl('p' | 'k') if vim_bindings => self.select_prev()?,
            MenuKey::Enter => {
                return Ok(match self.activate()? {
                    Some(id) => KeyOutcome::Activated(id),
                    None => KeyOutcome::Ignored,
                });
            }
            MenuKey::Ctrl(_) => return Ok(KeyOutcome::Ignored),
        }
        Ok(KeyOutcome::Handled)
    }

    pub fn snapshot(&self) -> Result<State, CommandError> {
        self.read(|inner| inner.store.snapshot())
    }

    pub fn store(&self) -> Result<Store, CommandError> {
        self.read(|inner| inner.store.clone())
    }

    pub fn selected(&self) -> Result<Option<String>, CommandError> {
        self.read(|inner| inner.selected())
    }

    /// Searchable text of the highlighted item
    pub fn selected_value(&self) -> Result<Option<String>, CommandError> {
        self.read(|inner| {
            inner
                .selected()
                .and_then(|id| inner.registry.value(&id).map(str::to_string))
        })
    }

    pub fn item_value(&self, id: &str) -> Result<Option<String>, CommandError> {
        self.read(|inner| inner.registry.value(id).map(str::to_string))
    }

    pub fn is_disabled(&self, id: &str) -> Result<bool, CommandError> {
        self.read(|inner| inner.registry.is_disabled(id))
    }

    /// Visible items grouped the way they are rendered
    pub fn sections(&self) -> Result<Vec<Section>, CommandError> {
        self.read(|inner| inner.sections())
    }

    pub fn flush(&self) -> Result<usize, CommandError> {
        flush_shared(&self.upgrade()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistrationKind {
    Item,
    Group,
}

/// Returned by [`CommandContext::item`] and [`CommandContext::group`]
#[derive(Debug)]
#[must_use = "keep the Registration to unregister the item later"]
pub struct Registration {
    shared: Weak<RefCell<Inner>>,
    kind: RegistrationKind,
    id: String,
    active: Cell<bool>,
}

impl Registration {
    fn new(shared: &Weak<RefCell<Inner>>, kind: RegistrationKind, id: &str) -> Self {
        Self {
            shared: shared.clone(),
            kind,
            id: id.to_string(),
            active: Cell::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Unmount. Calling this again, or after the menu is gone, does nothing.
    pub fn unregister(&self) {
        if !self.active.get() {
            return;
        }
        let Some(shared) = self.shared.upgrade() else {
            self.active.set(false);
            return;
        };
        let Ok(mut inner) = shared.try_borrow_mut() else {
            log::warn!("cannot unregister {} while the menu is busy", self.id);
            return;
        };

        match self.kind {
            RegistrationKind::Item => inner.unregister_item(&self.id),
            RegistrationKind::Group => inner.unregister_group(&self.id),
        }
        self.active.set(false);
    }
}
