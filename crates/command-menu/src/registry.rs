//! Item and group registry
//!
//! The registry is the only owner of item/group metadata. Everything else
//! mutates it through the command context.

use std::collections::{HashMap, HashSet};

/// Searchable metadata of a single item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMeta {
    pub value: String,
    pub keywords: Vec<String>,
    /// Visible, but never highlighted
    pub disabled: bool,
    /// Visible regardless of its score
    pub force_mount: bool,
}

#[derive(Debug, Default)]
pub struct Registry {
    /// Mounted item ids, in mount order
    mounted: Vec<String>,
    mounted_ids: HashSet<String>,
    meta: HashMap<String, ItemMeta>,
    /// Group ids, in mount order
    group_order: Vec<String>,
    groups: HashMap<String, Vec<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount an item, optionally as a member of `group`.
    ///
    /// Registering the same id under another group adds it to that group too.
    pub fn register_item(&mut self, id: &str, group: Option<&str>) {
        if self.mounted_ids.insert(id.to_string()) {
            self.mounted.push(id.to_string());
        }

        if let Some(group) = group {
            self.register_group(group);
            if let Some(members) = self.groups.get_mut(group)
                && !members.iter().any(|member| member == id)
            {
                members.push(id.to_string());
            }
        }
    }

    /// Mount a group. Existing membership is kept.
    pub fn register_group(&mut self, id: &str) {
        if !self.groups.contains_key(id) {
            self.groups.insert(id.to_string(), Vec::new());
            self.group_order.push(id.to_string());
        }
    }

    /// Store `value` and `keywords` for `id`. Returns false if the value is unchanged.
    pub fn set_item_value(&mut self, id: &str, value: &str, keywords: &[String]) -> bool {
        let meta = self.meta.entry(id.to_string()).or_default();
        if meta.value == value {
            return false;
        }
        meta.value = value.to_string();
        meta.keywords = keywords.to_vec();
        true
    }

    pub fn set_disabled(&mut self, id: &str, disabled: bool) {
        self.meta.entry(id.to_string()).or_default().disabled = disabled;
    }

    pub fn set_force_mount(&mut self, id: &str, force_mount: bool) {
        self.meta.entry(id.to_string()).or_default().force_mount = force_mount;
    }

    /// Unmount an item and drop it from every group. Returns false if it was not mounted.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if !self.mounted_ids.remove(id) {
            return false;
        }
        self.mounted.retain(|mounted| mounted != id);
        self.meta.remove(id);
        for members in self.groups.values_mut() {
            members.retain(|member| member != id);
        }
        true
    }

    /// Unmount a group. Its members stay mounted.
    pub fn remove_group(&mut self, id: &str) -> bool {
        if self.groups.remove(id).is_none() {
            return false;
        }
        self.group_order.retain(|group| group != id);
        true
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.mounted_ids.contains(id)
    }

    pub fn contains_group(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    pub fn meta(&self, id: &str) -> Option<&ItemMeta> {
        self.meta.get(id)
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.meta.get(id).map(|meta| meta.value.as_str())
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.meta.get(id).is_some_and(|meta| meta.disabled)
    }

    pub fn is_force_mounted(&self, id: &str) -> bool {
        self.meta.get(id).is_some_and(|meta| meta.force_mount)
    }

    /// Mounted items in mount order
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.mounted.iter().map(String::as_str)
    }

    pub fn item_count(&self) -> usize {
        self.mounted.len()
    }

    /// Groups in mount order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.group_order.iter().map(String::as_str)
    }

    pub fn members(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The group an item is rendered under: the first mounted group containing it
    pub fn primary_group(&self, id: &str) -> Option<&str> {
        self.groups()
            .find(|group| self.members(group).iter().any(|member| member == id))
    }

    /// [`Registry::primary_group`] of every grouped item, in one pass
    pub fn primary_groups(&self) -> HashMap<&str, &str> {
        let mut primary = HashMap::new();
        for group in self.groups() {
            for member in self.members(group) {
                primary.entry(member.as_str()).or_insert(group);
            }
        }
        primary
    }
}
