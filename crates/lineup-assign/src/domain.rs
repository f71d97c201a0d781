//! Containers, assembly lines, items and their dense indices.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

macro_rules! define_index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            pub fn new(value: usize) -> Self {
                Self(value)
            }

            /// Position in dense per-solve storage.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_index_type!(
    /// Position of a container in the input slice.
    ContainerIndex
);
define_index_type!(
    /// Position of a line in the input slice.
    LineIndex
);
define_index_type!(
    /// Position of an item in the [`ItemUniverse`].
    ItemIndex
);

/// Opaque item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Item(String);

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Item {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Item {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A unit of work that needs a set of items present on its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    items: BTreeSet<Item>,
}

impl Container {
    pub fn new<I>(id: impl Into<String>, items: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<Item>,
    {
        Self {
            id: id.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Required items in sorted order.
    pub fn items(&self) -> &BTreeSet<Item> {
        &self.items
    }

    pub fn requires(&self, item: &Item) -> bool {
        self.items.contains(item)
    }
}

/// A line that can host at most `capacity` distinct items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyLine {
    id: String,
    capacity: i64,
}

impl AssemblyLine {
    pub fn new(id: impl Into<String>, capacity: i64) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }
}

/// Every item required by at least one container, with a stable index.
///
/// Items are numbered in first-seen order: containers in input order, and
/// the items of one container in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUniverse {
    items: Vec<Item>,
    positions: HashMap<Item, ItemIndex>,
}

impl ItemUniverse {
    pub fn from_containers(containers: &[Container]) -> Self {
        let mut universe = Self::default();
        for container in containers {
            for item in container.items() {
                if !universe.positions.contains_key(item) {
                    let index = ItemIndex::new(universe.items.len());
                    universe.positions.insert(item.clone(), index);
                    universe.items.push(item.clone());
                }
            }
        }
        universe
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: ItemIndex) -> Option<&Item> {
        self.items.get(index.index())
    }

    pub fn index_of(&self, item: &Item) -> Option<ItemIndex> {
        self.positions.get(item).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemIndex, &Item)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (ItemIndex::new(index), item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_items_are_deduplicated_and_sorted() {
        let container = Container::new("C1", ["b", "a", "b"]);
        let items: Vec<&str> = container.items().iter().map(Item::as_str).collect();
        assert_eq!(items, vec!["a", "b"]);
        assert!(container.requires(&Item::new("a")));
        assert!(!container.requires(&Item::new("z")));
    }

    #[test]
    fn universe_uses_first_seen_order() {
        let containers = vec![
            Container::new("C1", ["3", "1"]),
            Container::new("C2", ["2", "1", "4"]),
        ];
        let universe = ItemUniverse::from_containers(&containers);
        let order: Vec<&str> = universe.iter().map(|(_, item)| item.as_str()).collect();
        assert_eq!(order, vec!["1", "3", "2", "4"]);
        assert_eq!(universe.index_of(&Item::new("2")), Some(ItemIndex::new(2)));
        assert_eq!(universe.get(ItemIndex::new(1)), Some(&Item::new("3")));
        assert_eq!(universe.get(ItemIndex::new(9)), None);
    }

    #[test]
    fn empty_universe() {
        let universe = ItemUniverse::from_containers(&[]);
        assert!(universe.is_empty());
        assert_eq!(universe.len(), 0);
    }

    #[test]
    fn item_serializes_as_plain_string() {
        let json = serde_json::to_string(&Item::new("SKU-1")).unwrap();
        assert_eq!(json, "\"SKU-1\"");
    }
}
