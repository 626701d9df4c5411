use crate::constants::INVENTORY_SLOTS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Weapon,
    Armor,
    Engine,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Weapon => "Weapon",
            ItemKind::Armor => "Armor",
            ItemKind::Engine => "Engine",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub icon: char,
    pub description: String,
    pub stats: Vec<(&'static str, &'static str)>,
}

/// Fixed-capacity list of owned items; slots are filled front to back.
#[derive(Debug)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory::with_capacity(INVENTORY_SLOTS)
    }
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Inventory { items: Vec::with_capacity(capacity), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Stores the item; hands it back when every slot is taken.
    pub fn add(&mut self, item: InventoryItem) -> Result<usize, InventoryItem> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    pub fn remove(&mut self, slot: usize) -> Option<InventoryItem> {
        (slot < self.items.len()).then(|| self.items.remove(slot))
    }

    pub fn get(&self, slot: usize) -> Option<&InventoryItem> {
        self.items.get(slot)
    }

    pub fn item_ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: id.to_string(),
            kind: ItemKind::Engine,
            icon: 'E',
            description: String::new(),
            stats: Vec::new(),
        }
    }

    #[test]
    fn refuses_items_past_capacity() {
        let mut inventory = Inventory::with_capacity(2);
        assert_eq!(inventory.add(item("a")), Ok(0));
        assert_eq!(inventory.add(item("b")), Ok(1));
        let rejected = inventory.add(item("c")).unwrap_err();
        assert_eq!(rejected.id, "c");
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn remove_shifts_later_slots_forward() {
        let mut inventory = Inventory::default();
        inventory.add(item("a")).unwrap();
        inventory.add(item("b")).unwrap();
        assert_eq!(inventory.remove(0).map(|i| i.id), Some("a".to_string()));
        assert_eq!(inventory.get(0).map(|i| i.id.as_str()), Some("b"));
        assert!(inventory.remove(5).is_none());
    }

    #[test]
    fn default_has_thirty_slots() {
        assert_eq!(Inventory::default().capacity(), 30);
    }
}
