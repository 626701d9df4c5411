use log::{info, warn};

use crate::inventory::{Inventory, InventoryItem, ItemKind};
use crate::player::PlayerStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub price: i64,
    pub kind: ItemKind,
    pub icon: char,
    pub description: &'static str,
    pub stats: &'static [(&'static str, &'static str)],
}

pub const CATALOG: [ShopItem; 3] = [
    ShopItem {
        id: "ship_hull_1",
        name: "Reinforced Hull Mk I",
        price: 500,
        kind: ItemKind::Armor,
        icon: 'H',
        description: "Raises the ship's protection",
        stats: &[("Defense", "+20%"), ("Speed", "-5%")],
    },
    ShopItem {
        id: "weapon_laser_1",
        name: "Laser Cannon Mk I",
        price: 750,
        kind: ItemKind::Weapon,
        icon: 'L',
        description: "A powerful weapon for clearing hostiles",
        stats: &[("Damage", "+25%"), ("Energy", "-10%")],
    },
    ShopItem {
        id: "engine_boost_1",
        name: "Engine Booster",
        price: 400,
        kind: ItemKind::Engine,
        icon: 'E',
        description: "Increases the ship's speed",
        stats: &[("Speed", "+15%"), ("Energy", "+5%")],
    },
];

pub fn find_item(id: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.id == id)
}

impl ShopItem {
    pub fn to_inventory_item(&self) -> InventoryItem {
        InventoryItem {
            id: self.id.to_string(),
            name: self.name.to_string(),
            kind: self.kind,
            icon: self.icon,
            description: self.description.to_string(),
            stats: self.stats.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Purchase {
    Bought { item: &'static ShopItem },
    InsufficientCredits { item: &'static ShopItem, available: i64 },
    InventoryFull { item: &'static ShopItem },
    UnknownItem,
}

/// Buys `item_id` for the player. Credits are charged only when the item
/// actually lands in the inventory.
pub fn buy_item(item_id: &str, stats: &mut PlayerStats, inventory: &mut Inventory) -> Purchase {
    let Some(item) = find_item(item_id) else {
        warn!("Attempted to buy unknown item '{}'", item_id);
        return Purchase::UnknownItem;
    };

    if stats.credits < item.price {
        info!("Cannot afford {}: need {}, have {}", item.id, item.price, stats.credits);
        return Purchase::InsufficientCredits { item, available: stats.credits };
    }
    if inventory.add(item.to_inventory_item()).is_err() {
        return Purchase::InventoryFull { item };
    }
    stats.credits -= item.price;
    info!("Bought {} for {} credits, {} left", item.id, item.price, stats.credits);
    Purchase::Bought { item }
}
