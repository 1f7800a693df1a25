//! Item catalog - the static table of sortable waste items
//!
//! Each definition names the bin it belongs in, its base reward, and its
//! rarity tier. The catalog is validated once on construction and indexed
//! by tier so spawns are a table lookup.

use crate::error::CatalogError;
use crate::types::{Category, Rarity};

/// Immutable description of a sortable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ItemDefinition {
    pub id: u16,
    pub name: &'static str,
    pub icon: &'static str,
    pub category: Category,
    pub base_points: u32,
    pub rarity: Rarity,
    pub description: &'static str,
}

const fn item(
    id: u16,
    name: &'static str,
    icon: &'static str,
    category: Category,
    base_points: u32,
    rarity: Rarity,
    description: &'static str,
) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        icon,
        category,
        base_points,
        rarity,
        description,
    }
}

use Category::{Hazardous as H, Organic as O, Recyclable as R};
use Rarity::{Common, Epic, Legendary, Rare, Uncommon};

/// The standard item table.
pub const STANDARD_ITEMS: &[ItemDefinition] = &[
    // Common
    item(1, "Apple Core", "🍎", O, 10, Common, "Biodegradable fruit waste"),
    item(2, "Plastic Bottle", "🍼", R, 15, Common, "PET plastic container"),
    item(3, "Banana Peel", "🍌", O, 10, Common, "Natural compostable waste"),
    item(4, "Soda Can", "🥤", R, 20, Common, "Aluminum beverage container"),
    item(5, "Coffee Grounds", "☕", O, 10, Common, "Compostable coffee waste"),
    item(6, "Glass Jar", "🏺", R, 25, Common, "Reusable glass container"),
    item(7, "Paper Bag", "🛍️", R, 12, Common, "Recyclable paper packaging"),
    item(8, "Orange Peel", "🍊", O, 10, Common, "Citrus compostable waste"),
    item(26, "Potato Peels", "🥔", O, 10, Common, "Vegetable kitchen scraps"),
    item(27, "Milk Carton", "🥛", R, 15, Common, "Paper-based container"),
    item(28, "Bread Crusts", "🍞", O, 10, Common, "Food waste for composting"),
    item(29, "Tin Can", "🥫", R, 20, Common, "Metal food container"),
    item(30, "Lettuce Leaves", "🥬", O, 10, Common, "Leafy green vegetable waste"),
    item(31, "Water Bottle", "💧", R, 15, Common, "Plastic beverage container"),
    item(32, "Tomato Skin", "🍅", O, 10, Common, "Fruit/vegetable compost material"),
    item(33, "Magazine", "📖", R, 12, Common, "Printed paper material"),
    // Uncommon
    item(9, "Pizza Box", "📦", R, 18, Uncommon, "Cardboard food container"),
    item(10, "Egg Shells", "🥚", O, 15, Uncommon, "Calcium-rich compost material"),
    item(11, "Wine Bottle", "🍾", R, 30, Uncommon, "Dark glass container"),
    item(12, "Tea Leaves", "🍃", O, 12, Uncommon, "Organic plant matter"),
    item(13, "Cereal Box", "📮", R, 22, Uncommon, "Cardboard packaging"),
    item(14, "Vegetable Scraps", "🥕", O, 15, Uncommon, "Kitchen compost material"),
    item(34, "Yogurt Container", "🧈", R, 18, Uncommon, "Plastic dairy container"),
    item(35, "Fish Bones", "🐟", O, 15, Uncommon, "Animal protein waste"),
    item(36, "Shampoo Bottle", "🧴", R, 22, Uncommon, "Personal care container"),
    item(37, "Flower Petals", "🌸", O, 12, Uncommon, "Garden organic matter"),
    item(38, "Aluminum Foil", "📄", R, 25, Uncommon, "Metal food wrap"),
    // Rare
    item(15, "Battery", "🔋", H, 50, Rare, "Toxic electronic waste"),
    item(16, "Smartphone", "📱", H, 100, Rare, "E-waste requiring special handling"),
    item(17, "Paint Can", "🎨", H, 75, Rare, "Chemical waste container"),
    item(18, "Light Bulb", "💡", H, 60, Rare, "Special disposal required"),
    item(19, "Motor Oil", "🛢️", H, 80, Rare, "Automotive hazardous waste"),
    item(39, "Cleaning Spray", "🧽", H, 60, Rare, "Chemical cleaning product"),
    item(40, "Laptop", "💻", H, 120, Rare, "Electronic waste with battery"),
    item(41, "Nail Polish", "💅", H, 45, Rare, "Cosmetic chemical waste"),
    item(42, "Thermometer", "🌡️", H, 70, Rare, "Mercury-containing device"),
    // Epic
    item(20, "Computer Monitor", "🖥️", H, 150, Epic, "Large electronic waste"),
    item(21, "Car Tire", "⚙️", H, 120, Epic, "Rubber automotive waste"),
    item(22, "Aerosol Can", "💨", H, 100, Epic, "Pressurized chemical container"),
    item(43, "Car Battery", "🔋", H, 180, Epic, "Large automotive battery"),
    item(44, "Printer", "🖨️", H, 140, Epic, "Electronic office equipment"),
    // Legendary
    item(23, "Nuclear Waste", "☢️", H, 500, Legendary, "Extremely dangerous radioactive material"),
    item(24, "Medical Waste", "🏥", H, 300, Legendary, "Biohazardous medical materials"),
    item(25, "Industrial Chemical", "⚗️", H, 400, Legendary, "Dangerous industrial compound"),
];

/// Validated item table, indexed by rarity tier.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ItemDefinition>,
    /// Per-tier indices into `items`, addressed by `Rarity::index`.
    tiers: [Vec<usize>; 5],
}

impl Catalog {
    /// Build a catalog, rejecting tables that leave a tier empty.
    pub fn new(items: &[ItemDefinition]) -> Result<Self, CatalogError> {
        let mut tiers: [Vec<usize>; 5] = Default::default();
        let mut seen = std::collections::HashSet::with_capacity(items.len());

        for (i, def) in items.iter().enumerate() {
            if def.base_points == 0 {
                return Err(CatalogError::ZeroPoints { name: def.name });
            }
            if !seen.insert(def.id) {
                return Err(CatalogError::DuplicateId(def.id));
            }
            tiers[def.rarity.index()].push(i);
        }

        if let Some(empty) = Rarity::ALL.into_iter().find(|r| tiers[r.index()].is_empty()) {
            return Err(CatalogError::EmptyTier(empty));
        }

        Ok(Self {
            items: items.to_vec(),
            tiers,
        })
    }

    /// The built-in table.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(STANDARD_ITEMS)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    pub fn get(&self, id: u16) -> Option<&ItemDefinition> {
        self.items.iter().find(|d| d.id == id)
    }

    /// Definitions in one tier. Never empty for a constructed catalog.
    pub fn tier(&self, rarity: Rarity) -> impl Iterator<Item = &ItemDefinition> + '_ {
        self.tiers[rarity.index()].iter().map(|&i| &self.items[i])
    }

    pub fn tier_len(&self, rarity: Rarity) -> usize {
        self.tiers[rarity.index()].len()
    }

    /// The `n`th definition of a tier, if any.
    pub fn tier_nth(&self, rarity: Rarity, n: usize) -> Option<&ItemDefinition> {
        self.tiers[rarity.index()].get(n).map(|&i| &self.items[i])
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ItemDefinition> + '_ {
        self.items.iter().filter(move |d| d.category == category)
    }
}
