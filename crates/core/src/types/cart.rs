//! Client-side shopping cart.
//!
//! The cart is an ordered list of line items, at most one per plant id.
//! Adding an existing plant bumps its quantity; removing drops the whole
//! line. Nothing here can fail.

use serde::{Deserialize, Serialize};

use super::id::PlantId;
use super::price::Price;

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: PlantId,
    pub name: String,
    /// Unit price captured when the plant was first added.
    pub price: Price,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
}

impl CartLineItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Shopping cart for one browser session.
///
/// Line items keep insertion order; updating a quantity never reorders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of a plant and return the line's new quantity.
    ///
    /// If the plant is already in the cart its quantity is incremented and the
    /// stored name and price are left untouched (the first add wins).
    /// Otherwise a new line with quantity 1 is appended.
    pub fn add_item(&mut self, id: PlantId, name: impl Into<String>, price: Price) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLineItem {
            id,
            name: name.into(),
            price,
            quantity: 1,
        });
        1
    }

    /// Remove the line for a plant. Returns the removed line, if any.
    pub fn remove_item(&mut self, id: PlantId) -> Option<CartLineItem> {
        let index = self.lines.iter().position(|line| line.id == id)?;
        Some(self.lines.remove(index))
    }

    /// Sum of price × quantity over every line.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Look up the line for a plant.
    #[must_use]
    pub fn get(&self, id: PlantId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mango() -> (PlantId, &'static str, Price) {
        (PlantId::new(1), "Mango", Price::from_units(500))
    }

    #[test]
    fn test_repeat_adds_increment_quantity_and_keep_first_fields() {
        let mut cart = Cart::new();
        let (id, name, price) = mango();

        cart.add_item(id, name, price);
        cart.add_item(id, "Renamed Mango", Price::from_units(9999));
        let quantity = cart.add_item(id, "Another Name", Price::ZERO);
        let line = cart.get(id).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(quantity, 3);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.name, "Mango");
        assert_eq!(line.price, Price::from_units(500));
    }

    #[test]
    fn test_mango_and_neem_scenario() {
        let mut cart = Cart::new();
        let (id, name, price) = mango();
        cart.add_item(id, name, price);
        cart.add_item(id, name, price);
        cart.add_item(PlantId::new(2), "Neem", Price::from_units(300));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), Price::from_units(1300));
        assert_eq!(cart.total().to_string(), "৳1,300");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_insertion_order_is_preserved_on_update() {
        let mut cart = Cart::new();
        cart.add_item(PlantId::new(5), "Banyan", Price::from_units(800));
        cart.add_item(PlantId::new(2), "Neem", Price::from_units(300));
        cart.add_item(PlantId::new(5), "Banyan", Price::from_units(800));

        let ids: Vec<i32> = cart.lines().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[test]
    fn test_remove_deletes_whole_line() {
        let mut cart = Cart::new();
        let (id, name, price) = mango();
        cart.add_item(id, name, price);
        cart.add_item(id, name, price);

        let removed = cart.remove_item(id).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::new();
        let (id, name, price) = mango();
        cart.add_item(id, name, price);
        let before = cart.clone();

        assert!(cart.remove_item(PlantId::new(99)).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_total_matches_sum_of_lines() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);

        cart.add_item(PlantId::new(1), "A", Price::parse("120.5").unwrap());
        cart.add_item(PlantId::new(2), "B", Price::from_units(75));
        cart.add_item(PlantId::new(1), "A", Price::parse("120.5").unwrap());

        let expected: Price = cart
            .lines()
            .iter()
            .map(|l| l.price.times(l.quantity))
            .sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), Price::parse("316").unwrap());

        cart.remove_item(PlantId::new(1));
        cart.remove_item(PlantId::new(2));
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_cart_survives_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add_item(PlantId::new(1), "Mango", Price::from_units(500));
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
