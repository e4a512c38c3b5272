//! View models for the storefront page.
//!
//! Every function here is a pure mapping from catalog records or cart state
//! to a display structure. Nothing is escaped at this layer: the askama
//! templates in [`templates`] auto-escape every field, including attribute
//! values such as the add-to-cart payload.
//!
//! Display defaults (placeholder images, the "Tree" label, the fallback
//! price) are applied here and never written back into the records.

pub mod templates;

use sapling_core::{Cart, CategoryFilter, CategoryRecord, PlantRecord, Price, format_money};

/// Grid card image used when a plant has no image or it fails to load.
pub const GRID_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=Tree";

/// Modal image used when a plant has no image or it fails to load.
pub const MODAL_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x500?text=Tree";

/// Grid card description for plants without one.
pub const GRID_DEFAULT_DESCRIPTION: &str = "Beautiful tree for your garden";

/// Modal description for plants without one.
pub const MODAL_DEFAULT_DESCRIPTION: &str = "A beautiful tree perfect for your garden.";

/// Modal heading for plants without a name.
pub const MODAL_DEFAULT_TITLE: &str = "Tree Details";

/// Grid message when a load succeeded with no plants.
pub const NO_TREES_MESSAGE: &str = "No trees found.";

/// Grid message when loading every plant failed.
pub const ALL_PLANTS_FAILED_MESSAGE: &str = "Couldn't load trees.";

/// Grid message when loading one category failed.
pub const CATEGORY_FAILED_MESSAGE: &str = "Couldn't load this category.";

/// Cart panel message when nothing has been added.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// Label of the pseudo-category that shows every plant.
pub const ALL_CATEGORY_LABEL: &str = "All Trees";

/// Grid fragment URL for every plant. A single category lives below it.
pub const CATEGORIES_PATH: &str = "/categories";

/// Grid descriptions longer than this many characters are cut short.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

// =============================================================================
// Categories
// =============================================================================

/// One button in the category navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryButtonView {
    /// Filter key (`all` or the category id).
    pub key: String,
    pub label: String,
    /// Fragment URL that loads the grid for this filter.
    pub path: String,
    pub active: bool,
}

impl CategoryButtonView {
    fn new(filter: &CategoryFilter, label: impl Into<String>, active: &CategoryFilter) -> Self {
        let path = match filter {
            CategoryFilter::All => CATEGORIES_PATH.to_string(),
            CategoryFilter::Category(id) => {
                format!("{CATEGORIES_PATH}/{}", urlencoding::encode(&id.to_string()))
            }
        };
        Self {
            key: filter.key(),
            path,
            label: label.into(),
            active: filter == active,
        }
    }
}

/// Build the category navigation.
///
/// The "All" entry is always first and does not depend on the fetched list;
/// the fetched categories follow in their original order.
#[must_use]
pub fn render_categories(
    categories: &[CategoryRecord],
    active: &CategoryFilter,
) -> Vec<CategoryButtonView> {
    std::iter::once(CategoryButtonView::new(
        &CategoryFilter::All,
        ALL_CATEGORY_LABEL,
        active,
    ))
    .chain(categories.iter().map(|category| {
        CategoryButtonView::new(
            &CategoryFilter::Category(category.id.clone()),
            category.category_name.clone(),
            active,
        )
    }))
    .collect()
}

// =============================================================================
// Product grid
// =============================================================================

/// One plant card in the product grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub placeholder_image: &'static str,
    /// Formatted price, e.g. `৳1,300`.
    pub price: String,
    /// Plain amount carried by the add-to-cart control, e.g. `1300`.
    pub cart_price: String,
}

impl From<&PlantRecord> for PlantCardView {
    fn from(plant: &PlantRecord) -> Self {
        let price = plant.effective_price();
        Self {
            id: plant.id.to_string(),
            name: plant.display_name().to_string(),
            description: truncate(
                plant
                    .description
                    .as_deref()
                    .unwrap_or(GRID_DEFAULT_DESCRIPTION),
                DESCRIPTION_PREVIEW_CHARS,
            ),
            category: plant.category_label().to_string(),
            image: plant
                .image
                .clone()
                .unwrap_or_else(|| GRID_PLACEHOLDER_IMAGE.to_string()),
            placeholder_image: GRID_PLACEHOLDER_IMAGE,
            price: format_money(Some(price)),
            cart_price: payload_amount(price),
        }
    }
}

/// A message shown in place of the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridNotice {
    pub text: &'static str,
    /// Load failure rather than an empty result.
    pub is_error: bool,
}

/// The product grid: either cards or a single notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub cards: Vec<PlantCardView>,
    pub notice: Option<GridNotice>,
}

impl GridView {
    /// Grid that reports a failed load.
    #[must_use]
    pub const fn unavailable(message: &'static str) -> Self {
        Self {
            cards: Vec::new(),
            notice: Some(GridNotice {
                text: message,
                is_error: true,
            }),
        }
    }

    /// Whether the grid shows the "no trees" empty state.
    #[must_use]
    pub fn is_empty_state(&self) -> bool {
        matches!(self.notice, Some(GridNotice { is_error: false, .. }))
    }
}

/// Build the product grid, one card per plant in input order.
///
/// An empty list yields the "No trees found." notice and no cards.
#[must_use]
pub fn render_product_grid(plants: &[PlantRecord]) -> GridView {
    if plants.is_empty() {
        return GridView {
            cards: Vec::new(),
            notice: Some(GridNotice {
                text: NO_TREES_MESSAGE,
                is_error: false,
            }),
        };
    }

    GridView {
        cards: plants.iter().map(PlantCardView::from).collect(),
        notice: None,
    }
}

// =============================================================================
// Cart panel
// =============================================================================

/// One line in the cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    pub id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
}

/// The cart summary panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanelView {
    pub rows: Vec<CartRowView>,
    pub total: String,
    /// Sum of quantities, shown on the badge.
    pub item_count: u32,
    pub empty_message: &'static str,
}

impl CartPanelView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the cart panel, one row per line item in cart order.
#[must_use]
pub fn render_cart_panel(cart: &Cart) -> CartPanelView {
    CartPanelView {
        rows: cart
            .lines()
            .iter()
            .map(|line| CartRowView {
                id: line.id.to_string(),
                name: line.name.clone(),
                unit_price: format_money(Some(line.price)),
                quantity: line.quantity,
            })
            .collect(),
        total: format_money(Some(cart.total())),
        item_count: cart.item_count(),
        empty_message: EMPTY_CART_MESSAGE,
    }
}

// =============================================================================
// Detail modal
// =============================================================================

/// Contents of the plant detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub id: String,
    pub title: String,
    /// Name used for the image alt text and the cart line.
    pub name: String,
    pub image: String,
    pub placeholder_image: &'static str,
    pub category: String,
    pub price: String,
    pub cart_price: String,
    pub description: String,
}

/// Build the detail modal. `None` means the modal stays hidden.
#[must_use]
pub fn render_plant_detail_modal(plant: Option<&PlantRecord>) -> Option<ModalView> {
    let plant = plant?;
    let price = plant.effective_price();

    Some(ModalView {
        id: plant.id.to_string(),
        title: plant
            .name
            .clone()
            .unwrap_or_else(|| MODAL_DEFAULT_TITLE.to_string()),
        name: plant.display_name().to_string(),
        image: plant
            .image
            .clone()
            .unwrap_or_else(|| MODAL_PLACEHOLDER_IMAGE.to_string()),
        placeholder_image: MODAL_PLACEHOLDER_IMAGE,
        category: plant.category_label().to_string(),
        price: format_money(Some(price)),
        cart_price: payload_amount(price),
        description: plant
            .description
            .clone()
            .unwrap_or_else(|| MODAL_DEFAULT_DESCRIPTION.to_string()),
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Amount as it travels in form payloads: no glyph, no grouping.
fn payload_amount(price: Price) -> String {
    price.amount().normalize().to_string()
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let kept = text.get(..byte_index).unwrap_or(text).trim_end();
            format!("{kept}...")
        }
        None => text.to_string(),
    }
}
