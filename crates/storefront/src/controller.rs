//! Interaction controller.
//!
//! Turns user actions into catalog calls and cart mutations, then reports
//! which page regions need to be re-rendered. The controller never renders
//! markup itself; it returns view models wrapped in [`Update`]s.
//!
//! # States
//!
//! ```text
//! Idle --SelectCategory--> Loading{seq} --load completes--> Idle (grid re-rendered)
//! Idle --OpenDetail / AddToCart / RemoveFromCart / CloseModal--> Idle
//! ```
//!
//! Every category load gets a monotonically increasing sequence number from
//! a [`LoadSequence`]. A completion whose number is not the latest one is
//! stale and is dropped, so a slow response can never overwrite the grid of a
//! newer selection. Controllers built for separate requests of one visitor
//! share that visitor's sequence.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sapling_core::{Cart, CategoryFilter, PlantId, PlantRecord, Price};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::catalog::{Catalog, CatalogError};
use crate::views::{
    ALL_PLANTS_FAILED_MESSAGE, CATEGORY_FAILED_MESSAGE, CartPanelView, CategoryButtonView,
    GridView, ModalView, render_cart_panel, render_categories, render_plant_detail_modal,
    render_product_grid,
};

/// Where an add-to-cart request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddSource {
    /// A card in the product grid.
    #[default]
    Grid,
    /// The detail modal; adding also closes it.
    Modal,
}

/// A plant as carried by an add-to-cart control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRequest {
    pub id: PlantId,
    pub name: String,
    pub price: Price,
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectCategory(CategoryFilter),
    OpenDetail(PlantId),
    AddToCart {
        item: CartRequest,
        source: AddSource,
    },
    RemoveFromCart(PlantId),
    CloseModal,
}

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A grid load is outstanding.
    Loading { seq: u64 },
}

/// A page region to re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Categories(Vec<CategoryButtonView>),
    Grid(GridView),
    Cart(CartPanelView),
    /// `None` hides the modal.
    Modal(Option<ModalView>),
}

/// Category load counter, shared by every controller acting for one visitor.
#[derive(Debug, Default)]
pub struct LoadSequence(AtomicU64);

impl LoadSequence {
    /// Claim the next sequence number; every earlier one becomes stale.
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst).wrapping_add(1)
    }

    /// Most recently claimed sequence number (0 before the first load).
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle for one outstanding grid load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    filter: CategoryFilter,
}

impl LoadTicket {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub const fn filter(&self) -> &CategoryFilter {
        &self.filter
    }
}

/// Interaction controller for one page session.
///
/// Owns the cart; borrows the catalog.
pub struct Controller<'a, C> {
    catalog: &'a C,
    cart: Cart,
    active: CategoryFilter,
    phase: Phase,
    loads: Arc<LoadSequence>,
}

impl<'a, C: Catalog> Controller<'a, C> {
    /// Create an idle controller around an existing cart, with a load
    /// sequence of its own.
    pub fn new(catalog: &'a C, cart: Cart) -> Self {
        Self {
            catalog,
            cart,
            active: CategoryFilter::All,
            phase: Phase::Idle,
            loads: Arc::default(),
        }
    }

    /// Number category loads from a shared sequence, so a load started by
    /// another controller supersedes this one's.
    #[must_use]
    pub fn with_load_sequence(mut self, loads: Arc<LoadSequence>) -> Self {
        self.loads = loads;
        self
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The selected category filter.
    #[must_use]
    pub const fn active(&self) -> &CategoryFilter {
        &self.active
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Give the cart back, e.g. to persist it.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    /// Initial page load: categories first, then every plant.
    ///
    /// Returns the category navigation, the grid and the cart panel, in that
    /// order.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Vec<Update> {
        let ticket = self.begin_category_load(CategoryFilter::All);

        let categories = self.catalog.fetch_categories().await;
        let mut updates = vec![Update::Categories(render_categories(
            &categories,
            &self.active,
        ))];

        let plants = self.load(&ticket).await;
        updates.extend(self.complete_category_load(&ticket, plants));
        updates.push(Update::Cart(render_cart_panel(&self.cart)));
        updates
    }

    /// Handle one action and return the regions to re-render.
    ///
    /// An empty result means nothing changed (a stale category load).
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, action: Action) -> Vec<Update> {
        match action {
            Action::SelectCategory(filter) => {
                let ticket = self.begin_category_load(filter);
                let plants = self.load(&ticket).await;
                self.complete_category_load(&ticket, plants)
                    .into_iter()
                    .collect()
            }
            Action::OpenDetail(id) => {
                let plant = self.catalog.fetch_plant_detail(id).await;
                if plant.is_none() {
                    debug!(plant_id = %id, "No plant detail, modal stays hidden");
                }
                vec![Update::Modal(render_plant_detail_modal(plant.as_ref()))]
            }
            Action::AddToCart { item, source } => {
                let quantity = self.cart.add_item(item.id, item.name, item.price);
                debug!(plant_id = %item.id, quantity, ?source, "Added to cart");

                let mut updates = vec![Update::Cart(render_cart_panel(&self.cart))];
                if source == AddSource::Modal {
                    updates.push(Update::Modal(None));
                }
                updates
            }
            Action::RemoveFromCart(id) => {
                if self.cart.remove_item(id).is_none() {
                    debug!(plant_id = %id, "Remove for plant not in cart");
                }
                vec![Update::Cart(render_cart_panel(&self.cart))]
            }
            Action::CloseModal => vec![Update::Modal(None)],
        }
    }

    /// Select a filter and enter `Loading` with a fresh sequence number.
    ///
    /// Any load started earlier on the same sequence becomes stale.
    pub fn begin_category_load(&mut self, filter: CategoryFilter) -> LoadTicket {
        let seq = self.loads.next();
        self.active = filter.clone();
        self.phase = Phase::Loading { seq };
        LoadTicket { seq, filter }
    }

    /// Fetch the plants a ticket asks for.
    pub async fn load(&self, ticket: &LoadTicket) -> Result<Vec<PlantRecord>, CatalogError> {
        match &ticket.filter {
            CategoryFilter::All => self.catalog.fetch_all_plants().await,
            CategoryFilter::Category(id) => self.catalog.fetch_plants_by_category(id).await,
        }
    }

    /// Finish a load started with [`Self::begin_category_load`].
    ///
    /// Returns the grid update and goes back to `Idle`, or returns `None`
    /// and leaves the state untouched when a newer load has started since,
    /// here or on a controller sharing the sequence.
    pub fn complete_category_load(
        &mut self,
        ticket: &LoadTicket,
        plants: Result<Vec<PlantRecord>, CatalogError>,
    ) -> Option<Update> {
        let latest = self.loads.latest();
        if self.phase != (Phase::Loading { seq: ticket.seq }) || latest != ticket.seq {
            debug!(
                seq = ticket.seq,
                latest,
                phase = ?self.phase,
                "Discarding stale category load"
            );
            return None;
        }
        self.phase = Phase::Idle;

        let grid = match plants {
            Ok(plants) => render_product_grid(&plants),
            Err(_) => GridView::unavailable(match ticket.filter {
                CategoryFilter::All => ALL_PLANTS_FAILED_MESSAGE,
                CategoryFilter::Category(_) => CATEGORY_FAILED_MESSAGE,
            }),
        };
        Some(Update::Grid(grid))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use sapling_core::{CategoryId, CategoryRecord};

    use super::*;
    use crate::views::{NO_TREES_MESSAGE, render_cart_panel};

    /// In-memory catalog. Categories without an entry fail to load.
    #[derive(Default)]
    struct FakeCatalog {
        categories: Vec<CategoryRecord>,
        all: Option<Vec<PlantRecord>>,
        by_category: HashMap<CategoryId, Vec<PlantRecord>>,
        details: HashMap<PlantId, PlantRecord>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Catalog for FakeCatalog {
        async fn fetch_categories(&self) -> Vec<CategoryRecord> {
            self.record("categories");
            self.categories.clone()
        }

        async fn fetch_all_plants(&self) -> Result<Vec<PlantRecord>, CatalogError> {
            self.record("plants");
            self.all
                .clone()
                .ok_or(CatalogError::MissingField("plants"))
        }

        async fn fetch_plants_by_category(
            &self,
            category: &CategoryId,
        ) -> Result<Vec<PlantRecord>, CatalogError> {
            self.record(format!("category/{category}"));
            self.by_category
                .get(category)
                .cloned()
                .ok_or(CatalogError::MissingField("plants"))
        }

        async fn fetch_plant_detail(&self, id: PlantId) -> Option<PlantRecord> {
            self.record(format!("plant/{id}"));
            self.details.get(&id).cloned()
        }
    }

    fn plant(id: i32, name: &str, price: i64) -> PlantRecord {
        PlantRecord::new(PlantId::new(id), name).with_price(Price::from_units(price))
    }

    fn item(id: i32, name: &str, price: i64) -> CartRequest {
        CartRequest {
            id: PlantId::new(id),
            name: name.to_string(),
            price: Price::from_units(price),
        }
    }

    fn fruit() -> CategoryFilter {
        CategoryFilter::Category(CategoryId::Numeric(1))
    }

    fn shade() -> CategoryFilter {
        CategoryFilter::Category(CategoryId::Numeric(2))
    }

    fn catalog() -> FakeCatalog {
        FakeCatalog {
            categories: vec![CategoryRecord::new(1, "Fruit"), CategoryRecord::new(2, "Shade")],
            all: Some(vec![plant(1, "Mango", 500), plant(2, "Neem", 300)]),
            by_category: HashMap::from([
                (CategoryId::Numeric(1), vec![plant(1, "Mango", 500)]),
                (CategoryId::Numeric(2), vec![plant(3, "Banyan", 800)]),
            ]),
            details: HashMap::from([(PlantId::new(1), plant(1, "Mango", 500))]),
            calls: Mutex::default(),
        }
    }

    fn grid_of(updates: &[Update]) -> &GridView {
        updates
            .iter()
            .find_map(|u| match u {
                Update::Grid(grid) => Some(grid),
                _ => None,
            })
            .unwrap()
    }

    fn names(grid: &GridView) -> Vec<&str> {
        grid.cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_initialize_loads_categories_then_plants() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller.initialize().await;

        assert_eq!(catalog.calls(), vec!["categories", "plants"]);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(updates.len(), 3);

        let Update::Categories(buttons) = &updates[0] else {
            panic!("expected categories first");
        };
        assert_eq!(buttons.len(), 3);
        assert!(buttons[0].active);

        assert_eq!(names(grid_of(&updates)), vec!["Mango", "Neem"]);
        assert!(matches!(&updates[2], Update::Cart(panel) if panel.is_empty()));
    }

    #[tokio::test]
    async fn test_initialize_survives_catalog_outage() {
        let catalog = FakeCatalog::default();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller.initialize().await;

        let Update::Categories(buttons) = &updates[0] else {
            panic!("expected categories first");
        };
        assert_eq!(buttons.len(), 1);
        let grid = grid_of(&updates);
        assert_eq!(grid.notice.unwrap().text, ALL_PLANTS_FAILED_MESSAGE);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_select_category_renders_grid_and_returns_to_idle() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller.dispatch(Action::SelectCategory(shade())).await;

        assert_eq!(names(grid_of(&updates)), vec!["Banyan"]);
        assert_eq!(controller.active(), &shade());
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(catalog.calls(), vec!["category/2"]);
    }

    #[tokio::test]
    async fn test_select_all_fetches_every_plant() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller
            .dispatch(Action::SelectCategory(CategoryFilter::All))
            .await;

        assert_eq!(names(grid_of(&updates)), vec!["Mango", "Neem"]);
        assert_eq!(catalog.calls(), vec!["plants"]);
    }

    #[tokio::test]
    async fn test_empty_category_shows_empty_state_not_error() {
        let mut catalog = catalog();
        catalog.by_category.insert(CategoryId::Numeric(2), Vec::new());
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller.dispatch(Action::SelectCategory(shade())).await;
        let grid = grid_of(&updates);

        assert!(grid.is_empty_state());
        assert_eq!(grid.notice.unwrap().text, NO_TREES_MESSAGE);
    }

    #[tokio::test]
    async fn test_failed_category_shows_error_notice() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let missing = CategoryFilter::Category(CategoryId::Numeric(99));
        let updates = controller.dispatch(Action::SelectCategory(missing)).await;
        let grid = grid_of(&updates);

        assert!(grid.cards.is_empty());
        assert_eq!(grid.notice.unwrap().text, CATEGORY_FAILED_MESSAGE);
        assert!(grid.notice.unwrap().is_error);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_stale_category_load_is_discarded() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let first = controller.begin_category_load(fruit());
        let second = controller.begin_category_load(shade());
        assert!(second.seq() > first.seq());
        assert_eq!(controller.phase(), Phase::Loading { seq: second.seq() });

        // The newer load finishes first, then the older one straggles in.
        let second_plants = controller.load(&second).await;
        let first_plants = controller.load(&first).await;

        let fresh = controller.complete_category_load(&second, second_plants);
        let Some(Update::Grid(grid)) = fresh else {
            panic!("expected the newest load to render");
        };
        assert_eq!(names(&grid), vec!["Banyan"]);

        assert!(controller.complete_category_load(&first, first_plants).is_none());
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.active(), &shade());
    }

    #[tokio::test]
    async fn test_older_completion_while_newer_outstanding_keeps_loading() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let first = controller.begin_category_load(fruit());
        let second = controller.begin_category_load(shade());

        let first_plants = controller.load(&first).await;
        assert!(controller.complete_category_load(&first, first_plants).is_none());
        assert_eq!(controller.phase(), Phase::Loading { seq: second.seq() });

        let second_plants = controller.load(&second).await;
        assert!(controller.complete_category_load(&second, second_plants).is_some());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_load_superseded_by_another_controller_is_discarded() {
        let catalog = catalog();
        let loads = Arc::new(LoadSequence::default());
        let mut slow =
            Controller::new(&catalog, Cart::new()).with_load_sequence(Arc::clone(&loads));
        let mut fast =
            Controller::new(&catalog, Cart::new()).with_load_sequence(Arc::clone(&loads));

        let ticket = slow.begin_category_load(fruit());
        let updates = fast.dispatch(Action::SelectCategory(shade())).await;
        assert_eq!(names(grid_of(&updates)), vec!["Banyan"]);

        let plants = slow.load(&ticket).await;
        assert!(slow.complete_category_load(&ticket, plants).is_none());
        assert_eq!(loads.latest(), 2);

        // A fresh selection on the superseded controller renders again.
        let updates = slow.dispatch(Action::SelectCategory(fruit())).await;
        assert_eq!(names(grid_of(&updates)), vec!["Mango"]);
    }

    #[tokio::test]
    async fn test_controllers_with_own_sequences_do_not_interfere() {
        let catalog = catalog();
        let mut first = Controller::new(&catalog, Cart::new());
        let mut second = Controller::new(&catalog, Cart::new());

        let ticket = first.begin_category_load(fruit());
        second.dispatch(Action::SelectCategory(shade())).await;

        let plants = first.load(&ticket).await;
        assert!(first.complete_category_load(&ticket, plants).is_some());
    }

    #[tokio::test]
    async fn test_open_detail_shows_modal() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller.dispatch(Action::OpenDetail(PlantId::new(1))).await;

        let [Update::Modal(Some(modal))] = updates.as_slice() else {
            panic!("expected a single visible modal, got {updates:?}");
        };
        assert_eq!(modal.title, "Mango");
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_open_detail_absent_keeps_modal_hidden() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller.dispatch(Action::OpenDetail(PlantId::new(42))).await;

        assert_eq!(updates, vec![Update::Modal(None)]);
        assert!(controller.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_scenario() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        for request in [item(1, "Mango", 500), item(1, "Mango", 500), item(2, "Neem", 300)] {
            controller
                .dispatch(Action::AddToCart {
                    item: request,
                    source: AddSource::Grid,
                })
                .await;
        }

        let panel = render_cart_panel(controller.cart());
        assert_eq!(panel.rows.len(), 2);
        assert_eq!(panel.total, "৳1,300");
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_from_grid_updates_cart_only() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller
            .dispatch(Action::AddToCart {
                item: item(1, "Mango", 500),
                source: AddSource::Grid,
            })
            .await;

        assert_eq!(updates.len(), 1);
        assert!(matches!(&updates[0], Update::Cart(panel) if panel.item_count == 1));
    }

    #[tokio::test]
    async fn test_add_from_modal_also_closes_modal() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller
            .dispatch(Action::AddToCart {
                item: item(1, "Mango", 500),
                source: AddSource::Modal,
            })
            .await;

        assert_eq!(updates.len(), 2);
        assert!(matches!(&updates[0], Update::Cart(_)));
        assert_eq!(updates[1], Update::Modal(None));
    }

    #[tokio::test]
    async fn test_remove_from_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(PlantId::new(1), "Mango", Price::from_units(500));
        let mut controller = Controller::new(&catalog, cart);

        let updates = controller
            .dispatch(Action::RemoveFromCart(PlantId::new(1)))
            .await;

        assert!(matches!(&updates[0], Update::Cart(panel) if panel.is_empty() && panel.total == "৳0"));
        assert!(controller.into_cart().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_item_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(PlantId::new(1), "Mango", Price::from_units(500));
        let before = cart.clone();
        let mut controller = Controller::new(&catalog, cart);

        controller
            .dispatch(Action::RemoveFromCart(PlantId::new(9)))
            .await;

        assert_eq!(controller.cart(), &before);
    }

    #[tokio::test]
    async fn test_close_modal_touches_nothing_else() {
        let catalog = catalog();
        let mut controller = Controller::new(&catalog, Cart::new());

        let updates = controller.dispatch(Action::CloseModal).await;

        assert_eq!(updates, vec![Update::Modal(None)]);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(catalog.calls().is_empty());
    }
}
