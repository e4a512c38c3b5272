//! Askama templates for the page and its HTMX fragments.
//!
//! Each fragment renders a single root element carrying a stable id, so a
//! response can replace it with `hx-swap="outerHTML"`. With `oob` set the
//! root also carries `hx-swap-oob`, letting one response update several
//! regions at once.

use askama::Template;
use askama_web::WebTemplate;

use super::{CartPanelView, CategoryButtonView, GridView, ModalView};

/// Full storefront page.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub categories: Vec<CategoryButtonView>,
    pub grid: GridView,
    pub cart: CartPanelView,
}

/// Category navigation fragment.
#[derive(Template)]
#[template(path = "partials/categories.html")]
pub struct CategoryNavTemplate<'a> {
    pub categories: &'a [CategoryButtonView],
    pub oob: bool,
}

/// Product grid fragment.
#[derive(Template)]
#[template(path = "partials/grid.html")]
pub struct ProductGridTemplate<'a> {
    pub grid: &'a GridView,
    pub oob: bool,
}

/// Cart panel fragment (items, total and badge).
#[derive(Template)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate<'a> {
    pub cart: &'a CartPanelView,
    pub oob: bool,
}

/// Detail modal fragment. Renders a hidden, empty container when `modal`
/// is `None`.
#[derive(Template)]
#[template(path = "partials/modal.html")]
pub struct ModalTemplate<'a> {
    pub modal: Option<&'a ModalView>,
    pub oob: bool,
}
