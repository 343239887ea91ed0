//! Menu route handlers.
//!
//! The list is filtered by category and, once a store is selected, by what
//! that store carries.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use brewline_core::MenuItemId;
use brewline_core::catalog::{Category, MenuItem, MenuOption, OptionKind};

use crate::client_state::ClientStores;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::views::MenuCardView;
use crate::state::AppState;

/// Query parameters for the menu list.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// A category tab.
#[derive(Clone)]
pub struct CategoryTab {
    pub code: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Menu list page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/index.html")]
pub struct MenuIndexTemplate {
    pub tabs: Vec<CategoryTab>,
    pub all_active: bool,
    pub store_name: Option<String>,
    pub items: Vec<MenuCardView>,
}

/// Display the menu list.
#[instrument(skip(state, stores))]
pub async fn index(
    State(state): State<AppState>,
    stores: ClientStores,
    Query(query): Query<MenuQuery>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let category = query
        .category
        .as_deref()
        .filter(|code| !code.is_empty())
        .and_then(|code| code.parse::<Category>().ok());
    let store = stores
        .store_selection
        .selected()
        .await?
        .and_then(|id| catalog.store(id));

    let items: Vec<MenuCardView> = catalog
        .menu_for(category, store)
        .map(MenuCardView::from)
        .collect();

    tracing::debug!(count = items.len(), "Menu listed");

    Ok(MenuIndexTemplate {
        tabs: Category::ALL
            .into_iter()
            .map(|tab| CategoryTab {
                code: tab.code(),
                label: tab.label(),
                active: category == Some(tab),
            })
            .collect(),
        all_active: category.is_none(),
        store_name: store.map(|store| store.name.clone()),
        items,
    })
}

/// A choice on the item sheet.
#[derive(Clone)]
pub struct OptionView {
    pub id: String,
    pub name: String,
    pub price_delta: String,
    pub checked: bool,
}

impl OptionView {
    fn list(item: &MenuItem, kind: OptionKind) -> Vec<Self> {
        item.options_of(kind)
            .enumerate()
            .map(|(index, option)| Self {
                id: option.id().to_owned(),
                name: option.name().to_owned(),
                price_delta: price_delta_label(option),
                // First size and temperature are preselected.
                checked: index == 0 && kind != OptionKind::Extra,
            })
            .collect()
    }
}

fn price_delta_label(option: &MenuOption) -> String {
    let delta = option.price_delta();
    if delta.amount().is_zero() {
        String::new()
    } else {
        format!("+{}", delta.display())
    }
}

/// Nutrition row.
#[derive(Clone)]
pub struct NutritionRow {
    pub label: &'static str,
    pub value: String,
}

/// Menu detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/show.html")]
pub struct MenuShowTemplate {
    pub id: u32,
    pub name: String,
    pub name_en: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub sizes: Vec<OptionView>,
    pub temperatures: Vec<OptionView>,
    pub extras: Vec<OptionView>,
    pub nutrition: Vec<NutritionRow>,
    pub allergies: String,
    pub store_name: Option<String>,
    /// False when the selected store does not sell this item.
    pub available: bool,
}

/// Display one menu item with its options.
#[instrument(skip(state, stores))]
pub async fn show(
    State(state): State<AppState>,
    stores: ClientStores,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let item = catalog
        .menu_item(MenuItemId::new(id))
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))?;
    let store = stores
        .store_selection
        .selected()
        .await?
        .and_then(|id| catalog.store(id));

    let card = MenuCardView::from(item);
    let n = &item.nutrition;

    Ok(MenuShowTemplate {
        id,
        name: item.name.clone(),
        name_en: item.name_en.clone(),
        description: item.description.clone(),
        price: card.price,
        image_url: card.image_url,
        sizes: OptionView::list(item, OptionKind::Size),
        temperatures: OptionView::list(item, OptionKind::Temperature),
        extras: OptionView::list(item, OptionKind::Extra),
        nutrition: vec![
            NutritionRow {
                label: "열량",
                value: format!("{}kcal", n.kcal),
            },
            NutritionRow {
                label: "당류",
                value: format!("{}g", n.sugar_g),
            },
            NutritionRow {
                label: "단백질",
                value: format!("{}g", n.protein_g),
            },
            NutritionRow {
                label: "나트륨",
                value: format!("{}mg", n.sodium_mg),
            },
            NutritionRow {
                label: "카페인",
                value: format!("{}mg", n.caffeine_mg),
            },
        ],
        allergies: item.allergies.join(", "),
        store_name: store.map(|store| store.name.clone()),
        available: store.is_none_or(|store| store.carries(item.id)),
    })
}
