//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use brewline_core::catalog::MenuItem;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::routes::views::MenuCardView;
use crate::state::AppState;

/// Items per home page shelf.
const SHELF_SIZE: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user_name: Option<String>,
    pub store_name: Option<String>,
    pub recommended: Vec<MenuCardView>,
    pub new_arrivals: Vec<MenuCardView>,
    pub best_sellers: Vec<MenuCardView>,
}

fn shelf<'a>(items: impl Iterator<Item = &'a MenuItem>) -> Vec<MenuCardView> {
    items.take(SHELF_SIZE).map(MenuCardView::from).collect()
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user, stores): OptionalUser,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let store_name = stores
        .store_selection
        .selected()
        .await?
        .and_then(|id| catalog.store(id))
        .map(|store| store.name.clone());

    Ok(HomeTemplate {
        user_name: user.map(|user| user.name),
        store_name,
        recommended: shelf(catalog.recommended()),
        new_arrivals: shelf(catalog.new_arrivals()),
        best_sellers: shelf(catalog.best_sellers()),
    })
}
