//! Store list and store selection.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use brewline_core::StoreId;

use crate::client_state::ClientStores;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::HxTrigger;
use crate::routes::{redirect, views::StoreView};
use crate::state::AppState;

/// Store list page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/index.html")]
pub struct StoresTemplate {
    pub stores: Vec<StoreView>,
}

/// Display all stores, marking the selected one.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, stores: ClientStores) -> Result<impl IntoResponse> {
    let selected = stores.store_selection.selected().await?;
    Ok(StoresTemplate {
        stores: state
            .catalog()
            .stores()
            .iter()
            .map(|store| StoreView::new(store, selected == Some(store.id)))
            .collect(),
    })
}

/// Store selection form data.
#[derive(Debug, Deserialize)]
pub struct SelectStoreForm {
    pub store_id: u32,
}

/// Select a store.
///
/// Writes the selection store, then points the cart at the same store.
/// The two writes are independent.
#[instrument(skip(state, stores, headers))]
pub async fn select(
    State(state): State<AppState>,
    stores: ClientStores,
    headers: HeaderMap,
    Form(form): Form<SelectStoreForm>,
) -> Result<Response> {
    let store_id = StoreId::new(form.store_id);
    let store = state
        .catalog()
        .store(store_id)
        .ok_or_else(|| AppError::NotFound(format!("store {store_id}")))?;

    stores.store_selection.select(store_id).await?;
    stores.cart.set_store(Some(store_id)).await?;

    tracing::info!(store_id = %store_id, scope = %stores.scope(), "Store selected");

    let trigger = HxTrigger::success(format!("{} 매장을 선택했습니다.", store.name))
        .event("store-selected");
    Ok(redirect(&headers, "/menu", trigger))
}
