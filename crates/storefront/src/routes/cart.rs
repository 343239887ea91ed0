//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the browser's `cart-storage` client store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{RawForm, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use brewline_core::cart::{MAX_LINE_QUANTITY, Selection};
use brewline_core::{CartLineId, MenuItemId};

use crate::client_state::ClientStores;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{HxTrigger, ToastKind};
use crate::routes::views::CartView;
use crate::state::AppState;

/// Client event raised whenever the cart changes.
pub const CART_UPDATED: &str = "cart-updated";

/// Add to cart form data.
///
/// `extras` may repeat, so the body is parsed by hand rather than with
/// `Form`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AddToCartForm {
    pub menu_item_id: Option<u32>,
    pub selection: Selection,
    pub quantity: u32,
}

impl AddToCartForm {
    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a malformed item id or a quantity
    /// that is not a number up to [`MAX_LINE_QUANTITY`].
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut form = Self {
            quantity: 1,
            ..Self::default()
        };
        for (key, value) in url::form_urlencoded::parse(body) {
            let value = value.trim();
            match key.as_ref() {
                "menu_item_id" => {
                    form.menu_item_id = Some(value.parse().map_err(|_| {
                        AppError::BadRequest("메뉴를 다시 선택해주세요.".to_owned())
                    })?);
                }
                "quantity" => {
                    form.quantity = value
                        .parse()
                        .ok()
                        .filter(|quantity| *quantity <= MAX_LINE_QUANTITY)
                        .ok_or_else(|| AppError::BadRequest("수량을 확인해주세요.".to_owned()))?;
                }
                "size" if !value.is_empty() => form.selection.size = Some(value.to_owned()),
                "temperature" if !value.is_empty() => {
                    form.selection.temperature = Some(value.to_owned());
                }
                "extras" if !value.is_empty() => form.selection.extras.push(value.to_owned()),
                _ => {}
            }
        }
        Ok(form)
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: CartLineId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: CartLineId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub store_name: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, stores: ClientStores) -> Result<impl IntoResponse> {
    let cart = stores.cart.cart().await?;
    let store_name = cart
        .store_id
        .and_then(|id| state.catalog().store(id))
        .map(|store| store.name.clone());

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        store_name,
    })
}

/// Add item to cart (HTMX).
///
/// Returns the new count badge and raises `cart-updated`.
#[instrument(skip(state, stores, body))]
pub async fn add(
    State(state): State<AppState>,
    stores: ClientStores,
    RawForm(body): RawForm,
) -> Result<impl IntoResponse> {
    let form = AddToCartForm::parse(&body)?;
    let item_id = form
        .menu_item_id
        .map(MenuItemId::new)
        .ok_or_else(|| AppError::BadRequest("메뉴를 다시 선택해주세요.".to_owned()))?;
    let catalog = state.catalog();
    let item = catalog
        .menu_item(item_id)
        .ok_or_else(|| AppError::NotFound(format!("menu item {item_id}")))?;

    let cart = stores.cart.cart().await?;
    if let Some(store) = cart.store_id.and_then(|id| catalog.store(id))
        && !store.carries(item_id)
    {
        return Err(AppError::BadRequest(format!(
            "{} 매장에서 판매하지 않는 메뉴입니다.",
            store.name
        )));
    }

    let line_id = stores
        .cart
        .add_item(item, form.selection, form.quantity)
        .await?;
    let count = stores.cart.cart().await?.item_count();

    tracing::info!(%line_id, menu_item_id = %item_id, quantity = form.quantity, "Added to cart");

    Ok((
        HxTrigger::new()
            .event(CART_UPDATED)
            .toast(ToastKind::Success, format!("{}을(를) 장바구니에 담았습니다.", item.name)),
        CartCountTemplate { count },
    ))
}

/// Update cart item quantity (HTMX).
#[instrument(skip(stores))]
pub async fn update(
    stores: ClientStores,
    Form(form): Form<UpdateCartForm>,
) -> Result<impl IntoResponse> {
    stores
        .cart
        .update_quantity(form.line_id, form.quantity)
        .await?;
    let cart = stores.cart.cart().await?;

    Ok((
        HxTrigger::new().event(CART_UPDATED),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Remove item from cart (HTMX).
#[instrument(skip(stores))]
pub async fn remove(
    stores: ClientStores,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let removed = stores.cart.remove_item(form.line_id).await?;
    let cart = stores.cart.cart().await?;

    Ok((
        HxTrigger::new()
            .event(CART_UPDATED)
            .toast(ToastKind::Info, format!("{}을(를) 뺐습니다.", removed.name)),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Empty the cart (HTMX).
#[instrument(skip(stores))]
pub async fn clear(stores: ClientStores) -> Result<impl IntoResponse> {
    stores.cart.clear().await?;
    let cart = stores.cart.cart().await?;

    Ok((
        HxTrigger::new()
            .event(CART_UPDATED)
            .toast(ToastKind::Info, "장바구니를 비웠습니다."),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Get cart count badge (HTMX).
#[instrument(skip(stores))]
pub async fn count(stores: ClientStores) -> Result<impl IntoResponse> {
    let count = stores.cart.cart().await?.item_count();
    Ok(CartCountTemplate { count })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_form_with_repeated_extras() {
        let form = AddToCartForm::parse(
            b"menu_item_id=1&size=grande&temperature=iced&extras=shot&extras=vanilla&quantity=2",
        )
        .unwrap();
        assert_eq!(form.menu_item_id, Some(1));
        assert_eq!(form.quantity, 2);
        assert_eq!(form.selection.size.as_deref(), Some("grande"));
        assert_eq!(form.selection.temperature.as_deref(), Some("iced"));
        assert_eq!(form.selection.extras, vec!["shot", "vanilla"]);
    }

    #[test]
    fn test_parse_add_form_defaults() {
        let form = AddToCartForm::parse(b"menu_item_id=9&size=&extras=").unwrap();
        assert_eq!(form.quantity, 1);
        assert_eq!(form.selection, Selection::default());
    }

    #[test]
    fn test_parse_add_form_rejects_bad_numbers() {
        assert!(matches!(
            AddToCartForm::parse(b"menu_item_id=abc"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            AddToCartForm::parse(b"menu_item_id=1&quantity=-1"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_add_form_caps_quantity() {
        let form = AddToCartForm::parse(b"menu_item_id=1&quantity=99").unwrap();
        assert_eq!(form.quantity, MAX_LINE_QUANTITY);
        assert!(matches!(
            AddToCartForm::parse(b"menu_item_id=1&quantity=100"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            AddToCartForm::parse(b"menu_item_id=1&quantity=4294967295"),
            Err(AppError::BadRequest(_))
        ));
    }
}
