//! Cart lines and their pricing.
//!
//! A line's price is fixed when it is inserted:
//!
//! ```text
//! unit  = base + size delta + Σ extra deltas
//! total = unit × quantity
//! ```
//!
//! Adding the same item with the same size, temperature, and set of extras
//! merges into the existing line. Changing a line's quantity rescales its
//! total by the implied unit price (`total / quantity`) instead of re-reading
//! option deltas, so a line keeps the price it was added at.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{MenuItem, MenuOption, OptionKind};
use crate::types::{CartLineId, MenuItemId, Price, StoreId};

/// Most units a single line can hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantities start at one.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// A line may hold at most [`MAX_LINE_QUANTITY`] units.
    #[error("quantity {0} exceeds the per-line limit of {max}", max = MAX_LINE_QUANTITY)]
    QuantityTooLarge(u64),

    /// The item has no option of that kind with that id.
    #[error("{kind:?} option '{id}' is not offered for this item")]
    UnknownOption { kind: OptionKind, id: String },

    /// No line with that id is in the cart.
    #[error("cart line not found: {0}")]
    LineNotFound(CartLineId),
}

/// What the customer picked on the item sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub size: Option<String>,
    pub temperature: Option<String>,
    pub extras: Vec<String>,
}

impl Selection {
    /// Sort and deduplicate extras so selections compare as sets.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.extras.sort();
        self.extras.dedup();
        self
    }
}

/// Snapshot of a chosen option stored on the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenOption {
    pub id: String,
    pub name: String,
    pub price_delta: Price,
}

impl From<&MenuOption> for ChosenOption {
    fn from(option: &MenuOption) -> Self {
        Self {
            id: option.id().to_owned(),
            name: option.name().to_owned(),
            price_delta: option.price_delta(),
        }
    }
}

/// One line of the cart: a menu item snapshot plus the customer's choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartLineId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub image_url: Option<String>,
    pub base_price: Price,
    pub size: Option<ChosenOption>,
    pub temperature: Option<ChosenOption>,
    /// Sorted by id.
    pub extras: Vec<ChosenOption>,
    pub quantity: u32,
    pub total_price: Price,
}

impl CartItem {
    /// Price of a single unit as implied by the stored total.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.total_price
            .checked_div(self.quantity)
            .unwrap_or(Price::ZERO)
    }

    /// Whether this line holds the same item with the same choices.
    #[must_use]
    pub fn same_choice(&self, menu_item_id: MenuItemId, selection: &Selection) -> bool {
        let extras_match = self.extras.len() == selection.extras.len()
            && self
                .extras
                .iter()
                .zip(&selection.extras)
                .all(|(chosen, id)| &chosen.id == id);
        self.menu_item_id == menu_item_id
            && option_id(self.size.as_ref()) == selection.size.as_deref()
            && option_id(self.temperature.as_ref()) == selection.temperature.as_deref()
            && extras_match
    }

    /// Names of the chosen options joined for display, e.g. `Grande · ICED · 샷 추가`.
    #[must_use]
    pub fn options_summary(&self) -> String {
        self.size
            .iter()
            .chain(self.temperature.iter())
            .chain(self.extras.iter())
            .map(|option| option.name.as_str())
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

fn option_id(option: Option<&ChosenOption>) -> Option<&str> {
    option.map(|chosen| chosen.id.as_str())
}

/// Options resolved against an item, ready to price.
#[derive(Debug, Clone)]
pub struct ResolvedSelection<'a> {
    pub size: Option<&'a MenuOption>,
    pub temperature: Option<&'a MenuOption>,
    pub extras: Vec<&'a MenuOption>,
}

/// Look up every selected id on the item.
///
/// # Errors
///
/// Returns [`CartError::UnknownOption`] for an id the item does not offer.
pub fn resolve<'a>(
    item: &'a MenuItem,
    selection: &Selection,
) -> Result<ResolvedSelection<'a>, CartError> {
    let find = |kind: OptionKind, id: &str| {
        item.find_option(kind, id)
            .ok_or_else(|| CartError::UnknownOption {
                kind,
                id: id.to_owned(),
            })
    };

    let size = selection
        .size
        .as_deref()
        .map(|id| find(OptionKind::Size, id))
        .transpose()?;
    let temperature = selection
        .temperature
        .as_deref()
        .map(|id| find(OptionKind::Temperature, id))
        .transpose()?;
    let extras = selection
        .extras
        .iter()
        .map(|id| find(OptionKind::Extra, id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedSelection {
        size,
        temperature,
        extras,
    })
}

/// `base + size delta + Σ extra deltas`. Temperature never affects price.
#[must_use]
pub fn unit_price(base_price: Price, size: Option<&MenuOption>, extras: &[&MenuOption]) -> Price {
    let size_delta = size.map_or(Price::ZERO, MenuOption::price_delta);
    let extras_delta: Price = extras.iter().map(|extra| extra.price_delta()).sum();
    base_price + size_delta + extras_delta
}

/// Price `quantity` units of an item with the given choices.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] for zero,
/// [`CartError::QuantityTooLarge`] above [`MAX_LINE_QUANTITY`] and
/// [`CartError::UnknownOption`] for ids the item does not offer.
pub fn line_total(item: &MenuItem, selection: &Selection, quantity: u32) -> Result<Price, CartError> {
    check_quantity(u64::from(quantity))?;
    let resolved = resolve(item, selection)?;
    Ok(unit_price(item.base_price, resolved.size, &resolved.extras) * quantity)
}

fn check_quantity(quantity: u64) -> Result<u32, CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity(0));
    }
    if quantity > u64::from(MAX_LINE_QUANTITY) {
        return Err(CartError::QuantityTooLarge(quantity));
    }
    u32::try_from(quantity).map_err(|_| CartError::QuantityTooLarge(quantity))
}

/// The customer's cart plus the store it will be ordered from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub store_id: Option<StoreId>,
}

impl Cart {
    /// Add `quantity` units of an item, merging into a matching line.
    ///
    /// Returns the id of the line that now holds the units.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for zero,
    /// [`CartError::QuantityTooLarge`] when the line would exceed
    /// [`MAX_LINE_QUANTITY`] and [`CartError::UnknownOption`] for ids the item
    /// does not offer. The cart is unchanged on error.
    pub fn add(
        &mut self,
        item: &MenuItem,
        selection: Selection,
        quantity: u32,
    ) -> Result<CartLineId, CartError> {
        check_quantity(u64::from(quantity))?;
        let selection = selection.normalized();
        let resolved = resolve(item, &selection)?;
        let added_total = unit_price(item.base_price, resolved.size, &resolved.extras) * quantity;

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.same_choice(item.id, &selection))
        {
            line.quantity = check_quantity(u64::from(line.quantity) + u64::from(quantity))?;
            line.total_price += added_total;
            return Ok(line.id);
        }

        let line = CartItem {
            id: CartLineId::generate(),
            menu_item_id: item.id,
            name: item.name.clone(),
            image_url: item.main_image().map(|image| image.url.clone()),
            base_price: item.base_price,
            size: resolved.size.map(ChosenOption::from),
            temperature: resolved.temperature.map(ChosenOption::from),
            extras: resolved.extras.into_iter().map(ChosenOption::from).collect(),
            quantity,
            total_price: added_total,
        };
        let id = line.id;
        self.items.push(line);
        Ok(id)
    }

    /// Remove a line outright.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has that id.
    pub fn remove(&mut self, line_id: CartLineId) -> Result<CartItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|line| line.id == line_id)
            .ok_or(CartError::LineNotFound(line_id))?;
        Ok(self.items.remove(index))
    }

    /// Set a line's quantity, rescaling its total by the implied unit price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for zero,
    /// [`CartError::QuantityTooLarge`] above [`MAX_LINE_QUANTITY`] and
    /// [`CartError::LineNotFound`] if no line has that id.
    pub fn update_quantity(
        &mut self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<&CartItem, CartError> {
        check_quantity(u64::from(quantity))?;
        let line = self
            .items
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or(CartError::LineNotFound(line_id))?;
        line.total_price = line.unit_price() * quantity;
        line.quantity = quantity;
        Ok(line)
    }

    /// Drop every line. The store pointer is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Point the cart at a store.
    pub const fn set_store(&mut self, store_id: Option<StoreId>) {
        self.store_id = store_id;
    }

    /// Σ line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(|line| line.total_price).sum()
    }

    /// Σ quantities, shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line.
    #[must_use]
    pub fn line(&self, line_id: CartLineId) -> Option<&CartItem> {
        self.items.iter().find(|line| line.id == line_id)
    }
}
