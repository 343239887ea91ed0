//! Catalog entities: menu items, their options, stores, users, and coupons.
//!
//! These are read-only reference data for the storefront. Orders live in
//! [`crate::checkout`] because they are produced there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    CouponId, Email, MembershipLevel, MenuItemId, Points, Price, StoreId, UserId, UserRole,
};

/// Menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Coffee,
    NonCoffee,
    Dessert,
}

impl Category {
    /// All categories in menu tab order.
    pub const ALL: [Self; 3] = [Self::Coffee, Self::NonCoffee, Self::Dessert];

    /// Query-string value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Coffee => "coffee",
            Self::NonCoffee => "non_coffee",
            Self::Dessert => "dessert",
        }
    }

    /// Tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Coffee => "커피",
            Self::NonCoffee => "논커피",
            Self::Dessert => "디저트",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.code() == s)
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

/// Whether an item is drunk or eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Beverage,
    Food,
}

/// One picture of a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuImage {
    pub url: String,
    pub is_main: bool,
}

/// Nutrition facts per serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    pub kcal: u32,
    pub sugar_g: u32,
    pub protein_g: u32,
    pub sodium_mg: u32,
    pub caffeine_mg: u32,
}

/// Merchandising badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct MenuFlags {
    pub is_new: bool,
    pub is_recommended: bool,
    pub is_best_seller: bool,
}

/// Kind of a [`MenuOption`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Size,
    Temperature,
    Extra,
}

/// A selectable variant of a menu item.
///
/// Sizes and extras change the price; temperature is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuOption {
    Size {
        id: String,
        name: String,
        price_delta: Price,
    },
    Temperature {
        id: String,
        name: String,
    },
    Extra {
        id: String,
        name: String,
        price_delta: Price,
    },
}

impl MenuOption {
    /// Option id, unique within its kind for one item.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Size { id, .. } | Self::Temperature { id, .. } | Self::Extra { id, .. } => id,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Size { name, .. } | Self::Temperature { name, .. } | Self::Extra { name, .. } => {
                name
            }
        }
    }

    /// The option's discriminant.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        match self {
            Self::Size { .. } => OptionKind::Size,
            Self::Temperature { .. } => OptionKind::Temperature,
            Self::Extra { .. } => OptionKind::Extra,
        }
    }

    /// Price effect of choosing this option. Zero for temperatures.
    #[must_use]
    pub const fn price_delta(&self) -> Price {
        match self {
            Self::Size { price_delta, .. } | Self::Extra { price_delta, .. } => *price_delta,
            Self::Temperature { .. } => Price::ZERO,
        }
    }
}

/// A menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub name_en: String,
    pub description: String,
    pub base_price: Price,
    pub category: Category,
    pub item_type: ItemType,
    pub images: Vec<MenuImage>,
    pub nutrition: Nutrition,
    pub allergies: Vec<String>,
    pub flags: MenuFlags,
    pub options: Vec<MenuOption>,
}

impl MenuItem {
    /// The image flagged as main, falling back to the first one.
    #[must_use]
    pub fn main_image(&self) -> Option<&MenuImage> {
        self.images
            .iter()
            .find(|image| image.is_main)
            .or_else(|| self.images.first())
    }

    /// Options of one kind, in declaration order.
    pub fn options_of(&self, kind: OptionKind) -> impl Iterator<Item = &MenuOption> {
        self.options.iter().filter(move |option| option.kind() == kind)
    }

    /// Look up an option by kind and id.
    #[must_use]
    pub fn find_option(&self, kind: OptionKind, id: &str) -> Option<&MenuOption> {
        self.options_of(kind).find(|option| option.id() == id)
    }
}

/// Amenities advertised on a store card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Facilities {
    pub parking: bool,
    pub drive_thru: bool,
    pub wifi: bool,
    pub pet_friendly: bool,
    pub delivery: bool,
}

/// A physical store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    /// Pre-rendered distance, e.g. `"350m"`.
    pub distance: String,
    /// Pre-rendered opening hours, e.g. `"07:00 - 22:00"`.
    pub business_hours: String,
    pub phone: String,
    pub facilities: Facilities,
    /// Menu items this store carries.
    pub menu_ids: Vec<MenuItemId>,
}

impl Store {
    /// Whether the store sells the given item.
    #[must_use]
    pub fn carries(&self, item: MenuItemId) -> bool {
        self.menu_ids.contains(&item)
    }
}

/// An account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
    pub points: Points,
    pub level: MembershipLevel,
    /// Loyalty stamps collected towards a free drink.
    pub stamps: u32,
    pub verified: bool,
}

/// Stamps needed for one free drink.
pub const STAMPS_PER_REWARD: u32 = 12;

/// How a coupon discounts an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// Flat won amount.
    Fixed,
    /// Percentage of some base. Not applied at checkout.
    Percentage,
    /// A free menu item. Not applied at checkout.
    FreeMenu,
}

/// A discount coupon in a customer's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub name: String,
    pub kind: CouponKind,
    /// Won for `Fixed`, percent for `Percentage`, menu item id for `FreeMenu`.
    pub value: u32,
    pub min_order_amount: Price,
    pub expires_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether the coupon is past its expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Short description of the benefit, e.g. `3,000원 할인`.
    #[must_use]
    pub fn benefit(&self) -> String {
        match self.kind {
            CouponKind::Fixed => format!("{} 할인", Price::won(i64::from(self.value))),
            CouponKind::Percentage => format!("{}% 할인", self.value),
            CouponKind::FreeMenu => "음료 1잔 무료".to_owned(),
        }
    }
}
