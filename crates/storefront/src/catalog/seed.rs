//! Seed data for the in-process catalog.

use chrono::{DateTime, Duration, TimeZone, Utc};

use brewline_core::catalog::{
    Category, Coupon, CouponKind, Facilities, ItemType, MenuFlags, MenuImage, MenuItem, MenuOption,
    Nutrition, Store, User,
};
use brewline_core::checkout::{Order, OrderLine};
use brewline_core::{
    CouponId, Email, MembershipLevel, MenuItemId, OrderId, OrderStatus, PaymentMethod, Points,
    Price, StoreId, UserId, UserRole,
};

use super::Account;

fn size(id: &str, name: &str, delta: i64) -> MenuOption {
    MenuOption::Size {
        id: id.to_owned(),
        name: name.to_owned(),
        price_delta: Price::won(delta),
    }
}

fn temperature(id: &str, name: &str) -> MenuOption {
    MenuOption::Temperature {
        id: id.to_owned(),
        name: name.to_owned(),
    }
}

fn extra(id: &str, name: &str, delta: i64) -> MenuOption {
    MenuOption::Extra {
        id: id.to_owned(),
        name: name.to_owned(),
        price_delta: Price::won(delta),
    }
}

/// Sizes, both temperatures, and the common extras.
fn beverage_options(iced_only: bool) -> Vec<MenuOption> {
    let mut options = vec![
        size("tall", "Tall", 0),
        size("grande", "Grande", 500),
        size("venti", "Venti", 1000),
    ];
    if !iced_only {
        options.push(temperature("hot", "HOT"));
    }
    options.push(temperature("iced", "ICED"));
    options.extend([
        extra("shot", "샷 추가", 500),
        extra("vanilla", "바닐라 시럽", 300),
        extra("whip", "휘핑 크림", 500),
        extra("oat", "오트 밀크 변경", 600),
    ]);
    options
}

fn images(slug: &str) -> Vec<MenuImage> {
    vec![
        MenuImage {
            url: format!("/static/images/menu/{slug}.jpg"),
            is_main: true,
        },
        MenuImage {
            url: format!("/static/images/menu/{slug}-detail.jpg"),
            is_main: false,
        },
    ]
}

struct Draft {
    id: u32,
    slug: &'static str,
    name: &'static str,
    name_en: &'static str,
    description: &'static str,
    price: i64,
    category: Category,
    nutrition: Nutrition,
    allergies: &'static [&'static str],
    flags: MenuFlags,
}

impl Draft {
    fn beverage(self, iced_only: bool) -> MenuItem {
        self.build(ItemType::Beverage, beverage_options(iced_only))
    }

    fn food(self) -> MenuItem {
        self.build(ItemType::Food, Vec::new())
    }

    fn build(self, item_type: ItemType, options: Vec<MenuOption>) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(self.id),
            name: self.name.to_owned(),
            name_en: self.name_en.to_owned(),
            description: self.description.to_owned(),
            base_price: Price::won(self.price),
            category: self.category,
            item_type,
            images: images(self.slug),
            nutrition: self.nutrition,
            allergies: self.allergies.iter().map(|&a| a.to_owned()).collect(),
            flags: self.flags,
            options,
        }
    }
}

const fn nutrition(kcal: u32, sugar_g: u32, protein_g: u32, sodium_mg: u32, caffeine_mg: u32) -> Nutrition {
    Nutrition {
        kcal,
        sugar_g,
        protein_g,
        sodium_mg,
        caffeine_mg,
    }
}

const fn flags(is_new: bool, is_recommended: bool, is_best_seller: bool) -> MenuFlags {
    MenuFlags {
        is_new,
        is_recommended,
        is_best_seller,
    }
}

pub(super) fn menu() -> Vec<MenuItem> {
    vec![
        Draft {
            id: 1,
            slug: "americano",
            name: "아메리카노",
            name_en: "Americano",
            description: "진한 에스프레소에 물을 더해 깔끔하게 즐기는 커피",
            price: 4500,
            category: Category::Coffee,
            nutrition: nutrition(10, 0, 1, 5, 150),
            allergies: &[],
            flags: flags(false, true, true),
        }
        .beverage(false),
        Draft {
            id: 2,
            slug: "caffe-latte",
            name: "카페 라떼",
            name_en: "Caffe Latte",
            description: "에스프레소와 스팀 밀크가 어우러진 부드러운 라떼",
            price: 5000,
            category: Category::Coffee,
            nutrition: nutrition(180, 13, 10, 115, 75),
            allergies: &["우유"],
            flags: flags(false, true, true),
        }
        .beverage(false),
        Draft {
            id: 3,
            slug: "vanilla-latte",
            name: "바닐라 라떼",
            name_en: "Vanilla Latte",
            description: "바닐라 시럽의 달콤함을 더한 라떼",
            price: 5500,
            category: Category::Coffee,
            nutrition: nutrition(250, 28, 9, 120, 75),
            allergies: &["우유"],
            flags: flags(false, false, true),
        }
        .beverage(false),
        Draft {
            id: 4,
            slug: "cold-brew",
            name: "콜드 브루",
            name_en: "Cold Brew",
            description: "차가운 물로 오랜 시간 추출한 깔끔한 커피",
            price: 4900,
            category: Category::Coffee,
            nutrition: nutrition(5, 0, 0, 10, 200),
            allergies: &[],
            flags: flags(true, true, false),
        }
        .beverage(true),
        Draft {
            id: 5,
            slug: "caramel-macchiato",
            name: "카라멜 마키아또",
            name_en: "Caramel Macchiato",
            description: "바닐라 시럽과 카라멜 드리즐이 올라간 마키아또",
            price: 5900,
            category: Category::Coffee,
            nutrition: nutrition(200, 25, 8, 130, 75),
            allergies: &["우유"],
            flags: flags(true, false, false),
        }
        .beverage(false),
        Draft {
            id: 6,
            slug: "green-tea-latte",
            name: "그린티 라떼",
            name_en: "Green Tea Latte",
            description: "제주 녹차와 우유가 어우러진 라떼",
            price: 5800,
            category: Category::NonCoffee,
            nutrition: nutrition(240, 30, 9, 110, 60),
            allergies: &["우유"],
            flags: flags(false, true, false),
        }
        .beverage(false),
        Draft {
            id: 7,
            slug: "chocolate",
            name: "시그니처 초콜릿",
            name_en: "Signature Chocolate",
            description: "진한 초콜릿과 우유로 만든 음료",
            price: 5500,
            category: Category::NonCoffee,
            nutrition: nutrition(330, 38, 10, 150, 10),
            allergies: &["우유", "대두"],
            flags: flags(false, false, false),
        }
        .beverage(false),
        Draft {
            id: 8,
            slug: "grapefruit-ade",
            name: "자몽 에이드",
            name_en: "Grapefruit Ade",
            description: "자몽 과육을 듬뿍 넣은 상큼한 에이드",
            price: 5700,
            category: Category::NonCoffee,
            nutrition: nutrition(160, 38, 0, 20, 0),
            allergies: &[],
            flags: flags(true, false, false),
        }
        .beverage(true),
        Draft {
            id: 9,
            slug: "new-york-cheesecake",
            name: "뉴욕 치즈 케이크",
            name_en: "New York Cheesecake",
            description: "진하고 부드러운 크림치즈 케이크",
            price: 6500,
            category: Category::Dessert,
            nutrition: nutrition(420, 28, 7, 250, 0),
            allergies: &["우유", "밀", "계란"],
            flags: flags(false, true, true),
        }
        .food(),
        Draft {
            id: 10,
            slug: "butter-croissant",
            name: "버터 크루아상",
            name_en: "Butter Croissant",
            description: "겹겹이 바삭한 프랑스식 크루아상",
            price: 3800,
            category: Category::Dessert,
            nutrition: nutrition(290, 5, 6, 320, 0),
            allergies: &["우유", "밀"],
            flags: flags(false, false, false),
        }
        .food(),
        Draft {
            id: 11,
            slug: "tiramisu",
            name: "티라미수",
            name_en: "Tiramisu",
            description: "마스카포네 크림과 에스프레소 시트의 조화",
            price: 6900,
            category: Category::Dessert,
            nutrition: nutrition(380, 30, 6, 90, 20),
            allergies: &["우유", "밀", "계란"],
            flags: flags(true, false, false),
        }
        .food(),
    ]
}

fn store(
    id: u32,
    name: &str,
    address: &str,
    distance: &str,
    phone: &str,
    facilities: Facilities,
    menu_ids: &[u32],
) -> Store {
    Store {
        id: StoreId::new(id),
        name: name.to_owned(),
        address: address.to_owned(),
        distance: distance.to_owned(),
        business_hours: "07:00 - 22:00".to_owned(),
        phone: phone.to_owned(),
        facilities,
        menu_ids: menu_ids.iter().copied().map(MenuItemId::new).collect(),
    }
}

pub(super) fn stores() -> Vec<Store> {
    let everything: Vec<u32> = (1..=11).collect();
    vec![
        store(
            1,
            "브루라인 강남역점",
            "서울 강남구 강남대로 396",
            "350m",
            "02-555-0101",
            Facilities {
                wifi: true,
                delivery: true,
                ..Facilities::default()
            },
            &everything,
        ),
        store(
            2,
            "브루라인 성수점",
            "서울 성동구 연무장길 45",
            "1.2km",
            "02-555-0102",
            Facilities {
                wifi: true,
                pet_friendly: true,
                ..Facilities::default()
            },
            &everything,
        ),
        store(
            3,
            "브루라인 여의도 DT점",
            "서울 영등포구 여의대로 108",
            "3.4km",
            "02-555-0103",
            Facilities {
                parking: true,
                drive_thru: true,
                wifi: true,
                ..Facilities::default()
            },
            &[1, 2, 3, 4, 5, 6, 10],
        ),
        store(
            4,
            "브루라인 홍대입구점",
            "서울 마포구 양화로 160",
            "5.8km",
            "02-555-0104",
            Facilities {
                wifi: true,
                delivery: true,
                pet_friendly: true,
                ..Facilities::default()
            },
            &[1, 2, 3, 6, 7, 8, 9, 11],
        ),
    ]
}

struct Seat {
    id: u32,
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: UserRole,
    points: u32,
    level: MembershipLevel,
    stamps: u32,
}

impl Seat {
    fn account(self) -> Option<Account> {
        Some(Account {
            user: User {
                id: UserId::new(self.id),
                email: Email::parse(self.email).ok()?,
                name: self.name.to_owned(),
                role: self.role,
                points: Points::new(self.points),
                level: self.level,
                stamps: self.stamps,
                verified: true,
            },
            password: self.password,
        })
    }
}

pub(super) fn accounts() -> Vec<Account> {
    [
        Seat {
            id: 1,
            email: "customer@brewline.kr",
            password: "customer1234!",
            name: "김민지",
            role: UserRole::Customer,
            points: 12_500,
            level: MembershipLevel::Gold,
            stamps: 7,
        },
        Seat {
            id: 2,
            email: "green@brewline.kr",
            password: "green1234!",
            name: "이서준",
            role: UserRole::Customer,
            points: 800,
            level: MembershipLevel::Green,
            stamps: 2,
        },
        Seat {
            id: 3,
            email: "owner@brewline.kr",
            password: "owner1234!",
            name: "박지훈",
            role: UserRole::Owner,
            points: 0,
            level: MembershipLevel::Green,
            stamps: 0,
        },
        Seat {
            id: 4,
            email: "admin@brewline.kr",
            password: "admin1234!",
            name: "관리자",
            role: UserRole::Admin,
            points: 0,
            level: MembershipLevel::Diamond,
            stamps: 0,
        },
    ]
    .into_iter()
    .filter_map(Seat::account)
    .collect()
}

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub(super) fn coupons() -> Vec<Coupon> {
    let issued = reference_time();
    let far_future = issued + Duration::days(3650);
    vec![
        Coupon {
            id: CouponId::new(1),
            code: "WELCOME3000".to_owned(),
            name: "신규 가입 3,000원 할인".to_owned(),
            kind: CouponKind::Fixed,
            value: 3000,
            min_order_amount: Price::won(5000),
            expires_at: far_future,
        },
        Coupon {
            id: CouponId::new(2),
            code: "BDAY1000".to_owned(),
            name: "생일 축하 1,000원 할인".to_owned(),
            kind: CouponKind::Fixed,
            value: 1000,
            min_order_amount: Price::ZERO,
            expires_at: far_future,
        },
        Coupon {
            id: CouponId::new(3),
            code: "GOLD10".to_owned(),
            name: "골드 등급 10% 할인".to_owned(),
            kind: CouponKind::Percentage,
            value: 10,
            min_order_amount: Price::won(10_000),
            expires_at: far_future,
        },
        Coupon {
            id: CouponId::new(4),
            code: "FREEAMERICANO".to_owned(),
            name: "아메리카노 1잔 무료".to_owned(),
            kind: CouponKind::FreeMenu,
            value: 1,
            min_order_amount: Price::ZERO,
            expires_at: far_future,
        },
        Coupon {
            id: CouponId::new(5),
            code: "SPRING2000".to_owned(),
            name: "봄맞이 2,000원 할인".to_owned(),
            kind: CouponKind::Fixed,
            value: 2000,
            min_order_amount: Price::ZERO,
            expires_at: issued - Duration::days(1),
        },
    ]
}

fn line(menu_item_id: u32, name: &str, options: &str, quantity: u32, total: i64) -> OrderLine {
    OrderLine {
        menu_item_id: MenuItemId::new(menu_item_id),
        name: name.to_owned(),
        options: options.to_owned(),
        quantity,
        total_price: Price::won(total),
    }
}

#[allow(clippy::too_many_arguments)]
fn order(
    id: u32,
    store_id: u32,
    user_id: u32,
    lines: Vec<OrderLine>,
    payment_method: PaymentMethod,
    status: OrderStatus,
    used_points: u32,
    days_ago: i64,
) -> Order {
    let subtotal: Price = lines.iter().map(|line| line.total_price).sum();
    let total_price = subtotal.saturating_sub(Points::new(used_points).as_price());
    Order {
        id: OrderId::new(id),
        store_id: StoreId::new(store_id),
        user_id: UserId::new(user_id),
        lines,
        subtotal,
        coupon_id: None,
        coupon_discount: Price::ZERO,
        total_price,
        payment_method,
        status,
        used_points: Points::new(used_points),
        earned_points: Points::ZERO,
        created_at: reference_time() - Duration::days(days_ago),
    }
}

pub(super) fn orders() -> Vec<Order> {
    vec![
        order(
            1001,
            1,
            1,
            vec![
                line(1, "아메리카노", "Grande · ICED", 2, 10_000),
                line(9, "뉴욕 치즈 케이크", "", 1, 6500),
            ],
            PaymentMethod::KakaoPay,
            OrderStatus::Completed,
            0,
            6,
        ),
        order(
            1002,
            2,
            1,
            vec![line(2, "카페 라떼", "Tall · HOT · 샷 추가", 1, 5500)],
            PaymentMethod::Card,
            OrderStatus::Completed,
            1000,
            3,
        ),
        order(
            1003,
            1,
            2,
            vec![
                line(4, "콜드 브루", "Venti · ICED", 1, 5900),
                line(10, "버터 크루아상", "", 2, 7600),
            ],
            PaymentMethod::TossPay,
            OrderStatus::Preparing,
            0,
            0,
        ),
        order(
            1004,
            1,
            1,
            vec![line(6, "그린티 라떼", "Grande · ICED", 1, 6300)],
            PaymentMethod::NaverPay,
            OrderStatus::Pending,
            0,
            0,
        ),
        order(
            1005,
            3,
            2,
            vec![line(3, "바닐라 라떼", "Tall · HOT", 1, 5500)],
            PaymentMethod::Card,
            OrderStatus::Cancelled,
            0,
            10,
        ),
    ]
}
