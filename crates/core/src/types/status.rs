//! Status and classification enums.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// `Pending -> Confirmed -> Preparing -> Completed`, or `Cancelled` from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Korean label shown on order cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "주문 접수 대기",
            Self::Confirmed => "주문 확인",
            Self::Preparing => "제조 중",
            Self::Completed => "픽업 완료",
            Self::Cancelled => "주문 취소",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(code)
    }
}

/// Account role, deciding which console a user may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Owner,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Owner => write!(f, "owner"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipLevel {
    #[default]
    Green,
    Gold,
    Diamond,
}

impl MembershipLevel {
    /// Percentage of the paid total returned as points.
    #[must_use]
    pub const fn earn_rate_percent(self) -> u32 {
        match self {
            Self::Green => 1,
            Self::Gold => 2,
            Self::Diamond => 3,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Gold => "Gold",
            Self::Diamond => "Diamond",
        }
    }
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    KakaoPay,
    NaverPay,
    TossPay,
}

impl PaymentMethod {
    /// All methods in checkout display order.
    pub const ALL: [Self; 4] = [Self::Card, Self::KakaoPay, Self::NaverPay, Self::TossPay];

    /// Form value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::KakaoPay => "kakao_pay",
            Self::NaverPay => "naver_pay",
            Self::TossPay => "toss_pay",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "신용/체크카드",
            Self::KakaoPay => "카카오페이",
            Self::NaverPay => "네이버페이",
            Self::TossPay => "토스페이",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.code() == s)
            .ok_or_else(|| format!("invalid payment method: {s}"))
    }
}
