//! Form validation.
//!
//! Each form has a `validate` method that checks every field and returns a
//! [`ValidationErrors`] map (field name → message) rendered inline next to
//! the inputs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use brewline_core::{CouponId, Email, PaymentMethod, Points};

use crate::backend::StoreRegistration;

static MOBILE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[016789]-\d{3,4}-\d{4}$").expect("Invalid regex"));

static STORE_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0\d{1,2}-\d{3,4}-\d{4}|01[016789]-\d{3,4}-\d{4})$")
        .expect("Invalid regex")
});

static STORE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{4,12}$").expect("Invalid regex"));

static BUSINESS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{2}-\d{5}$").expect("Invalid regex"));

/// Field → message map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message for a field, for templates.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when no field failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn check_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "이메일을 입력해주세요.");
    } else if Email::parse(value).is_err() {
        errors.add(field, "올바른 이메일 형식이 아닙니다.");
    }
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    label: &str,
) {
    let len = char_len(value);
    if len == 0 {
        errors.add(field, format!("{label}을(를) 입력해주세요."));
    } else if len < min || len > max {
        errors.add(field, format!("{label}은(는) {min}~{max}자로 입력해주세요."));
    }
}

/// 8-16 characters with at least one letter, digit, and special character.
fn password_is_strong(password: &str) -> bool {
    let len = password.chars().count();
    (8..=16).contains(&len)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_punctuation())
        && !password.chars().any(char::is_whitespace)
}

// =============================================================================
// Signup
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);

        if self.password.is_empty() {
            errors.add("password", "비밀번호를 입력해주세요.");
        } else if !password_is_strong(&self.password) {
            errors.add(
                "password",
                "비밀번호는 영문, 숫자, 특수문자를 포함한 8~16자로 입력해주세요.",
            );
        }
        if self.password_confirm != self.password {
            errors.add("password_confirm", "비밀번호가 일치하지 않습니다.");
        }

        check_length(&mut errors, "name", &self.name, 2, 20, "이름");

        if !MOBILE_PHONE.is_match(self.phone.trim()) {
            errors.add("phone", "휴대폰 번호는 010-1234-5678 형식으로 입력해주세요.");
        }
        errors.into_result(())
    }
}

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        if self.password.is_empty() {
            errors.add("password", "비밀번호를 입력해주세요.");
        }
        errors.into_result(())
    }
}

// =============================================================================
// Store registration
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreRegistrationForm {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub store_code: String,
    #[serde(default)]
    pub business_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl StoreRegistrationForm {
    /// Validate and convert to the backend request body.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<StoreRegistration, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "store_name", &self.store_name, 2, 30, "매장명");

        if !STORE_CODE.is_match(self.store_code.trim()) {
            errors.add(
                "store_code",
                "매장 코드는 영문 대문자와 숫자 4~12자로 입력해주세요.",
            );
        }
        if !BUSINESS_NUMBER.is_match(self.business_number.trim()) {
            errors.add(
                "business_number",
                "사업자등록번호는 123-45-67890 형식으로 입력해주세요.",
            );
        }
        if self.address.trim().is_empty() {
            errors.add("address", "주소를 입력해주세요.");
        }
        if !STORE_PHONE.is_match(self.phone.trim()) {
            errors.add("phone", "전화번호는 02-123-4567 형식으로 입력해주세요.");
        }

        errors.into_result(StoreRegistration {
            store_name: self.store_name.trim().to_owned(),
            store_code: self.store_code.trim().to_owned(),
            business_number: self.business_number.trim().to_owned(),
            address: self.address.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
        })
    }
}

// =============================================================================
// Checkout
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub points: String,
    #[serde(default)]
    pub coupon_id: String,
}

/// Validated checkout choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutInput {
    pub payment_method: PaymentMethod,
    pub points: Points,
    pub coupon_id: Option<CouponId>,
}

impl CheckoutForm {
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<CheckoutInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let payment_method = if self.payment_method.is_empty() {
            errors.add("payment_method", "결제 수단을 선택해주세요.");
            None
        } else {
            self.payment_method.parse::<PaymentMethod>().ok().or_else(|| {
                errors.add("payment_method", "지원하지 않는 결제 수단입니다.");
                None
            })
        };

        let points = match self.points.trim() {
            "" => Some(Points::ZERO),
            raw => match raw.parse::<i64>() {
                Ok(value) if value < 0 => {
                    errors.add("points", "포인트는 0 이상이어야 합니다.");
                    None
                }
                Ok(value) => Some(Points::new(u32::try_from(value).unwrap_or(u32::MAX))),
                Err(_) => {
                    errors.add("points", "포인트는 숫자로 입력해주세요.");
                    None
                }
            },
        };

        let coupon_id = match self.coupon_id.trim() {
            "" => Some(None),
            raw => raw.parse::<CouponId>().map(Some).ok().or_else(|| {
                errors.add("coupon_id", "쿠폰을 다시 선택해주세요.");
                None
            }),
        };

        match (payment_method, points, coupon_id) {
            (Some(payment_method), Some(points), Some(coupon_id)) if errors.is_empty() => {
                Ok(CheckoutInput {
                    payment_method,
                    points,
                    coupon_id,
                })
            }
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Profile
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
}

impl ProfileForm {
    /// Validate and return the trimmed name.
    ///
    /// # Errors
    ///
    /// Returns the name error.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "name", &self.name, 2, 20, "이름");
        errors.into_result(self.name.trim().to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            email: "new@brewline.kr".to_owned(),
            password: "coffee12!".to_owned(),
            password_confirm: "coffee12!".to_owned(),
            name: "최유나".to_owned(),
            phone: "010-1234-5678".to_owned(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn test_signup_collects_every_field() {
        let form = SignupForm {
            email: "nope".to_owned(),
            password: "short".to_owned(),
            password_confirm: "other".to_owned(),
            name: "김".to_owned(),
            phone: "01012345678".to_owned(),
        };
        let errors = form.validate().unwrap_err();
        for field in ["email", "password", "password_confirm", "name", "phone"] {
            assert!(errors.get(field).is_some(), "{field} should fail");
        }
    }

    #[test]
    fn test_password_rules() {
        assert!(password_is_strong("abcd123!"));
        assert!(!password_is_strong("abcdefgh1"));
        assert!(!password_is_strong("12345678!"));
        assert!(!password_is_strong("abcdefgh!"));
        assert!(!password_is_strong("abc12!"));
        assert!(!password_is_strong("abcdefgh12345678!"));
        assert!(!password_is_strong("abc 123 !"));
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "customer@brewline.kr".to_owned(),
            password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("email").is_none());
        assert_eq!(errors.get("password"), Some("비밀번호를 입력해주세요."));
    }

    #[test]
    fn test_store_registration() {
        let mut form = StoreRegistrationForm {
            store_name: " 브루라인 성수2호점 ".to_owned(),
            store_code: "SEONGSU2".to_owned(),
            business_number: "123-45-67890".to_owned(),
            address: "서울 성동구 성수이로 1".to_owned(),
            phone: "02-123-4567".to_owned(),
        };
        let registration = form.validate().unwrap();
        assert_eq!(registration.store_name, "브루라인 성수2호점");

        form.store_code = "seongsu".to_owned();
        form.business_number = "1234567890".to_owned();
        let errors = form.validate().unwrap_err();
        assert!(errors.get("store_code").is_some());
        assert!(errors.get("business_number").is_some());
        assert!(errors.get("phone").is_none());
    }

    #[test]
    fn test_checkout_form() {
        let form = CheckoutForm {
            payment_method: "kakao_pay".to_owned(),
            points: "3000".to_owned(),
            coupon_id: "1".to_owned(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.payment_method, PaymentMethod::KakaoPay);
        assert_eq!(input.points, Points::new(3000));
        assert_eq!(input.coupon_id, Some(CouponId::new(1)));

        let blank = CheckoutForm::default().validate().unwrap_err();
        assert!(blank.get("payment_method").is_some());
        assert!(blank.get("points").is_none());

        let negative = CheckoutForm {
            payment_method: "card".to_owned(),
            points: "-1".to_owned(),
            coupon_id: String::new(),
        };
        assert_eq!(
            negative.validate().unwrap_err().get("points"),
            Some("포인트는 0 이상이어야 합니다.")
        );
    }

    #[test]
    fn test_errors_display() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        errors.add("email", "bad");
        assert_eq!(errors.to_string(), "email: bad; name: first");
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn test_profile_name_length() {
        let form = ProfileForm {
            name: "  김민지 ".to_owned(),
        };
        assert_eq!(form.validate().unwrap(), "김민지");

        let short = ProfileForm {
            name: "김".to_owned(),
        };
        assert!(short.validate().unwrap_err().get("name").is_some());
    }
}
