//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Append the Korean counter for items, e.g. `3개`.
///
/// Usage in templates: `{{ cart.item_count|units }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn units(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{value}개"))
}
