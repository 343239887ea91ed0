//! Print the menu.

use brewline_core::catalog::{Category, OptionKind};
use brewline_storefront::catalog::Catalog;

use super::CliError;

/// Print menu items with their prices and options.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown category code.
#[allow(clippy::print_stdout)]
pub fn list(category: Option<&str>) -> Result<(), CliError> {
    let category = category
        .map(|code| {
            code.parse::<Category>().map_err(|_| {
                let known: Vec<_> = Category::ALL.iter().map(|c| c.code()).collect();
                CliError::InvalidArgument(format!(
                    "unknown category '{code}' (expected one of: {})",
                    known.join(", ")
                ))
            })
        })
        .transpose()?;

    let catalog = Catalog::seeded();
    for item in catalog.menu_for(category, None) {
        println!(
            "{:>3}  {:<20} {:>9}  [{}]",
            item.id.get(),
            item.name,
            item.base_price.display(),
            item.category.code()
        );
        for kind in [OptionKind::Size, OptionKind::Temperature, OptionKind::Extra] {
            let options: Vec<String> = item
                .options_of(kind)
                .map(|option| {
                    let delta = option.price_delta();
                    if delta.amount().is_zero() {
                        option.id().to_owned()
                    } else {
                        format!("{} (+{})", option.id(), delta.display())
                    }
                })
                .collect();
            if !options.is_empty() {
                println!("       {kind:?}: {}", options.join(", "));
            }
        }
    }
    Ok(())
}
