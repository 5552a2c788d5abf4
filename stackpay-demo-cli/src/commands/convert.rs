//! Convert command - base units <-> display units

use anyhow::{Context, Result};
use stackpay_lib::amount::{self, SCALE};

use crate::ui;

pub fn to_display(base: u64) -> Result<()> {
    ui::key_value("Base units", &base.to_string());
    ui::key_value("Display units", &amount::format_display_units(base));
    Ok(())
}

pub fn to_base(display: &str) -> Result<()> {
    let base = display_to_base(display)?;
    ui::key_value("Display units", display.trim());
    ui::key_value("Base units", &base.to_string());
    if amount::has_sub_unit_digits(display) {
        ui::warning(&format!("Precision below 1/{SCALE} was dropped"));
    }
    Ok(())
}

/// Parse display-unit text into base units
pub fn display_to_base(display: &str) -> Result<u64> {
    let value = amount::parse_display_amount(display)
        .with_context(|| format!("'{}' is not a valid amount", display.trim()))?;
    Ok(amount::to_base_units(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_to_base() {
        assert_eq!(display_to_base("1").unwrap(), 100_000_000);
        assert_eq!(display_to_base(" 0.5 ").unwrap(), 50_000_000);
        assert_eq!(display_to_base("0.000000015").unwrap(), 1);
        assert!(display_to_base("ten").is_err());
        assert!(display_to_base("-1").is_err());
        assert_eq!(display_to_base("0.99999999999999999999999999999").unwrap(), 99_999_999);
    }
}
