//! error.rs
//!
//! user-facing validation errors; the Display text is what the form shows

use strum::Display;

/// one variant per rule the stock preference form can break
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StockPreferencesError {
    #[strum(to_string = "Please select a stock type")]
    MissingStockType,
    #[strum(to_string = "Unknown stock type")]
    UnknownStockType,
    #[strum(to_string = "Minimum price must be a number")]
    InvalidMinPrice,
    #[strum(to_string = "Minimum price must be positive")]
    NegativeMinPrice,
    #[strum(to_string = "Maximum price must be a number")]
    InvalidMaxPrice,
    #[strum(to_string = "Maximum price must be positive")]
    NegativeMaxPrice,
    #[strum(to_string = "Maximum price must be greater than minimum price")]
    MaxNotAboveMin,
    #[strum(to_string = "Please select a purchase date")]
    MissingPurchaseDate,
    #[strum(to_string = "Purchase date must be a valid date")]
    InvalidPurchaseDate,
    #[strum(to_string = "Purchase date cannot be in the past")]
    PurchaseDateInPast,
}
