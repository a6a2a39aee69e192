//! stock_preferences.rs
//!
//! "find your perfect stocks" form: validate what the user typed, then narrow the watchlist down
//! to one sector and a price band.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::StockPreferencesError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StockSector {
    Technology,
    Automotive,
    Ecommerce,
    Financial,
    /// matches every sector
    All,
}

pub const SECTORS: [StockSector; 5] = [
    StockSector::Technology,
    StockSector::Automotive,
    StockSector::Ecommerce,
    StockSector::Financial,
    StockSector::All,
];

impl StockSector {
    pub fn label(&self) -> &'static str {
        match self {
            StockSector::Technology => "Technology",
            StockSector::Automotive => "Automotive",
            StockSector::Ecommerce => "E-commerce",
            StockSector::Financial => "Financial Services",
            StockSector::All => "All Sectors",
        }
    }

    pub fn matches(&self, other: StockSector) -> bool {
        *self == StockSector::All || *self == other
    }
}

/// value/label pair for the sector drop-down
#[derive(Debug, Serialize)]
pub struct SectorOption {
    pub value: String,
    pub label: &'static str,
}

pub fn sector_options() -> Vec<SectorOption> {
    SECTORS
        .iter()
        .map(|sector| SectorOption {
            value: sector.to_string(),
            label: sector.label(),
        })
        .collect()
}

/// a row of the configured watchlist
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WatchlistStock {
    pub symbol: String,
    pub name: String,
    pub sector: StockSector,
    pub price: BigDecimal,
}

/// Raw form submission. Kept as strings so a bad number becomes a message on the form instead of a
/// rejected request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StockPreferences {
    pub stock_type: String,
    pub min_price: String,
    pub max_price: String,
    pub purchase_date: String,
}

impl Default for StockPreferences {
    fn default() -> Self {
        StockPreferences {
            stock_type: String::new(),
            min_price: "0".to_string(),
            max_price: "1000".to_string(),
            purchase_date: String::new(),
        }
    }
}

/// a submission that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct StockQuery {
    pub sector: StockSector,
    pub min_price: BigDecimal,
    pub max_price: BigDecimal,
    pub purchase_date: NaiveDate,
}

impl StockPreferences {
    /// Check every field and report all problems at once. `today` is the exchange-local date;
    /// purchase dates before it are rejected.
    pub fn validate(&self, today: NaiveDate) -> Result<StockQuery, Vec<StockPreferencesError>> {
        let mut errors = vec![];

        let stock_type = self.stock_type.trim();
        let sector = if stock_type.is_empty() {
            errors.push(StockPreferencesError::MissingStockType);
            None
        } else {
            match StockSector::from_str(stock_type) {
                Ok(sector) => Some(sector),
                Err(_) => {
                    errors.push(StockPreferencesError::UnknownStockType);
                    None
                }
            }
        };

        let min_price = parse_price(&self.min_price, StockPreferencesError::InvalidMinPrice, StockPreferencesError::NegativeMinPrice, &mut errors);
        let max_price = parse_price(&self.max_price, StockPreferencesError::InvalidMaxPrice, StockPreferencesError::NegativeMaxPrice, &mut errors);

        if let (Some(min), Some(max)) = (&min_price, &max_price) {
            if max <= min {
                errors.push(StockPreferencesError::MaxNotAboveMin);
            }
        }

        let purchase_date = self.purchase_date.trim();
        let purchase_date = if purchase_date.is_empty() {
            errors.push(StockPreferencesError::MissingPurchaseDate);
            None
        } else {
            match NaiveDate::parse_from_str(purchase_date, "%Y-%m-%d") {
                Ok(date) if date < today => {
                    errors.push(StockPreferencesError::PurchaseDateInPast);
                    None
                }
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::debug!("[validate] purchase date {:?}: {:?}", purchase_date, &e);
                    errors.push(StockPreferencesError::InvalidPurchaseDate);
                    None
                }
            }
        };

        match (sector, min_price, max_price, purchase_date) {
            (Some(sector), Some(min_price), Some(max_price), Some(purchase_date)) if errors.is_empty() => Ok(StockQuery {
                sector,
                min_price,
                max_price,
                purchase_date,
            }),
            _ => Err(errors),
        }
    }
}

/// None when the price is unusable; the reason lands in `errors`
fn parse_price(raw: &str, invalid: StockPreferencesError, negative: StockPreferencesError, errors: &mut Vec<StockPreferencesError>) -> Option<BigDecimal> {
    match BigDecimal::from_str(raw.trim()) {
        Ok(price) if price < BigDecimal::from(0) => {
            errors.push(negative);
            None
        }
        Ok(price) => Some(price),
        Err(_) => {
            errors.push(invalid);
            None
        }
    }
}

/// stocks in the sector priced within [min, max], watchlist order kept
pub fn filter_watchlist<'a>(stocks: &'a [WatchlistStock], sector: StockSector, min_price: &BigDecimal, max_price: &BigDecimal) -> Vec<&'a WatchlistStock> {
    stocks
        .iter()
        .filter(|stock| sector.matches(stock.sector))
        .filter(|stock| &stock.price >= min_price && &stock.price <= max_price)
        .collect()
}
