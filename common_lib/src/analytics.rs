//! analytics.rs
//!
//! visitor/account identity handed to the product analytics snippet for a signed-in user

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

const DEFAULT_ROLE_TYPE: &str = "investor";
const DEFAULT_REGION: &str = "US";
const DEFAULT_ACCOUNT: &str = "Individual";

/// profile fields kept by the external profile store; any of them may be missing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserProfile {
    pub role_type: Option<String>,
    pub region: Option<String>,
    pub portfolio_balance: Option<BigDecimal>,
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visitor {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role_type: String,
    pub region: String,
    pub portfolio_total_balance: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsIdentity {
    pub visitor: Visitor,
    pub account: Account,
}

impl AnalyticsIdentity {
    /// Build the payload, filling in defaults for anything the profile doesn't have yet. The full
    /// name falls back to the local part of the email.
    pub fn new(email: &str, full_name: Option<&str>, profile: Option<&UserProfile>) -> AnalyticsIdentity {
        let full_name = non_empty(full_name)
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email))
            .to_string();

        let role_type = profile.and_then(|p| non_empty(p.role_type.as_deref())).unwrap_or(DEFAULT_ROLE_TYPE);
        let region = profile.and_then(|p| non_empty(p.region.as_deref())).unwrap_or(DEFAULT_REGION);
        let balance = profile
            .and_then(|p| p.portfolio_balance.clone())
            .unwrap_or_else(|| BigDecimal::from(0));
        let company = profile.and_then(|p| non_empty(p.company_id.as_deref())).unwrap_or(DEFAULT_ACCOUNT);

        AnalyticsIdentity {
            visitor: Visitor {
                id: email.to_string(),
                email: email.to_string(),
                full_name,
                role_type: role_type.to_string(),
                region: region.to_string(),
                portfolio_total_balance: balance,
            },
            account: Account {
                id: company.to_string(),
                name: company.to_string(),
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
