//! Enumerations and range checks shared by the resource clients.
//!
//! Every enumeration parses from the exact wire string the Pipedrive API
//! uses and renders back to it, so a value that parses is always one the
//! server accepts.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ValidationError;

/// Upper bound on page size for every paginated endpoint.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Upper bound on recurring billing cycles for a deal product.
pub const MAX_BILLING_CYCLES: i64 = 208;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal, label = $label:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            fn allowed() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ValidationError::new(
                        $field,
                        format!(
                            "Invalid {}: {}. Must be one of: {}",
                            $label,
                            other,
                            Self::allowed()
                        ),
                    )),
                }
            }
        }
    };
}

wire_enum! {
    /// Lifecycle state of a deal.
    DealStatus, field = "status", label = "status value" {
        Open => "open",
        Won => "won",
        Lost => "lost",
    }
}

wire_enum! {
    DiscountType, field = "discount_type", label = "discount type" {
        Percentage => "percentage",
        Amount => "amount",
    }
}

wire_enum! {
    TaxMethod, field = "tax_method", label = "tax method" {
        Inclusive => "inclusive",
        Exclusive => "exclusive",
        None => "none",
    }
}

wire_enum! {
    /// Recurrence of a deal product's billing.
    BillingFrequency, field = "billing_frequency", label = "billing frequency" {
        OneTime => "one-time",
        Weekly => "weekly",
        Monthly => "monthly",
        Quarterly => "quarterly",
        SemiAnnually => "semi-annually",
        Annually => "annually",
    }
}

wire_enum! {
    SortDirection, field = "sort_direction", label = "sort_direction" {
        Asc => "asc",
        Desc => "desc",
    }
}

wire_enum! {
    /// Sort keys accepted by deal and pipeline listings.
    SortField, field = "sort_by", label = "sort_by value" {
        Id => "id",
        UpdateTime => "update_time",
        AddTime => "add_time",
    }
}

wire_enum! {
    /// Sort keys accepted by stage listings.
    StageSortField, field = "sort_by", label = "sort_by value" {
        Id => "id",
        UpdateTime => "update_time",
        AddTime => "add_time",
        OrderNr => "order_nr",
    }
}

wire_enum! {
    /// Note list ordering; the `-` prefix sorts descending.
    NoteSort, field = "sort", label = "sort field" {
        AddTime => "add_time",
        UpdateTime => "update_time",
        AddTimeDesc => "-add_time",
        UpdateTimeDesc => "-update_time",
    }
}

wire_enum! {
    /// Deal fields a search term may be matched against.
    DealSearchField, field = "fields", label = "search field" {
        Title => "title",
        Notes => "notes",
        CustomFields => "custom_fields",
    }
}

impl Default for DealStatus {
    fn default() -> Self {
        DealStatus::Open
    }
}

impl Default for DiscountType {
    fn default() -> Self {
        DiscountType::Percentage
    }
}

impl Default for BillingFrequency {
    fn default() -> Self {
        BillingFrequency::OneTime
    }
}

/// Resource identifiers must be positive.
pub fn positive_id(field: &str, label: &str, id: i64) -> Result<i64, ValidationError> {
    if id <= 0 {
        return Err(ValidationError::new(
            field,
            format!("Invalid {label}: {id}. Must be a positive integer."),
        ));
    }
    Ok(id)
}

pub fn non_blank<'a>(field: &str, value: &'a str, message: &str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(value)
}

pub fn probability(value: i64) -> Result<i64, ValidationError> {
    if !(0..=100).contains(&value) {
        return Err(ValidationError::new(
            "probability",
            format!("Invalid probability value: {value}. Must be between 0 and 100"),
        ));
    }
    Ok(value)
}

pub fn non_negative(field: &str, label: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(
            field,
            format!("Invalid {label}: {value}. Must be a non-negative number."),
        ));
    }
    Ok(value)
}

pub fn positive_quantity(value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(
            "quantity",
            format!("Invalid quantity: {value}. Must be a positive integer."),
        ));
    }
    Ok(value)
}

pub fn billing_cycles(value: i64) -> Result<i64, ValidationError> {
    if !(1..=MAX_BILLING_CYCLES).contains(&value) {
        return Err(ValidationError::new(
            "billing_frequency_cycles",
            format!(
                "Invalid billing frequency cycles: {value}. Must be a positive integer less than or equal to {MAX_BILLING_CYCLES}."
            ),
        ));
    }
    Ok(value)
}

/// Page size between 1 and [`MAX_PAGE_LIMIT`].
pub fn page_limit(value: i64) -> Result<i64, ValidationError> {
    if !(1..=MAX_PAGE_LIMIT).contains(&value) {
        return Err(ValidationError::new(
            "limit",
            format!("Invalid limit: {value}. Must be between 1 and {MAX_PAGE_LIMIT}."),
        ));
    }
    Ok(value)
}

pub fn page_start(value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(
            "start",
            format!("Invalid start: {value}. Must be non-negative."),
        ));
    }
    Ok(value)
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn iso_date<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ValidationError::new(
            field,
            format!("Invalid {field}: '{value}'. Expected a date in YYYY-MM-DD format."),
        )
    })?;
    Ok(value)
}

/// Identifiers that end up as a URL path segment, such as comment UUIDs.
pub fn uuid(field: &str, label: &str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        ValidationError::new(
            field,
            format!("Invalid {label}: '{value}'. Must be a UUID."),
        )
    })
}
