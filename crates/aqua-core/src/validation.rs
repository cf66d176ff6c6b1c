//! # Validation Module
//!
//! Input validation utilities for AquaStore.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront UI                                                │
//! │  ├── <input type="number" min="1"> on quantity fields                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine commands (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: quantity range, catalog entries, search input        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart invariants                                              │
//! │  └── One line per product, quantity ≥ 1                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted search query.
pub const MAX_SEARCH_LEN: usize = 100;

/// Longest accepted product title.
pub const MAX_TITLE_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (lists everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed, lowercased query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_lowercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a positive line quantity and narrows it to the line's type.
///
/// Callers treat `qty <= 0` as "remove the line" before reaching here, so
/// this only guards the representable range.
///
/// ## Example
/// ```rust
/// use aqua_core::validation::validate_quantity;
///
/// assert_eq!(validate_quantity(3).unwrap(), 3);
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(i64::MAX).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    u32::try_from(qty).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: u32::MAX as i64,
    })
}

/// Validates a conversion rate in basis points.
///
/// ## Rules
/// - Must be positive; a zero rate would make every order free
pub fn validate_conversion_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps == 0 {
        return Err(ValidationError::MustBePositive {
            field: "conversion_rate_bps".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a catalog entry before it is offered for sale.
///
/// ## Rules
/// - Title required (see [`validate_title`])
/// - Fiat and token prices must both be positive
/// - Rating at most 5.0 stars
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_title(&product.title)?;

    if product.price_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if product.price_token <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "token price".to_string(),
        });
    }

    if product.rating_tenths > 50 {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 0,
            max: 50,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
