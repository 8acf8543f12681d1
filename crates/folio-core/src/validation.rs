//! # Validation Module
//!
//! Input validation for catalog writes and cart quantities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (external)                                         │
//! │  └── Payload decoding, type checks                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (no lock held)                                   │
//! │  ├── Field presence and length                                         │
//! │  └── Price / stock / quantity ranges                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Entity Store (under the write lock)                          │
//! │  └── Existence of referenced users and products                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//! use folio_core::types::ProductInput;
//! use folio_core::validation::validate_product_input;
//!
//! let input = ProductInput::new("  Clean Code ", "Robert C. Martin", Money::from_cents(3999), 60);
//! let input = validate_product_input(input).unwrap();
//! assert_eq!(input.title, "Clean Code");
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Lowest accepted price ($0.01).
pub const MIN_PRICE_CENTS: i64 = 1;

/// Highest accepted price ($10,000.00).
pub const MAX_PRICE_CENTS: i64 = 1_000_000;

/// Highest accepted stock level.
pub const MAX_STOCK: i64 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book title and returns it trimmed.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters after trimming
pub fn validate_title(title: &str) -> ValidationResult<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::required("title"));
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(title.to_string())
}

/// Validates an author name and returns it trimmed.
pub fn validate_author(author: &str) -> ValidationResult<String> {
    let author = author.trim();

    if author.is_empty() {
        return Err(ValidationError::required("author"));
    }

    Ok(author.to_string())
}

/// Validates a description. Empty is fine.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price.
///
/// ## Example
/// ```rust
/// use folio_core::money::Money;
/// use folio_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(4500)).is_ok());
/// assert!(validate_price(Money::zero()).is_err());
/// assert!(validate_price(Money::from_cents(1_000_001)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !(MIN_PRICE_CENTS..=MAX_PRICE_CENTS).contains(&price.cents()) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: MIN_PRICE_CENTS,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// Upper bounds are business rules, enforced by the cart rule chain.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a full product input, returning it with title and author
/// trimmed.
///
/// Checks run in field order; the first failure wins.
pub fn validate_product_input(input: ProductInput) -> ValidationResult<ProductInput> {
    let title = validate_title(&input.title)?;
    let author = validate_author(&input.author)?;
    validate_description(&input.description)?;
    validate_price(input.price)?;
    validate_stock(input.stock)?;

    Ok(ProductInput {
        title,
        author,
        ..input
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
