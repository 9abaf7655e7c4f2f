//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// License Status
// =============================================================================

/// Status assigned to every newly issued license
pub const STATUS_ISSUED: &str = "issued";

/// License whose leave period has lapsed
pub const STATUS_EXPIRED: &str = "expired";

/// License withdrawn by an administrator
pub const STATUS_REVOKED: &str = "revoked";

// =============================================================================
// Folio
// =============================================================================

/// Prefix shared by every certificate number
pub const FOLIO_PREFIX: &str = "L-";

/// Number of hex characters taken from a random UUID for the folio suffix
pub const FOLIO_SUFFIX_LEN: usize = 8;

/// Maximum folio assignments tried when the store reports a duplicate
pub const MAX_FOLIO_ATTEMPTS: u32 = 3;

// =============================================================================
// Validation
// =============================================================================

/// Patient identifier (RUT) pattern: 7-8 ASCII digits, hyphen, check digit or K
pub const RUT_PATTERN: &str = r"^[0-9]{7,8}-[0-9kK]$";

/// Maximum stored length of patient and doctor identifiers
pub const MAX_IDENTIFIER_LENGTH: u32 = 50;

/// Wire format of `startDate` in responses
pub const DATE_FORMAT: &str = "%Y-%m-%d";
