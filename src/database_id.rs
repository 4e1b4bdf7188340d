//! Database ID type definition.

/// Alias for the integer type used for mapping to database row IDs.
pub type DatabaseId = i64;
