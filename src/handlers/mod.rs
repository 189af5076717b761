// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (admin or superadmin JWT) → Elevated (superadmin JWT)
//
// Authentication and role checks run as route layers (see `crate::app`), so a
// handler only ever sees requests that already passed its tier's gates.
pub mod public;    // Tier 1: No authentication required (/, /auth/*, /articles, ...)
pub mod protected; // Tier 2: admin | superadmin (/admin/*)
pub mod elevated;  // Tier 3: superadmin only (/admin/admins*)

use crate::error::ApiError;

/// Path ids must be positive integers.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request("invalid id")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for bad in ["0", "-1", "abc", "", "1.5"] {
            assert_eq!(parse_id(bad).unwrap_err().message(), "invalid id");
        }
    }
}
