//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates orchestration logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod banner;
pub mod errors;
#[cfg(test)]
pub mod test_support;
pub mod validation;
