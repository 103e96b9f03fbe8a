//! Service layer providing the movie/comment business operations on top of models.
//! - Accessor traits separate business rules from data access.
//! - Reuses entity definitions and validation in the `models` crate.
//! - Reporting queries are assembled with sea-orm's query builder.

pub mod errors;
pub mod movie;
#[cfg(test)]
pub mod test_support;
