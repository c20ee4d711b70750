//! Service layer exposing user operations on top of the `models` store.
//! - Keeps transaction boundaries out of the web layer.
//! - Reuses entity definitions and store functions from the `models` crate.

pub mod errors;
pub mod users;
#[cfg(test)]
pub mod test_support;
