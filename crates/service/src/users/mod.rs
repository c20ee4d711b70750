//! Users module: the application service in front of the `models::user` store.
//!
//! `UserService` is the seam the web layer depends on. `SeaOrmUserService`
//! talks to the database; `memory::InMemoryUserService` keeps rows in process.

pub mod memory;
pub mod seaorm;
pub mod service;

pub use memory::InMemoryUserService;
pub use seaorm::SeaOrmUserService;
pub use service::UserService;
