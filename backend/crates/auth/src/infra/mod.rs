//! Infrastructure Layer
//!
//! Profile store implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProfileRepository;
pub use postgres::PgProfileRepository;
