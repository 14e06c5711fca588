pub mod cases;
pub(crate) mod health;
pub mod interactions;
pub mod notes;
pub mod summary;

pub use health::health_check;
