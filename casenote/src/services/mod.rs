mod rate_limit;
mod summary;

pub use rate_limit::{Admission, FixedWindowLimiter};
pub use summary::SummaryService;
