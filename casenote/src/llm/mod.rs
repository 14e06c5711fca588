mod api;
mod normalize;
pub mod prompts;
mod provider;
mod response;

pub use api::SummaryApiClient;
pub use normalize::{normalize, SUMMARY_HEADER};
pub use prompts::SummaryInput;
pub use provider::{SummaryBackend, SummaryProvider};
pub use response::ProviderResponse;
