mod case;
mod interaction;
mod note;

pub use case::{Case, CaseStatus, Gender};
pub use interaction::Interaction;
pub use note::Note;
