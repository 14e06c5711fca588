mod cases;
mod interactions;
mod notes;

pub use cases::CaseRepository;
pub use interactions::InteractionRepository;
pub use notes::NoteRepository;
