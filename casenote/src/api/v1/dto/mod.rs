pub mod cases;
pub mod interactions;
pub mod notes;

pub use cases::{
    CaseResponse, CreateCaseRequest, ListCasesQuery, ListCasesResponse, UpdateCaseRequest,
};
pub use interactions::{
    CreateInteractionRequest, InteractionResponse, ListInteractionsResponse,
};
pub use notes::{CreateNoteRequest, ListNotesResponse, NoteResponse, UpdateNoteRequest};
