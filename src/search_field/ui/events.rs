use crate::search_field::domain::models::{Candidate, LookupResponse, NavKey};

#[derive(Clone, Debug)]
pub enum Message {
    // Input events
    TextInput(String),
    KeyDown(NavKey),
    Focus,
    Blur,

    // Pointer events
    CandidatePressed(Candidate),   // pointer went down on a row
    CandidateActivated(Candidate), // click or tap completed on a row
    PressCancelled,                // pointer released away from the pressed row

    // Timer events
    DebounceElapsed,
    BlurGraceElapsed,

    // Async events
    LookupCompleted(LookupResponse),
}
