use crate::search_field::domain::models::{Candidate, LookupRequest};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    None,
    ScheduleLookup(u64), // debounce delay in milliseconds
    ExecuteLookup(LookupRequest),
    ScheduleClose(u64), // blur grace delay in milliseconds
    CancelClose,
    Commit(Candidate),
}
