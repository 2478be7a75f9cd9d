//! Constants for the incremental search field
//!
//! Default field behaviour and terminal layout values live here so the
//! state machine, settings file and CLI agree on the same numbers.

// Field behaviour defaults
/// Minimum trimmed query length (in characters) before a lookup is issued
pub const DEFAULT_MINIMUM_QUERY_LENGTH: usize = 2;

/// Quiet period after the last keystroke before a lookup fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Maximum number of candidates requested from the provider
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Delay between losing focus and closing the candidate list
pub const DEFAULT_BLUR_GRACE_MS: u64 = 200;

// Terminal layout
/// Height of the search input box
pub const SEARCH_INPUT_HEIGHT: u16 = 3;

/// Height of a single candidate row (name line + detail line)
pub const CANDIDATE_ROW_HEIGHT: u16 = 2;

/// Height of the status line at the bottom of the screen
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Input event polling interval in milliseconds
pub const EVENT_POLL_INTERVAL_MS: u64 = 50;

// Empty states
/// Shown under the input when a finished lookup returned nothing
pub const NO_RESULTS_TEXT: &str = "No patients found";

/// Shown while a lookup is in flight and nothing is listed yet
pub const LOADING_TEXT: &str = "Searching...";
