pub mod search_field;
pub mod settings;
pub mod telemetry;

pub use search_field::{
    Candidate, DirectoryLookup, FieldConfig, FieldState, LookupError, LookupProvider,
    LookupResult, NavKey, SearchField, sample_directory, terminal::InteractiveField,
};
pub use settings::{FieldSettings, SettingsManager};
