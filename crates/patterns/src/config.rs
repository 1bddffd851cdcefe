//! Editor configuration.

/// What to do when a trip's stop-times ordered by sequence are not also
/// ordered by time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ChronologyCheck {
    Ignore,
    #[default]
    Warn,
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EditorConfig {
    pub chronology: ChronologyCheck,
    /// Placed between the first and last stop names in derived route names
    pub route_name_separator: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            chronology: ChronologyCheck::default(),
            route_name_separator: " - ".into(),
        }
    }
}
