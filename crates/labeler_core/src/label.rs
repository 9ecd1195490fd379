use std::fmt;

/// Reviewer verdict for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Label {
    #[default]
    Unset,
    NotStandard,
    Standard,
}

impl Label {
    /// Parse a stored cell. Empty means unset; spreadsheet float spellings are accepted.
    pub fn from_cell(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => Some(Label::Unset),
            "0" | "0.0" => Some(Label::NotStandard),
            "1" | "1.0" => Some(Label::Standard),
            _ => None,
        }
    }

    pub fn as_cell(self) -> &'static str {
        match self {
            Label::Unset => "",
            Label::NotStandard => "0",
            Label::Standard => "1",
        }
    }

    pub fn is_set(self) -> bool {
        self != Label::Unset
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Unset => write!(f, "unset"),
            Label::NotStandard => write!(f, "not standard"),
            Label::Standard => write!(f, "standard"),
        }
    }
}
