use std::fmt;

/// Product formats a listing can be offered in.
///
/// The set is closed: every `PriceMapping` is keyed by exactly these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookFormat {
    Paperback,
    Hardcover,
    Kindle,
    Audiobook,
}

impl BookFormat {
    /// All formats in column order.
    pub const ALL: [BookFormat; 4] = [
        BookFormat::Paperback,
        BookFormat::Hardcover,
        BookFormat::Kindle,
        BookFormat::Audiobook,
    ];

    /// Lowercase label as it is searched for in page text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Paperback => "paperback",
            Self::Hardcover => "hardcover",
            Self::Kindle => "kindle",
            Self::Audiobook => "audiobook",
        }
    }

    /// Human readable name used in output column headers.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Paperback => "Paperback",
            Self::Hardcover => "Hardcover",
            Self::Kindle => "Kindle",
            Self::Audiobook => "Audiobook",
        }
    }

    /// True when `text` (any case) mentions this format's label.
    pub fn is_mentioned_in(self, text: &str) -> bool {
        text.to_lowercase().contains(self.label())
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
