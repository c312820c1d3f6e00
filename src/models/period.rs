use chrono::{Datelike, NaiveDate};

/// Which slice of a user's history the summary view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "a" => Some(Self::All),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            "yearly" | "year" | "y" => Some(Self::Yearly),
            _ => None,
        }
    }

    pub fn all() -> &'static [Period] {
        &[Self::All, Self::Monthly, Self::Yearly]
    }

    /// Whether a transaction dated `date` falls in this period as seen from `today`.
    /// `Monthly` compares the calendar month only, so the same month of any year matches.
    /// `All` matches even when the stored date could not be parsed.
    pub fn contains(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        match (self, date) {
            (Self::All, _) => true,
            (Self::Monthly, Some(d)) => d.month() == today.month(),
            (Self::Yearly, Some(d)) => d.year() == today.year(),
            (_, None) => false,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
