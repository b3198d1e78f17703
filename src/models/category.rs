use std::fmt;

/// Categories offered by the shell. The store accepts any category text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Category {
    Salary,
    Rent,
    Grocery,
    Utilities,
    Other,
}

/// Display order for reports; anything not listed sorts after these.
pub const CATEGORY_PRIORITY: [&str; 5] = ["Salary", "Rent", "Utilities", "Grocery", "Other"];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Rent => "Rent",
            Category::Grocery => "Grocery",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn category_rank(category: &str) -> usize {
    CATEGORY_PRIORITY
        .iter()
        .position(|c| *c == category)
        .unwrap_or(CATEGORY_PRIORITY.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_rank_follows_priority_list() {
        assert_eq!(category_rank("Salary"), 0);
        assert_eq!(category_rank("Rent"), 1);
        assert_eq!(category_rank("Utilities"), 2);
        assert_eq!(category_rank("Grocery"), 3);
        assert_eq!(category_rank("Other"), 4);
    }

    #[test]
    fn test_category_rank_unlisted_sorts_last() {
        assert_eq!(category_rank("Travel"), CATEGORY_PRIORITY.len());
        assert_eq!(category_rank("salary"), CATEGORY_PRIORITY.len());
    }
}
