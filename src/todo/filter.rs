use crate::error::{E2eError, Result};
use std::{fmt, str::FromStr};

/// Navigational filters offered in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Visible text of the filter link
    pub fn link_text(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// XPath of the footer filter link whose text is exactly the filter name.
    /// Other links with the same text elsewhere on the page never match.
    pub fn xpath(&self) -> String {
        format!(
            "//ul[contains(concat(' ', normalize-space(@class), ' '), ' filters ')]//a[normalize-space(.)='{}']",
            self.link_text()
        )
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.link_text())
    }
}

impl FromStr for Filter {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.link_text().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| E2eError::Config(format!("unknown filter '{}' (expected All, Active or Completed)", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_names() {
        assert_eq!("All".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!(" Completed ".parse::<Filter>().unwrap(), Filter::Completed);
        assert!("Done".parse::<Filter>().is_err());
    }

    #[test]
    fn test_filter_xpath_is_scoped_to_filter_list() {
        assert_eq!(
            Filter::Active.xpath(),
            "//ul[contains(concat(' ', normalize-space(@class), ' '), ' filters ')]//a[normalize-space(.)='Active']"
        );
        assert!(Filter::ALL.iter().all(|filter| filter.xpath().starts_with("//ul[")));
    }
}
