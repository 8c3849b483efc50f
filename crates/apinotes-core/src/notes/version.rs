use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ApiNotesError;

/// A `major[.minor[.patch]]` version number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionTuple {
    pub major: u32,
    pub minor: Option<u32>,
    pub patch: Option<u32>,
}

impl VersionTuple {
    pub fn new(major: u32, minor: Option<u32>) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Whether a notes block written for `self` applies when targeting `target`.
    ///
    /// Components missing from `self` match anything.
    pub fn matches(&self, target: &VersionTuple) -> bool {
        if self.major != target.major {
            return false;
        }
        match (self.minor, target.minor) {
            (Some(a), Some(b)) if a != b => return false,
            (Some(_), None) => return false,
            _ => {}
        }
        match (self.patch, target.patch) {
            (Some(a), Some(b)) => a == b,
            (Some(_), None) => false,
            _ => true,
        }
    }
}

impl FromStr for VersionTuple {
    type Err = ApiNotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiNotesError::InvalidVersion(s.to_string());
        let mut parts = s.trim().split('.');

        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let mut next = || -> Result<Option<u32>, ApiNotesError> {
            parts
                .next()
                .map(|p| p.parse::<u32>().map_err(|_| invalid()))
                .transpose()
        };
        let minor = next()?;
        let patch = next()?;
        if next()?.is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
            if let Some(patch) = self.patch {
                write!(f, ".{}", patch)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("5".parse::<VersionTuple>().unwrap(), VersionTuple::new(5, None));
        assert_eq!(
            "4.2".parse::<VersionTuple>().unwrap(),
            VersionTuple::new(4, Some(2))
        );
        let full = "5.9.1".parse::<VersionTuple>().unwrap();
        assert_eq!(full.patch, Some(1));
        assert_eq!(full.to_string(), "5.9.1");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<VersionTuple>().is_err());
        assert!("five".parse::<VersionTuple>().is_err());
        assert!("1.2.3.4".parse::<VersionTuple>().is_err());
        assert!("1.x".parse::<VersionTuple>().is_err());
    }

    #[test]
    fn test_matches() {
        let four = VersionTuple::new(4, None);
        let four_two = VersionTuple::new(4, Some(2));

        assert!(four.matches(&four_two));
        assert!(four_two.matches(&four_two));
        assert!(!four_two.matches(&four));
        assert!(!four.matches(&VersionTuple::new(5, None)));
    }
}
