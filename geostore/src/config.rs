//! Index strategy configuration.

use std::fmt::{self, Display};

use crate::errors::{ErrorKind, GeoError, GeoResult};

/// Which index strategy to build, with its level parameters.
///
/// With the `serde` feature the strategy reads from and writes to a tagged
/// map, e.g. `{"kind": "flat", "min_level": 10, "max_level": 12}`.
///
/// # Examples
///
/// ```rust
/// use geostore::config::IndexStrategy;
///
/// let strategy = IndexStrategy::Flat { min_level: 10, max_level: 12 };
/// assert!(strategy.validate(30).is_ok());
/// assert!(IndexStrategy::Ordered { storage_level: 31 }.validate(30).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum IndexStrategy {
    /// One entry per point at `storage_level`; coarse search cells become
    /// range scans.
    Ordered { storage_level: u8 },
    /// One entry per point at every level of `[min_level, max_level]`; every
    /// search cell is an exact lookup.
    Flat { min_level: u8, max_level: u8 },
}

impl IndexStrategy {
    /// Checks the levels against a geometry whose finest level is `max_level`.
    ///
    /// # Errors
    /// Returns `InvalidLevel` for an inverted range or a level finer than
    /// `max_level`.
    pub fn validate(&self, max_level: u8) -> GeoResult<()> {
        match *self {
            IndexStrategy::Ordered { storage_level } => check_level("storage", storage_level, max_level),
            IndexStrategy::Flat {
                min_level,
                max_level: top,
            } => {
                if min_level > top {
                    log::error!("Minimum level {} is greater than maximum level {}", min_level, top);
                    return Err(GeoError::new(
                        &format!("Minimum level {} is greater than maximum level {}", min_level, top),
                        ErrorKind::InvalidLevel,
                    ));
                }
                check_level("maximum", top, max_level)
            }
        }
    }

    /// Number of entries one point produces.
    pub fn entries_per_point(&self) -> usize {
        match *self {
            IndexStrategy::Ordered { .. } => 1,
            IndexStrategy::Flat { min_level, max_level } => {
                usize::from(max_level.saturating_sub(min_level)) + 1
            }
        }
    }
}

fn check_level(name: &str, level: u8, max_level: u8) -> GeoResult<()> {
    if level > max_level {
        log::error!("The {} level {} exceeds the finest level {}", name, level, max_level);
        return Err(GeoError::new(
            &format!("The {} level {} exceeds the finest level {}", name, level, max_level),
            ErrorKind::InvalidLevel,
        ));
    }
    Ok(())
}

impl Display for IndexStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexStrategy::Ordered { storage_level } => write!(f, "ordered(level={})", storage_level),
            IndexStrategy::Flat { min_level, max_level } => {
                write!(f, "flat(levels={}..={})", min_level, max_level)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ordered() {
        assert!(IndexStrategy::Ordered { storage_level: 0 }.validate(30).is_ok());
        assert!(IndexStrategy::Ordered { storage_level: 30 }.validate(30).is_ok());
        let err = IndexStrategy::Ordered { storage_level: 31 }.validate(30).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidLevel);
    }

    #[test]
    fn test_validate_flat() {
        assert!(IndexStrategy::Flat { min_level: 12, max_level: 12 }.validate(30).is_ok());
        let inverted = IndexStrategy::Flat { min_level: 12, max_level: 10 }.validate(30);
        assert_eq!(inverted.unwrap_err().kind(), &ErrorKind::InvalidLevel);
        let too_fine = IndexStrategy::Flat { min_level: 10, max_level: 20 }.validate(16);
        assert_eq!(too_fine.unwrap_err().kind(), &ErrorKind::InvalidLevel);
    }

    #[test]
    fn test_entries_per_point() {
        assert_eq!(IndexStrategy::Ordered { storage_level: 12 }.entries_per_point(), 1);
        assert_eq!(IndexStrategy::Flat { min_level: 10, max_level: 12 }.entries_per_point(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexStrategy::Ordered { storage_level: 12 }.to_string(), "ordered(level=12)");
        assert_eq!(
            IndexStrategy::Flat { min_level: 10, max_level: 12 }.to_string(),
            "flat(levels=10..=12)"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_tagged_form() {
        let strategy: IndexStrategy =
            serde_json::from_str(r#"{"kind":"flat","min_level":10,"max_level":12}"#).unwrap();
        assert_eq!(strategy, IndexStrategy::Flat { min_level: 10, max_level: 12 });

        let json = serde_json::to_string(&IndexStrategy::Ordered { storage_level: 12 }).unwrap();
        assert_eq!(json, r#"{"kind":"ordered","storage_level":12}"#);
    }
}
