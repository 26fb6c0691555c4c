//! Point-in-time snapshot of per-city check-in counts.
//!
//! [`CheckInCounts`] is the value returned by
//! [`Aggregator::snapshot`](crate::aggregator::Aggregator::snapshot). It is an
//! immutable, ordered mapping from city name to the number of check-ins
//! recorded for that city. Once returned, a snapshot is a plain value: it never
//! changes when the aggregator it was taken from keeps counting.
//!
//! Keys are kept in a [`BTreeMap`] so that iteration order, [`Display`] output
//! and equality are deterministic regardless of which strategy produced the
//! snapshot.
//!
//! # Serde
//!
//! With the `serde` feature enabled, `CheckInCounts` serializes as a plain
//! string-to-integer map:
//!
//! ```toml
//! [dependencies]
//! presenze = { version = "0.3", features = ["serde"] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

/// An immutable, point-in-time mapping from city name to check-in count.
///
/// Snapshots are cheap values: cloning one clones the underlying map, and two
/// snapshots compare equal exactly when they hold the same counts for the same
/// cities.
///
/// # Examples
///
/// ```rust
/// use presenze::counts::CheckInCounts;
///
/// let counts: CheckInCounts = [("Cairo".to_string(), 3), ("Auckland".to_string(), 5)]
///     .into_iter()
///     .collect();
///
/// assert_eq!(counts.get("Cairo"), 3);
/// assert_eq!(counts.get("Lima"), 0);
/// assert_eq!(counts.total(), 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CheckInCounts {
    counts: BTreeMap<String, u64>,
}

impl CheckInCounts {
    /// Creates an empty snapshot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use presenze::counts::CheckInCounts;
    ///
    /// let counts = CheckInCounts::new();
    /// assert!(counts.is_empty());
    /// assert_eq!(counts.total(), 0);
    /// ```
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Returns the count recorded for `city`, or `0` if the city never
    /// checked in.
    pub fn get(&self, city: &str) -> u64 {
        self.counts.get(city).copied().unwrap_or(0)
    }

    /// Returns the sum of all per-city counts.
    ///
    /// After a workload of `P` producers each issuing `E` increments has been
    /// joined, this equals `P * E` for every correct strategy.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Returns the number of distinct cities with at least one check-in.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no check-in has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(city, count)` pairs in ascending city order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(city, count)| (city.as_str(), *count))
    }

    /// Returns cities ordered by descending check-in count.
    ///
    /// Ties are broken by ascending city name, so the ranking is total and
    /// deterministic. This is the "ranking computation" a reader performs on a
    /// snapshot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use presenze::counts::CheckInCounts;
    ///
    /// let counts: CheckInCounts = [
    ///     ("Cairo".to_string(), 3),
    ///     ("Auckland".to_string(), 5),
    ///     ("Lima".to_string(), 3),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let ranking = counts.ranking();
    /// assert_eq!(ranking[0], ("Auckland", 5));
    /// assert_eq!(ranking[1], ("Cairo", 3));
    /// assert_eq!(ranking[2], ("Lima", 3));
    /// ```
    pub fn ranking(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl Display for CheckInCounts {
    /// Formats the snapshot as `{city: count, city: count, ...}` in ascending
    /// city order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (city, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{city}: {count}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, u64)> for CheckInCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<String, u64>> for CheckInCounts {
    fn from(map: HashMap<String, u64>) -> Self {
        map.into_iter().collect()
    }
}

impl From<&HashMap<String, u64>> for CheckInCounts {
    fn from(map: &HashMap<String, u64>) -> Self {
        map.iter().map(|(city, count)| (city.clone(), *count)).collect()
    }
}

impl From<BTreeMap<String, u64>> for CheckInCounts {
    fn from(counts: BTreeMap<String, u64>) -> Self {
        Self { counts }
    }
}

impl<'a> IntoIterator for &'a CheckInCounts {
    type Item = (&'a String, &'a u64);
    type IntoIter = std::collections::btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}
