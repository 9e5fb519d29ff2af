//! Core types for kci-samples

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Logical grouping of a sample record
///
/// `Boot` is never requested from KernelCI directly; it only appears when an
/// override rule rewrites a `lava` descriptor (see [`crate::overrides`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Kernel build artifacts (`build.json`)
    Build,
    /// LAVA test-run logs (`lava-json-*.json`)
    Lava,
    /// Boot logs (`boot-*.json`) from labs without LAVA output
    Boot,
}

impl Category {
    /// Filename prefix for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Build => "build",
            Category::Lava => "lava",
            Category::Boot => "boot",
        }
    }

    /// Name of the sample file for a record of this category
    pub fn file_name(&self, id: &RecordId) -> String {
        format!("{}_{}.json", self.as_str(), id)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(Category::Build),
            "lava" => Ok(Category::Lava),
            "boot" => Ok(Category::Boot),
            other => Err(format!("unknown sample category: {other}")),
        }
    }
}

/// Opaque identifier of a record within one fetch batch
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Create a new RecordId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Batch of download descriptors: record identifier to download URL
pub type Descriptors = HashMap<RecordId, String>;

/// Result of persisting one batch
///
/// Every identifier of the input batch lands in exactly one of the two maps.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Identifier to saved file name (no directory prefix)
    pub saved: HashMap<RecordId, String>,
    /// Identifier to the URL that failed (after any override rewrite)
    pub failed: HashMap<RecordId, String>,
    /// Category each failed identifier was fetched under (after any override)
    pub failed_categories: HashMap<RecordId, Category>,
}

impl PersistOutcome {
    /// Record a sample written to `file_name`
    pub fn record_saved(&mut self, id: RecordId, file_name: String) {
        self.saved.insert(id, file_name);
    }

    /// Record a sample that failed while fetched as `category` from `url`
    pub fn record_failed(&mut self, id: RecordId, category: Category, url: String) {
        self.failed_categories.insert(id.clone(), category);
        self.failed.insert(id, url);
    }

    /// Number of failed samples that were fetched as `category`
    pub fn failed_in(&self, category: Category) -> usize {
        self.failed
            .keys()
            .filter(|id| self.failed_categories.get(*id) == Some(&category))
            .count()
    }

    /// Check that `saved` and `failed` exactly partition the batch
    pub fn is_partition_of(&self, descriptors: &Descriptors) -> bool {
        self.saved.len() + self.failed.len() == descriptors.len()
            && self.saved.keys().all(|id| !self.failed.contains_key(id))
            && descriptors
                .keys()
                .all(|id| self.saved.contains_key(id) || self.failed.contains_key(id))
    }

    /// Total number of records in the outcome
    pub fn len(&self) -> usize {
        self.saved.len() + self.failed.len()
    }

    /// Whether no record was processed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Saved/failed tally for one category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Samples written to disk
    pub saved: usize,
    /// Samples that could not be downloaded or written
    pub failed: usize,
}

/// Per-category counts for one generation run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Lava samples, excluding those rewritten to boot
    pub lavas: CategoryCounts,
    /// Build samples
    pub builds: CategoryCounts,
    /// Boot samples produced by override rules out of the lava batch
    pub boots: CategoryCounts,
}

impl RunSummary {
    /// Tally a run from the lava and build outcomes
    ///
    /// Overrides inject boot entries into the lava batch, so boot counts are
    /// split out of the lava outcome. Saved entries are recognised by their
    /// `boot_` file name prefix, failed ones by the category they were
    /// fetched under.
    pub fn from_outcomes(lavas: &PersistOutcome, builds: &PersistOutcome) -> Self {
        let boot_prefix = format!("{}_", Category::Boot.as_str());

        let saved_boots = lavas
            .saved
            .values()
            .filter(|name| name.starts_with(&boot_prefix))
            .count();
        let failed_boots = lavas.failed_in(Category::Boot);

        Self {
            lavas: CategoryCounts {
                saved: lavas.saved.len() - saved_boots,
                failed: lavas.failed.len() - failed_boots,
            },
            builds: CategoryCounts {
                saved: builds.saved.len(),
                failed: builds.failed.len(),
            },
            boots: CategoryCounts {
                saved: saved_boots,
                failed: failed_boots,
            },
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pairs: &[(&str, &str)]) -> HashMap<RecordId, String> {
        pairs
            .iter()
            .map(|(id, v)| (RecordId::from(*id), v.to_string()))
            .collect()
    }

    #[test]
    fn file_name_uses_category_prefix() {
        let id = RecordId::from(42);
        assert_eq!(Category::Lava.file_name(&id), "lava_42.json");
        assert_eq!(Category::Build.file_name(&id), "build_42.json");
        assert_eq!(Category::Boot.file_name(&id), "boot_42.json");
    }

    #[test]
    fn category_parses_from_its_own_display() {
        for category in [Category::Build, Category::Lava, Category::Boot] {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
        assert!("test".parse::<Category>().is_err());
    }

    #[test]
    fn partition_detects_missing_and_duplicated_ids() {
        let descriptors = ids(&[("1", "http://x/1"), ("2", "http://x/2")]);

        let good = PersistOutcome {
            saved: ids(&[("1", "lava_1.json")]),
            failed: ids(&[("2", "http://x/2")]),
            ..Default::default()
        };
        assert!(good.is_partition_of(&descriptors));

        let missing = PersistOutcome {
            saved: ids(&[("1", "lava_1.json")]),
            ..Default::default()
        };
        assert!(!missing.is_partition_of(&descriptors));

        let duplicated = PersistOutcome {
            saved: ids(&[("1", "lava_1.json")]),
            failed: ids(&[("1", "http://x/1")]),
            ..Default::default()
        };
        assert!(!duplicated.is_partition_of(&descriptors));
    }

    #[test]
    fn summary_splits_boot_entries_out_of_lavas() {
        let mut lavas = PersistOutcome {
            saved: ids(&[("1", "lava_1.json"), ("2", "boot_2.json"), ("3", "boot_3.json")]),
            ..Default::default()
        };
        lavas.record_failed(
            "4".into(),
            Category::Lava,
            "http://storage/lab-a/lava-json-rpi.json".into(),
        );
        lavas.record_failed(
            "5".into(),
            Category::Boot,
            "http://storage/lab-baylibre-seattle/boot-beagle.json?x=1".into(),
        );
        let mut builds = PersistOutcome::default();
        builds.record_saved("7".into(), "build_7.json".into());
        builds.record_failed("8".into(), Category::Build, "http://storage/build.json".into());

        let summary = RunSummary::from_outcomes(&lavas, &builds);
        assert_eq!(summary.lavas, CategoryCounts { saved: 1, failed: 1 });
        assert_eq!(summary.boots, CategoryCounts { saved: 2, failed: 1 });
        assert_eq!(summary.builds, CategoryCounts { saved: 1, failed: 1 });
    }

    #[test]
    fn failed_boot_is_counted_whatever_its_url_looks_like() {
        let mut lavas = PersistOutcome::default();
        lavas.record_failed("1".into(), Category::Boot, "http://nonlava/result.json".into());
        lavas.record_failed("2".into(), Category::Lava, "http://lab-a/boot-rpi.json".into());

        let summary = RunSummary::from_outcomes(&lavas, &PersistOutcome::default());
        assert_eq!(summary.boots, CategoryCounts { saved: 0, failed: 1 });
        assert_eq!(summary.lavas, CategoryCounts { saved: 0, failed: 1 });
    }

    #[test]
    fn summary_of_empty_outcomes_is_zero() {
        let summary = RunSummary::from_outcomes(&PersistOutcome::default(), &PersistOutcome::default());
        assert_eq!(summary, RunSummary::default());
    }
}
