use std::collections::HashMap;
use std::io::Read;

use anyhow::Result;
use log::debug;

use crate::consensus::decide_family;
use crate::input::ResultTable;

/// The six top-level CAZyme categories, in fixed output order.
pub const CATEGORIES: [&str; 6] = ["AA", "CBM", "CE", "GH", "GT", "PL"];

/// Leading alphabetic run of a family label, i.e. its top-level category.
///
/// Labels come out of the tool-result parser, which only ever emits
/// alphabetic-prefixed codes, so this is total on pipeline output.
pub fn category_of(label: &str) -> &str {
    let end = label
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(label.len());
    &label[..end]
}

/// Family and category counters for one species (one input file).
///
/// Every known category is pre-seeded to zero so a species without hits in
/// a category still reports a 0 row in the aggregated output.
#[derive(Debug)]
pub struct SpeciesStatistics {
    pub families: HashMap<String, u64>,
    pub categories: HashMap<String, u64>,
}

impl SpeciesStatistics {
    pub fn new() -> Self {
        let categories = CATEGORIES.iter().map(|c| (c.to_string(), 0)).collect();
        Self {
            families: HashMap::new(),
            categories,
        }
    }

    /// Runs consensus over every gene in `table` and tallies the calls.
    ///
    /// Genes called by fewer than two tools carry too little evidence and
    /// are skipped without touching any counter.
    pub fn collect<R: Read>(table: &mut ResultTable<R>) -> Result<Self> {
        let mut stats = Self::new();
        for record in table.records() {
            let record = record?;
            if !record.has_consensus_support() {
                continue;
            }
            let label = decide_family(&record.hmmer, &record.dbcan_sub, &record.diamond);
            debug!("{}: consensus {}", record.gene_id, label);
            stats.record(&label);
        }
        Ok(stats)
    }

    /// Tallies one consensus call into the family and category counters.
    pub fn record(&mut self, label: &str) {
        *self.families.entry(label.to_string()).or_insert(0) += 1;
        *self
            .categories
            .entry(category_of(label).to_string())
            .or_insert(0) += 1;
    }
}

impl Default for SpeciesStatistics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_of_is_leading_alphabetic_run() {
        assert_eq!(category_of("GH"), "GH");
        assert_eq!(category_of("GH13"), "GH");
        assert_eq!(category_of("CBM50"), "CBM");
    }

    #[test]
    fn test_categories_pre_seeded_to_zero() {
        let stats = SpeciesStatistics::new();
        assert!(stats.families.is_empty());
        assert_eq!(stats.categories.len(), CATEGORIES.len());
        for category in CATEGORIES {
            assert_eq!(stats.categories[category], 0);
        }
    }

    #[test]
    fn test_record_updates_both_counters() {
        let mut stats = SpeciesStatistics::new();
        stats.record("GH");
        stats.record("GH");
        stats.record("PL");
        assert_eq!(stats.families["GH"], 2);
        assert_eq!(stats.families["PL"], 1);
        assert_eq!(stats.categories["GH"], 2);
        assert_eq!(stats.categories["PL"], 1);
        assert_eq!(stats.categories["AA"], 0);
    }
}
