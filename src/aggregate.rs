use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use derive_new::new;
use itertools::Itertools;

use crate::stats::{category_of, SpeciesStatistics, CATEGORIES};

/// Fixed name of the aggregated output table.
pub const OUTPUT_FILENAME: &str = "aggregated_family_category_statistics.txt";

/// Family-by-species and category-by-species count tables.
///
/// One species' finished counters are merged in per input file; the column
/// order of the output follows the order species were merged.
#[derive(Debug, new)]
pub struct AggregateTable {
    #[new(default)]
    species: Vec<String>,
    #[new(default)]
    families: HashMap<String, HashMap<String, u64>>,
    #[new(default)]
    categories: HashMap<String, HashMap<String, u64>>,
}

impl AggregateTable {
    /// Merges one species' counters as the next output column.
    pub fn merge(&mut self, species: &str, stats: SpeciesStatistics) {
        for (family, count) in stats.families {
            self.families
                .entry(family)
                .or_default()
                .insert(species.to_string(), count);
        }
        for (category, count) in stats.categories {
            self.categories
                .entry(category)
                .or_default()
                .insert(species.to_string(), count);
        }
        self.species.push(species.to_string());
    }

    /// Writes the family table, the category table, and the per-species
    /// totals row, tab-separated with one column per species.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "Family\t{}", self.species.iter().join("\t"))?;
        for family in self.sorted_families() {
            let counts = self
                .species
                .iter()
                .map(|species| count_in(&self.families, family, species).to_string())
                .join("\t");
            writeln!(w, "{family}\t{counts}")?;
        }
        writeln!(w)?;

        writeln!(w, "Category\t{}", self.species.iter().join("\t"))?;
        for category in CATEGORIES {
            let counts = self
                .species
                .iter()
                .map(|species| count_in(&self.categories, category, species).to_string())
                .join("\t");
            writeln!(w, "{category}\t{counts}")?;
        }
        writeln!(w)?;

        let totals = self
            .species
            .iter()
            .map(|species| {
                CATEGORIES
                    .iter()
                    .map(|category| count_in(&self.categories, category, species))
                    .sum::<u64>()
                    .to_string()
            })
            .join("\t");
        writeln!(w, "Total\t{totals}")?;
        Ok(())
    }

    /// Family rows sorted by category order, then numeric family id. Labels
    /// outside the known categories sort after them, by category name.
    fn sorted_families(&self) -> Vec<&String> {
        self.families
            .keys()
            .sorted_by_key(|family| {
                let category = category_of(family);
                let rank = CATEGORIES
                    .iter()
                    .position(|known| *known == category)
                    .unwrap_or(CATEGORIES.len());
                (rank, category.to_string(), family_id(family))
            })
            .collect()
    }
}

fn count_in(table: &HashMap<String, HashMap<String, u64>>, label: &str, species: &str) -> u64 {
    table
        .get(label)
        .and_then(|by_species| by_species.get(species))
        .copied()
        .unwrap_or(0)
}

/// Numeric family id of a label, 0 for bare category codes.
fn family_id(label: &str) -> u64 {
    let digits: String = label
        .chars()
        .skip_while(|c| c.is_ascii_alphabetic())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ResultTable;
    use crate::stats::SpeciesStatistics;

    fn stats_with(labels: &[&str]) -> SpeciesStatistics {
        let mut stats = SpeciesStatistics::new();
        for label in labels {
            stats.record(label);
        }
        stats
    }

    #[test]
    fn test_family_rows_follow_category_order() {
        let mut aggregate = AggregateTable::new();
        aggregate.merge("s1", stats_with(&["PL", "AA", "GH", "CE"]));
        let rows = aggregate.sorted_families();
        assert_eq!(rows, ["AA", "CE", "GH", "PL"]);
    }

    #[test]
    fn test_missing_species_counts_render_as_zero() {
        let mut aggregate = AggregateTable::new();
        aggregate.merge("s1", stats_with(&["GH"]));
        aggregate.merge("s2", stats_with(&["CE", "CE"]));
        let mut out = Vec::new();
        aggregate.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("GH\t1\t0\n"));
        assert!(text.contains("CE\t0\t2\n"));
        assert!(text.contains("Total\t1\t2\n"));
    }

    #[test]
    fn test_empty_aggregate_still_writes_all_sections() {
        let aggregate = AggregateTable::new();
        let mut out = Vec::new();
        aggregate.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Family\t\n"));
        assert!(text.contains("Category\t\n"));
        assert!(text.contains("\nAA\t\n"));
        assert!(text.ends_with("Total\t\n"));
    }

    #[test]
    fn test_single_unanimous_gene_end_to_end() {
        let table = "Gene ID\tHMMER\tdbCAN_sub\tDIAMOND\t#ofTools\n\
                     g1\tGT5\tGT5_e1\tGT5\t3\n";
        let mut reader = ResultTable::new(table.as_bytes()).unwrap();
        let stats = SpeciesStatistics::collect(&mut reader).unwrap();
        let mut aggregate = AggregateTable::new();
        aggregate.merge("Ecoli.sample1", stats);

        let mut out = Vec::new();
        aggregate.write_to(&mut out).unwrap();
        let expected = "Family\tEcoli.sample1\n\
                        GT\t1\n\
                        \n\
                        Category\tEcoli.sample1\n\
                        AA\t0\n\
                        CBM\t0\n\
                        CE\t0\n\
                        GH\t0\n\
                        GT\t1\n\
                        PL\t0\n\
                        \n\
                        Total\t1\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_low_tool_count_gene_is_excluded() {
        let table = "Gene ID\tHMMER\tdbCAN_sub\tDIAMOND\t#ofTools\n\
                     g1\tGT5\tGT5_e1\tGT5\t3\n\
                     g2\tN\tN\tGH1\t1\n";
        let mut reader = ResultTable::new(table.as_bytes()).unwrap();
        let stats = SpeciesStatistics::collect(&mut reader).unwrap();
        assert_eq!(stats.families.len(), 1);
        assert_eq!(stats.families["GT"], 1);
        assert_eq!(stats.categories["GH"], 0);
    }
}
