use std::io::Read;

use anyhow::{Context, Result};
use bon::Builder;

use crate::parse::Tool;

/// One row of a dbCAN-style overview table: a gene, the raw calls of the
/// three tools already parsed down to category codes, and how many tools
/// called the gene at all.
#[derive(Debug, Clone, Builder)]
pub struct GeneRecord {
    pub gene_id: String,
    pub hmmer: Vec<String>,
    pub dbcan_sub: Vec<String>,
    pub diamond: Vec<String>,
    pub tool_count: u32,
}

impl GeneRecord {
    /// Whether enough tools called this gene for consensus to be meaningful.
    pub fn has_consensus_support(&self) -> bool {
        self.tool_count >= 2
    }
}

/// Reader over one species' tab-separated annotation table.
///
/// The required columns are located by header name, so column order in the
/// file does not matter. A missing required column is a fatal error.
#[derive(Debug)]
pub struct ResultTable<R: Read> {
    reader: csv::Reader<R>,
    gene_id: usize,
    hmmer: usize,
    dbcan_sub: usize,
    diamond: usize,
    tool_count: usize,
}

/// Header of the column counting how many tools called each gene.
const TOOL_COUNT_COLUMN: &str = "#ofTools";

impl<R: Read> ResultTable<R> {
    pub fn new(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(input);
        let headers = reader.headers().context("reading header row")?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .with_context(|| format!("required column {name:?} not found"))
        };
        Ok(Self {
            gene_id: column("Gene ID")?,
            hmmer: column(Tool::Hmmer.column())?,
            dbcan_sub: column(Tool::DbcanSub.column())?,
            diamond: column(Tool::Diamond.column())?,
            tool_count: column(TOOL_COUNT_COLUMN)?,
            reader,
        })
    }

    /// Reads and parses every data row, one `GeneRecord` per gene.
    pub fn records(&mut self) -> impl Iterator<Item = Result<GeneRecord>> + '_ {
        let (gene_id, hmmer, dbcan_sub, diamond, tool_count) = (
            self.gene_id,
            self.hmmer,
            self.dbcan_sub,
            self.diamond,
            self.tool_count,
        );
        self.reader.records().map(move |row| {
            let row = row.context("reading table row")?;
            let field = |index: usize| row.get(index).unwrap_or("");
            let tools: u32 = field(tool_count).trim().parse().with_context(|| {
                format!(
                    "invalid {TOOL_COUNT_COLUMN} value {:?} for gene {:?}",
                    field(tool_count),
                    field(gene_id)
                )
            })?;
            Ok(GeneRecord::builder()
                .gene_id(field(gene_id).to_string())
                .hmmer(Tool::Hmmer.parse_result(field(hmmer)))
                .dbcan_sub(Tool::DbcanSub.parse_result(field(dbcan_sub)))
                .diamond(Tool::Diamond.parse_result(field(diamond)))
                .tool_count(tools)
                .build())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "Gene ID\tHMMER\tdbCAN_sub\tDIAMOND\t#ofTools\n\
                         g1\tGH13+GT2\tGH13_e1\tGH27\t3\n\
                         g2\tN\tN\tCE1\t1\n";

    #[test]
    fn test_rows_parse_to_gene_records() {
        let mut table = ResultTable::new(TABLE.as_bytes()).unwrap();
        let records: Vec<GeneRecord> = table.records().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].gene_id, "g1");
        assert_eq!(records[0].hmmer, vec!["GH", "GT"]);
        assert_eq!(records[0].dbcan_sub, vec!["GH"]);
        assert_eq!(records[0].diamond, vec!["GH"]);
        assert!(records[0].has_consensus_support());
        assert!(records[1].hmmer.is_empty());
        assert!(!records[1].has_consensus_support());
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let shuffled = "#ofTools\tDIAMOND\tGene ID\tdbCAN_sub\tHMMER\n\
                        2\tPL9\tg1\tN\tPL9\n";
        let mut table = ResultTable::new(shuffled.as_bytes()).unwrap();
        let records: Vec<GeneRecord> = table.records().collect::<Result<_>>().unwrap();
        assert_eq!(records[0].gene_id, "g1");
        assert_eq!(records[0].hmmer, vec!["PL"]);
        assert_eq!(records[0].diamond, vec!["PL"]);
        assert_eq!(records[0].tool_count, 2);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let headers_only = "Gene ID\tHMMER\tDIAMOND\t#ofTools\n";
        let err = ResultTable::new(headers_only.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("dbCAN_sub"));
    }

    #[test]
    fn test_non_numeric_tool_count_is_fatal() {
        let bad = "Gene ID\tHMMER\tdbCAN_sub\tDIAMOND\t#ofTools\n\
                   g1\tGH1\tN\tN\tmany\n";
        let mut table = ResultTable::new(bad.as_bytes()).unwrap();
        let result: Result<Vec<GeneRecord>> = table.records().collect();
        assert!(result.is_err());
    }
}
