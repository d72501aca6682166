//! cazagg: Consensus CAZyme family calling across annotation tools
//!
//! This library reconciles per-gene CAZyme family predictions from three
//! independent annotation tools (HMMER, dbCAN_sub, DIAMOND) into a single
//! consensus call per gene, and aggregates the calls into per-species
//! family and category count tables.
//!
//! The main components of this library are:
//! - `Tool`: The annotation tools and their result-string encodings
//! - `decide_family`: The majority-vote consensus resolver
//! - `ResultTable`: Reader over one species' tab-separated annotation table
//! - `SpeciesStatistics`: Per-species family and category counters
//! - `AggregateTable`: The species-by-family count tables and their writer

mod aggregate;
mod consensus;
mod input;
mod parse;
mod stats;

pub use aggregate::{AggregateTable, OUTPUT_FILENAME};
pub use consensus::decide_family;
pub use input::{GeneRecord, ResultTable};
pub use parse::Tool;
pub use stats::{category_of, SpeciesStatistics, CATEGORIES};
