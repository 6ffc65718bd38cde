// Where the pairs to analyze come from
pub mod pair_list;

pub use pair_list::{parse_pairs, FilePairSource, PairListError, PairSource};
