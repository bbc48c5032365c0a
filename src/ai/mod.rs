pub mod search;
pub mod weights;

pub use search::{AlphaBetaSelector, SearchReport, Searcher, select_move};
pub use weights::{DEFAULT_WEIGHTS, WeightTable};
