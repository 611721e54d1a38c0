pub mod boundary;
pub mod offsets;
pub mod overlay;
pub mod rank;

pub use boundary::{decode, decode_batch};
pub use offsets::OffsetTable;
pub use overlay::{Customization, TagOverlay};
pub use rank::{BoundaryRule, MergeReport, RankMerger};
