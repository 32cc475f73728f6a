//! Unicode text layout primitives: the bidirectional algorithm (UAX #9) for
//! display order, and the collation algorithm (UTS #10) for sort keys and
//! comparison.
//!
//! Both are pure functions of their input. Property data is read from
//! process-wide tables that are built once, on first use.

macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: OnceCell<Regex> = OnceCell::new();
        RE.get_or_init(|| Regex::new($re).unwrap())
    }};
}

pub mod bidi;
pub mod collate;
mod error;
pub mod hangul;
pub mod props;

pub use bidi::{
    bidirectional_subranges, bidirectional_subranges_with, bidirectional_transform,
    bidirectional_transform_with, embedding_levels, paragraph_embedding_level, reorder_str,
    BidiSubrange, BidiSubranges, LineBreakKind,
};
pub use collate::{
    collate, collate_str, collation_sort_key, compare_sort_keys, sort_key_str, CaseFirst,
    CaseLevel, CollationElement, CollationOptions, CollationStrength, CollationTable,
    L2WeightOrder, TextSortKey, VariableWeighting,
};
pub use error::TableError;
