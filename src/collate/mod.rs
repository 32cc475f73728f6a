//! Unicode Collation Algorithm (UTS #10): collation elements, sort keys and
//! comparison.

mod derived;
mod element;
mod generate;
mod sort_key;
mod table;
mod trie;
mod variable;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

pub use derived::ImplicitWeights;
pub use element::CollationElement;
pub use sort_key::{compare_sort_keys, TextSortKey};
pub use table::CollationTable;
pub use trie::{CollationTrie, TrieMatch};

//
// Options
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollationStrength {
    Primary,
    Secondary,
    Tertiary,
    Quaternary,
    Identical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableWeighting {
    NonIgnorable,
    Shifted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseFirst {
    Off,
    Upper,
    Lower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseLevel {
    Off,
    On,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum L2WeightOrder {
    Forward,
    Backward,
}

/// Per-call collation settings. Unset fields fall back to the table's
/// declared settings, then to tertiary / off / off / non-ignorable / forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationOptions {
    pub strength: Option<CollationStrength>,
    pub case_first: Option<CaseFirst>,
    pub case_level: Option<CaseLevel>,
    pub weighting: Option<VariableWeighting>,
    pub l2_order: Option<L2WeightOrder>,
}

impl CollationOptions {
    pub fn strength(strength: CollationStrength) -> Self {
        Self {
            strength: Some(strength),
            ..Self::default()
        }
    }

    pub fn shifted(strength: CollationStrength) -> Self {
        Self {
            strength: Some(strength),
            weighting: Some(VariableWeighting::Shifted),
            ..Self::default()
        }
    }

    /// Fills unset fields from `fallback`.
    pub fn or(self, fallback: &CollationOptions) -> Self {
        Self {
            strength: self.strength.or(fallback.strength),
            case_first: self.case_first.or(fallback.case_first),
            case_level: self.case_level.or(fallback.case_level),
            weighting: self.weighting.or(fallback.weighting),
            l2_order: self.l2_order.or(fallback.l2_order),
        }
    }

    pub(crate) fn resolve(&self, table_defaults: &CollationOptions) -> Settings {
        let merged = self.or(table_defaults);
        Settings {
            strength: merged.strength.unwrap_or(CollationStrength::Tertiary),
            case_first: merged.case_first.unwrap_or(CaseFirst::Off),
            case_level: merged.case_level.unwrap_or(CaseLevel::Off),
            weighting: merged.weighting.unwrap_or(VariableWeighting::NonIgnorable),
            l2_order: merged.l2_order.unwrap_or(L2WeightOrder::Forward),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub strength: CollationStrength,
    pub case_first: CaseFirst,
    pub case_level: CaseLevel,
    pub weighting: VariableWeighting,
    pub l2_order: L2WeightOrder,
}

impl Settings {
    pub fn retain_case_bits(&self) -> bool {
        self.case_first != CaseFirst::Off || self.case_level == CaseLevel::On
    }
}

//
// Functions, public
//

pub fn collation_sort_key(
    cps: &[u32],
    table: &CollationTable,
    options: &CollationOptions,
) -> TextSortKey {
    let nfd = nfd(cps);
    nfd_to_sort_key(&nfd, table, options)
}

pub fn collate(
    a: &[u32],
    b: &[u32],
    table: &CollationTable,
    options: &CollationOptions,
) -> Ordering {
    let a_nfd = nfd(a);
    let b_nfd = nfd(b);

    if a_nfd == b_nfd {
        return Ordering::Equal;
    }

    let a_sk = nfd_to_sort_key(&a_nfd, table, options);
    let b_sk = nfd_to_sort_key(&b_nfd, table, options);

    compare_sort_keys(&a_sk, &b_sk)
}

pub fn sort_key_str(s: &str, table: &CollationTable, options: &CollationOptions) -> TextSortKey {
    let nfd: Vec<u32> = s.nfd().map(u32::from).collect();
    nfd_to_sort_key(&nfd, table, options)
}

pub fn collate_str(
    a: &str,
    b: &str,
    table: &CollationTable,
    options: &CollationOptions,
) -> Ordering {
    let a_nfd: Vec<u32> = a.nfd().map(u32::from).collect();
    let b_nfd: Vec<u32> = b.nfd().map(u32::from).collect();

    if a_nfd == b_nfd {
        return Ordering::Equal;
    }

    let a_sk = nfd_to_sort_key(&a_nfd, table, options);
    let b_sk = nfd_to_sort_key(&b_nfd, table, options);

    compare_sort_keys(&a_sk, &b_sk)
}

/// Canonical decomposition of a code point sequence. Surrogate code points are
/// carried through unchanged.
pub fn nfd(cps: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(cps.len());
    let mut pending: Vec<char> = Vec::new();

    for &cp in cps {
        assert!(cp <= 0x10_FFFF, "code point out of range: {cp:#X}");
        match char::from_u32(cp) {
            Some(c) => pending.push(c),
            None => {
                out.extend(pending.drain(..).nfd().map(u32::from));
                out.push(cp);
            }
        }
    }
    out.extend(pending.into_iter().nfd().map(u32::from));

    out
}

//
// Functions, private
//

fn nfd_to_sort_key(nfd: &[u32], table: &CollationTable, options: &CollationOptions) -> TextSortKey {
    let settings = options.resolve(table.defaults());

    let mut cps = nfd.to_vec();
    let mut ces = Vec::with_capacity(cps.len() * 2);
    generate::s2(&mut cps, table, &settings, &mut ces, true);

    sort_key::s3(&ces, &settings, nfd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_precedence() {
        let table_defaults = CollationOptions {
            strength: Some(CollationStrength::Secondary),
            weighting: Some(VariableWeighting::Shifted),
            ..CollationOptions::default()
        };
        let per_call = CollationOptions::strength(CollationStrength::Quaternary);

        let settings = per_call.resolve(&table_defaults);
        assert_eq!(settings.strength, CollationStrength::Quaternary);
        assert_eq!(settings.weighting, VariableWeighting::Shifted);
        assert_eq!(settings.case_first, CaseFirst::Off);
        assert_eq!(settings.l2_order, L2WeightOrder::Forward);
        assert!(!settings.retain_case_bits());
    }

    #[test]
    fn nfd_keeps_surrogates() {
        assert_eq!(nfd(&[0xE1]), vec![0x61, 0x301]);
        assert_eq!(nfd(&[0xE1, 0xD800, 0xE9]), vec![0x61, 0x301, 0xD800, 0x65, 0x301]);
        assert_eq!(nfd(&[]), Vec::<u32>::new());
    }

    #[test]
    #[should_panic(expected = "code point out of range")]
    fn nfd_rejects_out_of_range() {
        nfd(&[0x11_0000]);
    }
}
