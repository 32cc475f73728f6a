//! Collation element generation (UTS #10 S2).

use super::derived;
use super::element::CollationElement;
use super::table::CollationTable;
use super::variable::s2_3;
use super::Settings;
use crate::props::ccc;

/// Appends the collation elements for `cps`, which must already be in NFD.
///
/// Nonstarters taken into a discontiguous match are moved forward inside
/// `cps`, so the slice is left reordered. With `variable` unset, the batches
/// skip variable weighting; derived Hangul elements use this, since their
/// caller weights the whole batch afterwards.
pub(crate) fn s2(
    cps: &mut [u32],
    table: &CollationTable,
    settings: &Settings,
    ces: &mut Vec<CollationElement>,
    variable: bool,
) {
    let is_variable = |l1: u32| table.is_variable(l1);
    let mut after_variable = false;
    let mut first = 0;

    while first < cps.len() {
        // S2.1
        let mut collation = table.trie().longest_match(&cps[first..]);

        if !collation.matched {
            // S2.2
            let start = ces.len();
            let implicit_pair = derived::derived_elements(cps[first], table, settings, ces);
            if variable {
                after_variable = s2_3(
                    &mut ces[start..],
                    settings,
                    is_variable,
                    after_variable,
                    implicit_pair,
                );
            }
            first += 1;
            continue;
        }
        first += collation.size;

        // S2.1.1 - S2.1.3
        if !collation.leaf {
            let nonstarter_last = cps[first..]
                .iter()
                .position(|&cp| ccc(cp) == 0)
                .map_or(cps.len(), |offset| first + offset);

            // Highest combining class among the nonstarters passed over so far
            let mut skipped_ccc: Option<u8> = None;
            let mut i = first;

            while i < nonstarter_last && !collation.leaf {
                let cp = cps[i];
                let cp_ccc = ccc(cp);
                let unblocked = skipped_ccc.map_or(true, |skipped| skipped < cp_ccc);

                if unblocked {
                    let extended = table.trie().extend_subsequence(collation, cp);
                    if extended.matched && collation.size < extended.size {
                        // Move the accepted nonstarter up against the match
                        cps[first..=i].rotate_right(1);
                        first += 1;
                        i += 1;
                        collation = extended;
                        continue;
                    }
                }

                skipped_ccc = Some(skipped_ccc.map_or(cp_ccc, |skipped| skipped.max(cp_ccc)));
                i += 1;
            }
        }

        // S2.4
        let start = ces.len();
        ces.extend_from_slice(table.trie().elements(collation));
        if variable {
            after_variable = s2_3(&mut ces[start..], settings, is_variable, after_variable, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collate::{CollationOptions, CollationStrength};

    const TABLE: &str = "
        0061 ; [.2100.0020.0002] # a
        0062 ; [.2110.0020.0002] # b
        0301 ; [.0000.0024.0002] # acute
        0323 ; [.0000.0042.0002] # dot below
        0061 0301 ; [.2101.0020.0002] # a-acute
        1100 ; [.3C00.0020.0002]
        1161 ; [.3C50.0020.0002]
    ";

    fn elements(cps: &[u32]) -> Vec<CollationElement> {
        let table = CollationTable::from_allkeys(TABLE).unwrap();
        let settings = CollationOptions::default().resolve(table.defaults());
        let mut cps = cps.to_vec();
        let mut ces = Vec::new();
        s2(&mut cps, &table, &settings, &mut ces, true);
        ces
    }

    #[test]
    fn contiguous_contraction() {
        let ces = elements(&[0x61, 0x301, 0x62]);
        let primaries: Vec<u32> = ces.iter().map(|ce| ce.l1).collect();
        assert_eq!(primaries, vec![0x2101, 0x2110]);
    }

    #[test]
    fn discontiguous_contraction() {
        // The dot below (ccc 220) does not block the acute (ccc 230)
        let ces = elements(&[0x61, 0x323, 0x301]);
        assert_eq!(ces.len(), 2);
        assert_eq!(ces[0].l1, 0x2101);
        assert_eq!(ces[1].l2, 0x42);
    }

    #[test]
    fn blocked_nonstarter() {
        // The acute is blocked by the grave, which shares its combining class
        let ces = elements(&[0x61, 0x300, 0x301]);
        assert_eq!(ces[0].l1, 0x2100);
    }

    #[test]
    fn hangul_uses_jamo() {
        let table = CollationTable::from_allkeys(TABLE).unwrap();
        let options = CollationOptions::strength(CollationStrength::Tertiary);

        let syllable = table.collation_elements(&[0xAC00], &options);
        let jamo = table.collation_elements(&[0x1100, 0x1161], &options);
        assert_eq!(syllable, jamo);
        assert_eq!(syllable[0].l1, 0x3C00);
    }

    #[test]
    fn missing_code_points_get_implicit_pairs() {
        let ces = elements(&[0x4E00]);
        assert_eq!(ces.len(), 2);
        assert_eq!(ces[0].l1, 0xFB40);
        assert_eq!(ces[1].l1, 0xCE00);
    }
}
