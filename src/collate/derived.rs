//! Derived collation elements for code points with no table entry (UTS #10 §10.1).

use serde::{Deserialize, Serialize};

use super::element::{CollationElement, COMMON_L2, COMMON_L3};
use super::generate;
use super::table::CollationTable;
use super::Settings;
use crate::hangul::{decompose_hangul_syllable, hangul_syllable};

/// A script with its own implicit lead weight, as declared by
/// `@implicitweights` lines. BBBB is `(cp - offset) | 0x8000`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicitWeights {
    pub first: u32,
    pub last: u32,
    pub base: u16,
    pub offset: u32,
}

pub(crate) const DEFAULT_IMPLICIT_WEIGHTS: [ImplicitWeights; 5] = [
    // Tangut
    ImplicitWeights {
        first: 0x17000,
        last: 0x187F7,
        base: 0xFB00,
        offset: 0x17000,
    },
    ImplicitWeights {
        first: 0x18800,
        last: 0x18AFF,
        base: 0xFB00,
        offset: 0x17000,
    },
    ImplicitWeights {
        first: 0x18D00,
        last: 0x18D08,
        base: 0xFB00,
        offset: 0x17000,
    },
    // Nushu
    ImplicitWeights {
        first: 0x1B170,
        last: 0x1B2FB,
        base: 0xFB01,
        offset: 0x1B170,
    },
    // Khitan
    ImplicitWeights {
        first: 0x18B00,
        last: 0x18CD5,
        base: 0xFB02,
        offset: 0x18B00,
    },
];

const CORE_HAN_BASE: u32 = 0xFB40;
const OTHER_HAN_BASE: u32 = 0xFB80;
const UNASSIGNED_BASE: u32 = 0xFBC0;

//
// Sparse blocks
//

// Membership sets for blocks that only partly hold unified ideographs. The OR
// of all members rejects most code points before the search.
struct SparseBlock {
    members: &'static [u32],
    or_mask: u32,
}

impl SparseBlock {
    fn contains(&self, cp: u32) -> bool {
        cp & !self.or_mask == 0 && self.members.binary_search(&cp).is_ok()
    }
}

const fn or_all(cps: &[u32]) -> u32 {
    let mut mask = 0;
    let mut i = 0;
    while i < cps.len() {
        mask |= cps[i];
        i += 1;
    }
    mask
}

const CJK_COMPATIBILITY_IDEOGRAPH_MEMBERS: [u32; 12] = [
    0xFA0E, 0xFA0F, 0xFA11, 0xFA13, 0xFA14, 0xFA1F, 0xFA21, 0xFA23, 0xFA24, 0xFA27, 0xFA28,
    0xFA29,
];

const CJK_EXTENSION_D_MEMBERS: [u32; 222] = {
    let mut cps = [0; 222];
    let mut i = 0;
    while i < cps.len() {
        cps[i] = 0x2B740 + i as u32;
        i += 1;
    }
    cps
};

const CJK_COMPATIBILITY_IDEOGRAPHS: SparseBlock = SparseBlock {
    members: &CJK_COMPATIBILITY_IDEOGRAPH_MEMBERS,
    or_mask: or_all(&CJK_COMPATIBILITY_IDEOGRAPH_MEMBERS),
};

const CJK_EXTENSION_D: SparseBlock = SparseBlock {
    members: &CJK_EXTENSION_D_MEMBERS,
    or_mask: or_all(&CJK_EXTENSION_D_MEMBERS),
};

fn core_han(cp: u32) -> bool {
    (0x4E00..=0x9FFF).contains(&cp) || CJK_COMPATIBILITY_IDEOGRAPHS.contains(cp)
}

fn other_han(cp: u32) -> bool {
    matches!(
        cp,
        0x3400..=0x4DBF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2B739
            | 0x2B820..=0x2CEA1
            | 0x2CEB0..=0x2EBE0
            | 0x2EBF0..=0x2EE5D
            | 0x30000..=0x3134A
            | 0x31350..=0x323AF
    ) || CJK_EXTENSION_D.contains(cp)
}

//
// Functions
//

pub(crate) fn implicit_weights(cp: u32, segments: &[ImplicitWeights]) -> [CollationElement; 2] {
    let (aaaa, bbbb) = match segments.iter().find(|s| s.first <= cp && cp <= s.last) {
        Some(segment) => (u32::from(segment.base), cp - segment.offset),
        None if core_han(cp) => (CORE_HAN_BASE + (cp >> 15), cp & 0x7FFF),
        None if other_han(cp) => (OTHER_HAN_BASE + (cp >> 15), cp & 0x7FFF),
        None => (UNASSIGNED_BASE + (cp >> 15), cp & 0x7FFF),
    };

    // The quaternary is set on the first element of the pair only
    [
        CollationElement {
            l1: aaaa,
            l2: COMMON_L2,
            l3: COMMON_L3,
            l4: u32::MAX,
        },
        CollationElement::new(bbbb | 0x8000, 0, 0),
    ]
}

/// Appends the derived elements for `cp`. Returns whether they form an
/// implicit-weight pair.
pub(crate) fn derived_elements(
    cp: u32,
    table: &CollationTable,
    settings: &Settings,
    ces: &mut Vec<CollationElement>,
) -> bool {
    if hangul_syllable(cp) {
        let mut jamo = decompose_hangul_syllable(cp).to_vec();
        generate::s2(&mut jamo, table, settings, ces, false);
        return false;
    }

    ces.extend_from_slice(&implicit_weights(cp, table.implicit_segments()));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primaries(cp: u32) -> (u32, u32) {
        let [a, b] = implicit_weights(cp, &DEFAULT_IMPLICIT_WEIGHTS);
        (a.l1, b.l1)
    }

    #[test]
    fn han_segments() {
        // 一
        assert_eq!(primaries(0x4E00), (0xFB40, 0xCE00));
        // Compatibility ideograph that is a unified ideograph
        assert_eq!(primaries(0xFA0E), (0xFB41, 0xFA0E));
        // Extension A
        assert_eq!(primaries(0x3400), (0xFB80, 0xB400));
        // Extension D, inside and just past the block
        assert_eq!(primaries(0x2B740), (0xFB85, 0xB740));
        assert_eq!(primaries(0x2B81E), (0xFBC5, 0xB81E));
    }

    #[test]
    fn compatibility_ideograph_carve_out() {
        // FA10 is in the block but is not a unified ideograph
        assert_eq!(primaries(0xFA10).0, 0xFBC1);
        assert_eq!(primaries(0xFA11).0, 0xFB41);
        assert!(!CJK_COMPATIBILITY_IDEOGRAPHS.contains(0xFA2A));
        assert!(CJK_EXTENSION_D.contains(0x2B81D));
        assert!(!CJK_EXTENSION_D.contains(0x2B73F));
    }

    #[test]
    fn script_segments() {
        assert_eq!(primaries(0x17000), (0xFB00, 0x8000));
        assert_eq!(primaries(0x18D00), (0xFB00, 0x8000 | 0x1D00));
        assert_eq!(primaries(0x1B170), (0xFB01, 0x8000));
        assert_eq!(primaries(0x18B01), (0xFB02, 0x8001));
    }

    #[test]
    fn unassigned() {
        assert_eq!(primaries(0xE0000), (0xFBC0 + (0xE0000 >> 15), 0x8000));
        let [first, second] = implicit_weights(0x10FFFF, &DEFAULT_IMPLICIT_WEIGHTS);
        assert_eq!(first.l2, COMMON_L2);
        assert_eq!(second.l2, 0);
        assert_ne!(first.l4, 0);
        assert_eq!(second.l4, 0);
    }
}
