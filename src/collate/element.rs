use serde::{Deserialize, Serialize};

// Case information lives in the top two bits of L3
pub(crate) const CASE_LEVEL_BITS_MASK: u16 = 0xC000;
pub(crate) const DISABLE_CASE_LEVEL_MASK: u16 = !CASE_LEVEL_BITS_MASK;
pub(crate) const UPPER_CASE_BITS: u16 = 0x8000;
pub(crate) const MIXED_CASE_BITS: u16 = 0x4000;
pub(crate) const LOWER_CASE_BITS: u16 = 0x0000;

pub(crate) const COMMON_L2: u16 = 0x0020;
pub(crate) const COMMON_L3: u16 = 0x0002;

/// One four-level weight tuple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollationElement {
    pub l1: u32,
    pub l2: u16,
    pub l3: u16,
    pub l4: u32,
}

impl CollationElement {
    pub const fn new(l1: u32, l2: u16, l3: u16) -> Self {
        Self { l1, l2, l3, l4: 0 }
    }

    pub fn ignorable(&self) -> bool {
        self.l1 == 0
    }

    pub fn case_bits(&self) -> u16 {
        self.l3 & CASE_LEVEL_BITS_MASK
    }

    pub(crate) fn zero(&mut self) {
        *self = Self::default();
    }
}

// DUCET tertiary weights that mark an upper-case letter form
const UPPER_TERTIARIES: [u16; 6] = [0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x1D];

/// Folds case bits into a raw tertiary weight read from table text.
pub(crate) fn tertiary_with_case(tertiary: u16) -> u16 {
    let tertiary = tertiary & DISABLE_CASE_LEVEL_MASK;
    if UPPER_TERTIARIES.contains(&tertiary) {
        tertiary | UPPER_CASE_BITS
    } else {
        tertiary | LOWER_CASE_BITS
    }
}
