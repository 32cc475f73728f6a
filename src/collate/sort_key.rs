use std::cmp::Ordering;

use super::element::{
    CollationElement, CASE_LEVEL_BITS_MASK, DISABLE_CASE_LEVEL_MASK, MIXED_CASE_BITS,
    UPPER_CASE_BITS,
};
use super::{CaseFirst, CaseLevel, CollationStrength, L2WeightOrder, Settings};

/// A serialized, level-separated sort key. Keys from the same table and
/// settings compare the way their source texts collate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextSortKey(Vec<u32>);

impl TextSortKey {
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }
}

impl From<Vec<u32>> for TextSortKey {
    fn from(weights: Vec<u32>) -> Self {
        Self(weights)
    }
}

impl Ord for TextSortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_sort_keys(self, other)
    }
}

impl PartialOrd for TextSortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn compare_sort_keys(a: &TextSortKey, b: &TextSortKey) -> Ordering {
    let (a, b) = (a.as_slice(), b.as_slice());
    let min_sort_key_length = a.len().min(b.len());

    for i in 0..min_sort_key_length {
        if a[i] < b[i] {
            return Ordering::Less;
        }

        if a[i] > b[i] {
            return Ordering::Greater;
        }
    }

    // Equal up to the shorter length: the shorter key sorts first
    a.len().cmp(&b.len())
}

//
// Case handling
//

pub(crate) fn modify_for_case(
    mut ce: CollationElement,
    strength: CollationStrength,
    case_first: CaseFirst,
    case_level: CaseLevel,
) -> CollationElement {
    if case_first == CaseFirst::Off && case_level == CaseLevel::Off {
        ce.l3 &= DISABLE_CASE_LEVEL_MASK;
        return ce;
    }

    let case_bits = ce.l3 & CASE_LEVEL_BITS_MASK;
    let c: u16 = match (case_first, case_bits) {
        (CaseFirst::Upper, UPPER_CASE_BITS) => 1,
        (CaseFirst::Upper, MIXED_CASE_BITS) => 2,
        (CaseFirst::Upper, _) => 3,
        (_, UPPER_CASE_BITS) => 3,
        (_, MIXED_CASE_BITS) => 2,
        _ => 1,
    };

    if case_level == CaseLevel::On {
        if strength == CollationStrength::Primary {
            ce.l2 = if ce.l1 == 0 { 0 } else { c << 8 };
            ce.l3 = 0;
        } else {
            ce.l4 = u32::from(ce.l3 & DISABLE_CASE_LEVEL_MASK);
            ce.l3 = if ce.l1 == 0 && ce.l2 == 0 { 0 } else { c << 8 };
        }
    } else {
        ce.l3 &= DISABLE_CASE_LEVEL_MASK;
        if ce.l2 != 0 {
            ce.l3 |= c << 14;
        } else if ce.l3 != 0 {
            ce.l3 |= 3 << 14;
        }
    }

    ce
}

//
// S3
//

pub(crate) fn s3(ces: &[CollationElement], settings: &Settings, nfd: &[u32]) -> TextSortKey {
    let strength = settings.strength;

    // A case level adds one level between L2 and L3
    let levels = strength as usize
        + 1
        + usize::from(settings.case_level == CaseLevel::On);

    let mut l1: Vec<u32> = Vec::with_capacity(ces.len());
    let mut l2: Vec<u32> = Vec::new();
    let mut l3: Vec<u32> = Vec::new();
    let mut l4: Vec<u32> = Vec::new();
    // For when the case level displaces L3 into L4
    let mut l4_overflow: Vec<u32> = Vec::new();

    for original in ces {
        let ce = modify_for_case(*original, strength, settings.case_first, settings.case_level);

        if ce.l1 != 0 {
            l1.push(ce.l1);
        }
        if levels > 1 && ce.l2 != 0 {
            l2.push(u32::from(ce.l2));
        }
        if levels > 2 && ce.l3 != 0 {
            l3.push(u32::from(ce.l3));
        }
        if levels > 3 && ce.l4 != 0 {
            l4.push(ce.l4);
            if settings.case_level == CaseLevel::On && original.l4 != 0 {
                l4_overflow.push(original.l4);
            }
        }
    }

    if l1.is_empty() && l2.is_empty() && l3.is_empty() && l4.is_empty() && l4_overflow.is_empty()
    {
        return TextSortKey::default();
    }

    let mut key = l1;

    if levels > 1 {
        key.push(0);
        match settings.l2_order {
            L2WeightOrder::Forward => key.extend_from_slice(&l2),
            L2WeightOrder::Backward => key.extend(l2.iter().rev()),
        }
    }

    if levels > 2 {
        key.push(0);
        key.extend_from_slice(&l3);
    }

    if levels > 3 {
        key.push(0);
        key.extend_from_slice(&l4);
        if !l4_overflow.is_empty() {
            key.push(0);
            key.extend_from_slice(&l4_overflow);
        }
    }

    if levels > 4 {
        key.push(0);
        if strength == CollationStrength::Identical {
            key.extend_from_slice(nfd);
        }
    }

    TextSortKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collate::element::COMMON_L2;
    use crate::collate::VariableWeighting;

    fn settings(strength: CollationStrength) -> Settings {
        Settings {
            strength,
            case_first: CaseFirst::Off,
            case_level: CaseLevel::Off,
            weighting: VariableWeighting::NonIgnorable,
            l2_order: L2WeightOrder::Forward,
        }
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        let a = TextSortKey::from(vec![1, 2]);
        let b = TextSortKey::from(vec![1, 2, 3]);

        assert_eq!(compare_sort_keys(&a, &b), Ordering::Less);
        assert_eq!(compare_sort_keys(&b, &a), Ordering::Greater);
        assert_eq!(compare_sort_keys(&a, &a.clone()), Ordering::Equal);
        assert_eq!(compare_sort_keys(&b, &a) as i32, 1);
        assert!(TextSortKey::default() < a);
    }

    #[test]
    fn levels_are_separated() {
        let ces = [
            CollationElement::new(0x2100, COMMON_L2, 0x02),
            CollationElement::new(0, 0x24, 0x02),
        ];

        let key = s3(&ces, &settings(CollationStrength::Tertiary), &[0x61, 0x301]);
        assert_eq!(key.as_slice(), &[0x2100, 0, 0x20, 0x24, 0, 0x02, 0x02]);

        let key = s3(&ces, &settings(CollationStrength::Primary), &[0x61, 0x301]);
        assert_eq!(key.as_slice(), &[0x2100]);

        let key = s3(&ces, &settings(CollationStrength::Identical), &[0x61, 0x301]);
        assert_eq!(
            key.as_slice(),
            &[0x2100, 0, 0x20, 0x24, 0, 0x02, 0x02, 0, 0, 0x61, 0x301]
        );
    }

    #[test]
    fn backward_secondary() {
        let ces = [
            CollationElement::new(0x2100, COMMON_L2, 0x02),
            CollationElement::new(0, 0x24, 0x02),
        ];
        let mut french = settings(CollationStrength::Secondary);
        french.l2_order = L2WeightOrder::Backward;

        let key = s3(&ces, &french, &[]);
        assert_eq!(key.as_slice(), &[0x2100, 0, 0x24, 0x20]);
    }

    #[test]
    fn ignorables_give_an_empty_key() {
        let ces = [CollationElement::default(), CollationElement::default()];
        let key = s3(&ces, &settings(CollationStrength::Identical), &[0x200B]);
        assert!(key.is_empty());
    }

    #[test]
    fn case_first_upper() {
        let lower = CollationElement::new(0x2100, COMMON_L2, 0x0002);
        let upper = CollationElement::new(0x2100, COMMON_L2, 0x8008);

        let l = modify_for_case(lower, CollationStrength::Tertiary, CaseFirst::Upper, CaseLevel::Off);
        let u = modify_for_case(upper, CollationStrength::Tertiary, CaseFirst::Upper, CaseLevel::Off);
        assert!(u.l3 < l.l3);

        let l = modify_for_case(lower, CollationStrength::Tertiary, CaseFirst::Lower, CaseLevel::Off);
        let u = modify_for_case(upper, CollationStrength::Tertiary, CaseFirst::Lower, CaseLevel::Off);
        assert!(l.l3 < u.l3);
    }

    #[test]
    fn case_level_moves_tertiary_to_quaternary() {
        let upper = CollationElement::new(0x2100, COMMON_L2, 0x8008);

        let ce = modify_for_case(upper, CollationStrength::Tertiary, CaseFirst::Off, CaseLevel::On);
        assert_eq!(ce.l3, 3 << 8);
        assert_eq!(ce.l4, 0x0008);

        let ce = modify_for_case(upper, CollationStrength::Primary, CaseFirst::Off, CaseLevel::On);
        assert_eq!(ce.l2, 3 << 8);
        assert_eq!(ce.l3, 0);
    }
}
