//! Per-code-point Unicode properties shared by the bidi and collation engines.

use unicode_bidi::data_source::BidiMatchedOpeningBracket;
use unicode_bidi::{BidiDataSource, HardcodedBidiData};
use unicode_normalization::char::{canonical_combining_class, decompose_canonical};

pub use unicode_bidi::BidiClass;

//
// Bidi class
//

pub fn bidi_class(cp: char) -> BidiClass {
    unicode_bidi::bidi_class(cp)
}

pub fn isolate_initiator(class: BidiClass) -> bool {
    matches!(class, BidiClass::LRI | BidiClass::RLI | BidiClass::FSI)
}

pub fn isolate_control(class: BidiClass) -> bool {
    isolate_initiator(class) || class == BidiClass::PDI
}

/// Classes that rule X9 drops from further processing.
pub fn removed_by_x9(class: BidiClass) -> bool {
    matches!(
        class,
        BidiClass::RLE
            | BidiClass::LRE
            | BidiClass::RLO
            | BidiClass::LRO
            | BidiClass::PDF
            | BidiClass::BN
    )
}

//
// Mirroring and paired brackets
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BracketType {
    Open,
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BidiBracket {
    /// The opening bracket of the pair, for matching an opener to its closer.
    pub opening: char,
    pub kind: BracketType,
}

/// The Bidi_Paired_Bracket_Type of `cp`, with the opening half of its pair.
pub fn bidi_bracket(cp: char) -> Option<BidiBracket> {
    let BidiMatchedOpeningBracket { opening, is_open } =
        HardcodedBidiData.bidi_matched_opening_bracket(cp)?;
    Some(BidiBracket {
        opening,
        kind: if is_open {
            BracketType::Open
        } else {
            BracketType::Close
        },
    })
}

/// The glyph that replaces `cp` at an odd embedding level, if it has one.
pub fn bidi_mirrored(cp: char) -> Option<char> {
    unicode_bidi_mirroring::get_mirrored(cp)
}

//
// Normalization data
//

pub fn ccc(cp: u32) -> u8 {
    char::from_u32(cp).map_or(0, canonical_combining_class)
}

pub fn canonical_decomposition(cp: char) -> Vec<char> {
    let mut out = Vec::with_capacity(4);
    decompose_canonical(cp, |c| out.push(c));
    out
}

pub fn canonically_equivalent(a: char, b: char) -> bool {
    a == b || canonical_decomposition(a) == canonical_decomposition(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_lookup() {
        let open = bidi_bracket('(').unwrap();
        assert_eq!(open.kind, BracketType::Open);
        assert_eq!(open.opening, '(');

        let close = bidi_bracket(')').unwrap();
        assert_eq!(close.kind, BracketType::Close);
        assert_eq!(close.opening, '(');

        // The corner brackets pair crosswise
        let close = bidi_bracket('\u{298E}').unwrap();
        assert_eq!(close.kind, BracketType::Close);
        assert_eq!(close.opening, '\u{298F}');

        assert!(bidi_bracket('<').is_none());
        assert!(bidi_bracket('a').is_none());
    }

    #[test]
    fn mirroring_is_symmetric() {
        assert_eq!(bidi_mirrored('<'), Some('>'));
        assert_eq!(bidi_mirrored('>'), Some('<'));
        assert_eq!(bidi_mirrored('['), Some(']'));
        assert_eq!(bidi_mirrored('\u{2215}'), Some('\u{29F5}'));
        assert_eq!(bidi_mirrored('a'), None);
        assert_eq!(bidi_mirrored('!'), None);
    }

    #[test]
    fn math_operators_are_mirrored() {
        for (a, b) in [
            ('\u{2A79}', '\u{2A7A}'),
            ('\u{22F2}', '\u{22FA}'),
            ('\u{2AA1}', '\u{2AA2}'),
            ('\u{2A64}', '\u{2A65}'),
            ('\u{2A7D}', '\u{2A7E}'),
        ] {
            assert_eq!(bidi_mirrored(a), Some(b));
            assert_eq!(bidi_mirrored(b), Some(a));
        }
    }

    #[test]
    fn brackets_are_other_neutral() {
        for cp in ('\u{0}'..='\u{FFFF}').filter(|&cp| bidi_bracket(cp).is_some()) {
            assert_eq!(bidi_class(cp), BidiClass::ON, "{:04X}", cp as u32);
        }
    }

    #[test]
    fn canonical_equivalence() {
        assert!(canonically_equivalent('\u{2329}', '\u{3008}'));
        assert!(canonically_equivalent('\u{232A}', '\u{3009}'));
        assert!(canonically_equivalent('\u{00F1}', '\u{00F1}'));
        assert!(!canonically_equivalent('(', ')'));
    }

    #[test]
    fn combining_classes() {
        assert_eq!(ccc(0x61), 0);
        assert_eq!(ccc(0x301), 230);
        assert_eq!(ccc(0x323), 220);
        assert_eq!(ccc(0xD800), 0);
    }
}
