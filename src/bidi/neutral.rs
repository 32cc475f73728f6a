//! Paired brackets (BD16, N0) and the remaining neutrals (N1, N2).

use super::explicit::PropAndEmbedding;
use super::runs::RunSequence;
use crate::props::{bidi_bracket, canonically_equivalent, BidiClass, BracketType};

use BidiClass::*;

const MAX_BRACKET_STACK: usize = 63;

/// Positions within the sequence (not the paragraph) of one bracket pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BracketPair {
    pub open: usize,
    pub close: usize,
}

fn class_at(paes: &[PropAndEmbedding], seq: &RunSequence, k: usize) -> BidiClass {
    paes[seq.positions[k]].class
}

/// BD16. Pairs come back sorted by opening position.
pub(crate) fn find_bracket_pairs(paes: &[PropAndEmbedding], seq: &RunSequence) -> Vec<BracketPair> {
    // (position, opening bracket)
    let mut stack: Vec<(usize, char)> = Vec::with_capacity(MAX_BRACKET_STACK);
    let mut pairs = Vec::new();

    for (k, &i) in seq.positions.iter().enumerate() {
        let pae = &paes[i];
        if pae.class != ON {
            continue;
        }
        let Some(bracket) = bidi_bracket(pae.cp) else {
            continue;
        };

        match bracket.kind {
            BracketType::Open => {
                if stack.len() == MAX_BRACKET_STACK {
                    break;
                }
                stack.push((k, bracket.opening));
            }
            BracketType::Close => {
                let found = stack
                    .iter()
                    .rposition(|&(_, opening)| canonically_equivalent(opening, bracket.opening));
                if let Some(depth) = found {
                    pairs.push(BracketPair {
                        open: stack[depth].0,
                        close: k,
                    });
                    stack.truncate(depth);
                }
            }
        }
    }

    pairs.sort_by_key(|pair| pair.open);
    pairs
}

// EN and AN count as R inside brackets and for neutral runs
fn strong_direction(class: BidiClass) -> Option<BidiClass> {
    match class {
        L => Some(L),
        R | AL | EN | AN => Some(R),
        _ => None,
    }
}

fn embedding_direction(level: u8) -> BidiClass {
    if level % 2 == 0 {
        L
    } else {
        R
    }
}

// Sets a bracket and any marks that W1 folded into it
fn set_bracket_class(
    paes: &mut [PropAndEmbedding],
    seq: &RunSequence,
    k: usize,
    class: BidiClass,
) {
    paes[seq.positions[k]].class = class;
    for &i in &seq.positions[k + 1..] {
        if !paes[i].originally_nsm {
            break;
        }
        paes[i].class = class;
    }
}

pub(crate) fn resolve_paired_brackets(paes: &mut [PropAndEmbedding], seq: &RunSequence) {
    let pairs = find_bracket_pairs(paes, seq);
    if pairs.is_empty() {
        return;
    }

    let e = embedding_direction(seq.embedding);
    let mut prev_strong = seq.sos;
    let mut next_pair = 0;

    for k in 0..seq.positions.len() {
        if next_pair == pairs.len() {
            break;
        }

        if let Some(direction) = strong_direction(class_at(paes, seq, k)) {
            prev_strong = direction;
        }

        if pairs[next_pair].open != k {
            continue;
        }
        let pair = pairs[next_pair];
        next_pair += 1;

        // N0 b, c
        let mut found_e = false;
        let mut found_opposite = false;
        for inner in pair.open + 1..pair.close {
            match strong_direction(class_at(paes, seq, inner)) {
                Some(direction) if direction == e => {
                    found_e = true;
                    break;
                }
                Some(_) => found_opposite = true,
                None => {}
            }
        }

        let resolved = if found_e {
            Some(e)
        } else if found_opposite {
            // N0 c1 takes the opposite context, c2 the embedding direction;
            // either way that is the preceding strong type
            Some(prev_strong)
        } else {
            // N0 d
            None
        };

        if let Some(class) = resolved {
            set_bracket_class(paes, seq, pair.open, class);
            set_bracket_class(paes, seq, pair.close, class);
            prev_strong = class;
        }
    }
}

fn neutral_or_isolate(class: BidiClass) -> bool {
    matches!(class, B | S | WS | ON | FSI | LRI | RLI | PDI)
}

pub(crate) fn resolve_neutral_types(paes: &mut [PropAndEmbedding], seq: &RunSequence) {
    let positions = &seq.positions;
    let e = embedding_direction(seq.embedding);

    let mut k = 0;
    while k < positions.len() {
        if !neutral_or_isolate(paes[positions[k]].class) {
            k += 1;
            continue;
        }

        let run_start = k;
        while k < positions.len() && neutral_or_isolate(paes[positions[k]].class) {
            k += 1;
        }

        let before = if run_start == 0 {
            seq.sos
        } else {
            strong_direction(paes[positions[run_start - 1]].class).unwrap_or(e)
        };
        let after = if k == positions.len() {
            seq.eos
        } else {
            strong_direction(paes[positions[k]].class).unwrap_or(e)
        };

        // N1, else N2
        let class = if before == after { before } else { e };
        for &i in &positions[run_start..k] {
            paes[i].class = class;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidi::explicit::{classes_of, explicit_levels};
    use crate::bidi::runs::{find_all_runs, find_run_sequences};
    use crate::bidi::weak::resolve_weak_types;

    fn resolved(s: &str, paragraph_level: u8) -> Vec<BidiClass> {
        let text: Vec<char> = s.chars().collect();
        let classes = classes_of(&text);
        let mut paes = explicit_levels(&text, &classes, 0, paragraph_level);
        let mut runs = find_all_runs(&paes, 0..paes.len(), false);
        for seq in find_run_sequences(&paes, &mut runs, paragraph_level) {
            resolve_weak_types(&mut paes, &seq);
            resolve_paired_brackets(&mut paes, &seq);
            resolve_neutral_types(&mut paes, &seq);
        }
        paes.iter().map(|pae| pae.class).collect()
    }

    fn pairs(s: &str) -> Vec<(usize, usize)> {
        let text: Vec<char> = s.chars().collect();
        let classes = classes_of(&text);
        let paes = explicit_levels(&text, &classes, 0, 0);
        let mut runs = find_all_runs(&paes, 0..paes.len(), false);
        let seqs = find_run_sequences(&paes, &mut runs, 0);
        find_bracket_pairs(&paes, &seqs[0])
            .iter()
            .map(|pair| (pair.open, pair.close))
            .collect()
    }

    #[test]
    fn bracket_pairs() {
        assert_eq!(pairs("a(b)c"), vec![(1, 3)]);
        assert_eq!(pairs("[(])"), vec![(0, 2)]);
        assert_eq!(pairs("(a[b]c)"), vec![(0, 6), (2, 4)]);
        assert_eq!(pairs("a)b(c"), vec![]);
    }

    #[test]
    fn canonically_equivalent_brackets_pair() {
        // U+2329 decomposes to U+3008, so U+3009 closes it
        assert_eq!(pairs("\u{2329}a\u{3009}"), vec![(0, 2)]);
        assert_eq!(pairs("\u{3008}a\u{232A}"), vec![(0, 2)]);
    }

    #[test]
    fn bracket_stack_limit() {
        let mut s: String = std::iter::repeat('(').take(MAX_BRACKET_STACK + 1).collect();
        s.push(')');
        assert_eq!(pairs(&s), vec![]);

        let mut s: String = std::iter::repeat('(').take(MAX_BRACKET_STACK).collect();
        s.push(')');
        assert_eq!(pairs(&s), vec![(MAX_BRACKET_STACK - 1, MAX_BRACKET_STACK)]);
    }

    #[test]
    fn brackets_take_embedding_direction() {
        // N0 b: strong type matching the embedding direction inside
        assert_eq!(resolved("\u{5D0}(b)", 0), vec![R, L, L, L]);
    }

    #[test]
    fn brackets_take_context() {
        // N0 c1: only opposite types inside, and the context agrees
        assert_eq!(resolved("\u{5D0}(\u{5D1})", 0), vec![R, R, R, R]);
        // N0 c2: context disagrees, so the embedding direction wins
        assert_eq!(resolved("a(\u{5D1})", 0), vec![L, L, R, L]);
    }

    #[test]
    fn empty_brackets_fall_to_neutral_rules() {
        // N0 d, then N1 between two R
        assert_eq!(resolved("\u{5D0}()\u{5D1}", 0), vec![R, R, R, R]);
    }

    #[test]
    fn marks_after_brackets_follow_them() {
        let classes = resolved("\u{5D0}(\u{301}\u{5D1})\u{301}", 0);
        assert_eq!(classes, vec![R, R, R, R, R, R]);
    }

    #[test]
    fn neutrals() {
        // N1: numbers count as R
        assert_eq!(resolved("\u{5D0} 1", 0), vec![R, R, EN]);
        // N2: disagreeing neighbours give the embedding direction
        assert_eq!(resolved("a \u{5D0}", 0), vec![L, L, R]);
        assert_eq!(resolved("a \u{5D0}", 1), vec![L, R, R]);
        // sos and eos bound the sequence
        assert_eq!(resolved(" ", 1), vec![R]);
    }
}
