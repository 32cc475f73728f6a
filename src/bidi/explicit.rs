//! Paragraph level (P2, P3) and explicit levels (X1 - X9).

use tracing::trace;

use crate::props::{bidi_class, isolate_initiator, removed_by_x9, BidiClass};

pub(crate) const MAX_DEPTH: u8 = 125;
const STACK_CAPACITY: usize = MAX_DEPTH as usize + 2;

/// One code point of a paragraph as the rules see it. `class` and `embedding`
/// are rewritten by each pass; `original` is the class from the property
/// tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PropAndEmbedding {
    pub index: usize,
    pub cp: char,
    pub embedding: u8,
    pub class: BidiClass,
    pub original: BidiClass,
    pub unmatched_pdi: bool,
    pub originally_nsm: bool,
}

//
// P2, P3
//

/// Position of the PDI matching the isolate initiator at `first`, or
/// `classes.len()` when there is none.
pub(crate) fn matching_pdi(classes: &[BidiClass], first: usize) -> usize {
    let mut depth = 1usize;
    for (i, &class) in classes.iter().enumerate().skip(first + 1) {
        if isolate_initiator(class) {
            depth += 1;
        } else if class == BidiClass::PDI {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    classes.len()
}

pub(crate) fn p2_p3(classes: &[BidiClass]) -> u8 {
    let mut i = 0;
    while i < classes.len() {
        match classes[i] {
            BidiClass::L => return 0,
            BidiClass::R | BidiClass::AL => return 1,
            class if isolate_initiator(class) => i = matching_pdi(classes, i),
            _ => {}
        }
        i += 1;
    }
    0
}

//
// X1 - X8
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DirectionalOverride {
    Neutral,
    LeftToRight,
    RightToLeft,
}

#[derive(Clone, Copy, Debug)]
struct StackEntry {
    embedding: u8,
    directional_override: DirectionalOverride,
    isolate: bool,
}

// Fixed-capacity status stack; levels stop at MAX_DEPTH, so it never fills
struct DirectionalStack {
    entries: [StackEntry; STACK_CAPACITY],
    len: usize,
}

impl DirectionalStack {
    fn new(paragraph_level: u8) -> Self {
        let bottom = StackEntry {
            embedding: paragraph_level,
            directional_override: DirectionalOverride::Neutral,
            isolate: false,
        };
        Self {
            entries: [bottom; STACK_CAPACITY],
            len: 1,
        }
    }

    fn top(&self) -> StackEntry {
        self.entries[self.len - 1]
    }

    fn push(&mut self, entry: StackEntry) {
        debug_assert!(self.len < STACK_CAPACITY);
        self.entries[self.len] = entry;
        self.len += 1;
    }

    fn pop(&mut self) {
        debug_assert!(self.len > 1);
        self.len -= 1;
    }
}

fn next_odd(level: u8) -> u8 {
    if level % 2 == 0 {
        level + 1
    } else {
        level + 2
    }
}

fn next_even(level: u8) -> u8 {
    if level % 2 == 0 {
        level + 2
    } else {
        level + 1
    }
}

fn class_from_override(entry: StackEntry, class: BidiClass) -> BidiClass {
    match entry.directional_override {
        DirectionalOverride::Neutral => class,
        DirectionalOverride::LeftToRight => BidiClass::L,
        DirectionalOverride::RightToLeft => BidiClass::R,
    }
}

/// Runs X1 - X8 over one paragraph, then drops what X9 removes. `offset` is
/// the paragraph's position in the whole input.
pub(crate) fn explicit_levels(
    text: &[char],
    classes: &[BidiClass],
    offset: usize,
    paragraph_level: u8,
) -> Vec<PropAndEmbedding> {
    let mut stack = DirectionalStack::new(paragraph_level);
    let mut overflow_isolates = 0usize;
    let mut overflow_embeddings = 0usize;
    let mut valid_isolates = 0usize;

    let mut paes = Vec::with_capacity(text.len());

    for (i, (&cp, &original)) in text.iter().zip(classes).enumerate() {
        let mut pae = PropAndEmbedding {
            index: offset + i,
            cp,
            embedding: stack.top().embedding,
            class: original,
            original,
            unmatched_pdi: false,
            originally_nsm: false,
        };

        match original {
            // X2 - X5
            BidiClass::RLE | BidiClass::LRE | BidiClass::RLO | BidiClass::LRO => {
                let rtl = matches!(original, BidiClass::RLE | BidiClass::RLO);
                let top = stack.top().embedding;
                let next = if rtl { next_odd(top) } else { next_even(top) };

                if next <= MAX_DEPTH && overflow_isolates == 0 && overflow_embeddings == 0 {
                    let directional_override = match original {
                        BidiClass::RLO => DirectionalOverride::RightToLeft,
                        BidiClass::LRO => DirectionalOverride::LeftToRight,
                        _ => DirectionalOverride::Neutral,
                    };
                    stack.push(StackEntry {
                        embedding: next,
                        directional_override,
                        isolate: false,
                    });
                } else if overflow_isolates == 0 {
                    overflow_embeddings += 1;
                    trace!(index = pae.index, overflow_embeddings, "embedding overflow");
                }
            }

            // X5a - X5c
            BidiClass::RLI | BidiClass::LRI | BidiClass::FSI => {
                pae.class = class_from_override(stack.top(), original);

                let rtl = match original {
                    BidiClass::RLI => true,
                    BidiClass::LRI => false,
                    _ => {
                        let end = i + matching_pdi(&classes[i..], 0);
                        p2_p3(&classes[i + 1..end]) == 1
                    }
                };

                let top = stack.top().embedding;
                let next = if rtl { next_odd(top) } else { next_even(top) };

                if next <= MAX_DEPTH && overflow_isolates == 0 && overflow_embeddings == 0 {
                    valid_isolates += 1;
                    stack.push(StackEntry {
                        embedding: next,
                        directional_override: DirectionalOverride::Neutral,
                        isolate: true,
                    });
                } else {
                    overflow_isolates += 1;
                    trace!(index = pae.index, overflow_isolates, "isolate overflow");
                }
            }

            // X6a
            BidiClass::PDI => {
                if overflow_isolates > 0 {
                    overflow_isolates -= 1;
                } else if valid_isolates == 0 {
                    pae.unmatched_pdi = true;
                } else {
                    overflow_embeddings = 0;
                    while !stack.top().isolate {
                        stack.pop();
                    }
                    stack.pop();
                    valid_isolates -= 1;
                }
                let top = stack.top();
                pae.embedding = top.embedding;
                pae.class = class_from_override(top, original);
            }

            // X7
            BidiClass::PDF => {
                if overflow_isolates == 0 {
                    if overflow_embeddings > 0 {
                        overflow_embeddings -= 1;
                    } else if !stack.top().isolate && stack.len >= 2 {
                        stack.pop();
                    }
                }
            }

            // X8
            BidiClass::B => pae.embedding = paragraph_level,

            BidiClass::BN => {}

            // X6
            _ => pae.class = class_from_override(stack.top(), original),
        }

        paes.push(pae);
    }

    // X9
    paes.retain(|pae| !removed_by_x9(pae.original));
    paes
}

/// Resolves the classes of `text` once, for reuse by every pass.
pub(crate) fn classes_of(text: &[char]) -> Vec<BidiClass> {
    text.iter().map(|&cp| bidi_class(cp)).collect()
}
