//! Line reordering (L1 - L4) and emission of display-order subranges.

use std::collections::VecDeque;
use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use super::explicit::PropAndEmbedding;
use super::runs::find_all_runs;
use super::BidiSubrange;
use crate::props::{bidi_class, bidi_mirrored, isolate_control, BidiClass};

/// A span of input indices at one level, in display position.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ReorderedRun {
    range: Range<usize>,
    level: u8,
    reversed: bool,
}

/// L1, using the classes from the property tables rather than the resolved
/// ones.
pub(crate) fn reset_whitespace_levels(
    paes: &mut [PropAndEmbedding],
    line: Range<usize>,
    paragraph_level: u8,
) {
    let mut trailing: Option<usize> = None;

    for i in line.clone() {
        match paes[i].original {
            BidiClass::B | BidiClass::S => {
                paes[i].embedding = paragraph_level;
                if let Some(start) = trailing.take() {
                    for pae in &mut paes[start..i] {
                        pae.embedding = paragraph_level;
                    }
                }
            }
            BidiClass::WS | BidiClass::FSI | BidiClass::LRI | BidiClass::RLI | BidiClass::PDI => {
                trailing.get_or_insert(i);
            }
            _ => trailing = None,
        }
    }

    if let Some(start) = trailing {
        for pae in &mut paes[start..line.end] {
            pae.embedding = paragraph_level;
        }
    }
}

// L2
fn reverse_runs(paes: &[PropAndEmbedding], line: Range<usize>) -> Vec<ReorderedRun> {
    let mut runs: Vec<ReorderedRun> = find_all_runs(paes, line, true)
        .iter()
        .map(|run| ReorderedRun {
            range: paes[run.start].index..paes[run.end - 1].index + 1,
            level: paes[run.start].embedding,
            reversed: false,
        })
        .collect();

    let Some(highest) = runs.iter().map(|run| run.level).max() else {
        return runs;
    };
    let lowest = runs.iter().map(|run| run.level).min().unwrap_or(highest);
    let lowest_odd = if lowest % 2 == 0 { lowest + 1 } else { lowest };

    for level in (lowest_odd..=highest).rev() {
        let mut k = 0;
        while k < runs.len() {
            if runs[k].level < level {
                k += 1;
                continue;
            }

            let start = k;
            while k < runs.len() && runs[k].level >= level {
                k += 1;
            }

            runs[start..k].reverse();
            for run in &mut runs[start..k] {
                run.reversed = !run.reversed;
            }
        }
    }

    runs
}

// L3: multi-code-point graphemes inside a reversed run keep their logical order
fn split_graphemes(text: &[char], run: ReorderedRun) -> Vec<ReorderedRun> {
    let s: String = text[run.range.clone()].iter().collect();
    let mut pieces = Vec::new();
    let mut single_start: Option<usize> = None;
    let mut position = run.range.start;

    for grapheme in s.graphemes(true) {
        let len = grapheme.chars().count();
        if len == 1 {
            single_start.get_or_insert(position);
        } else {
            if let Some(start) = single_start.take() {
                pieces.push(ReorderedRun {
                    range: start..position,
                    ..run.clone()
                });
            }
            pieces.push(ReorderedRun {
                range: position..position + len,
                reversed: false,
                ..run.clone()
            });
        }
        position += len;
    }

    if let Some(start) = single_start {
        pieces.push(ReorderedRun {
            range: start..position,
            ..run
        });
    }

    // The run displays right to left, and so do its pieces
    pieces.reverse();
    pieces
}

fn span(text: &[char], range: Range<usize>, reversed: bool) -> BidiSubrange<'_> {
    BidiSubrange::Span {
        cps: &text[range.clone()],
        range,
        reversed,
    }
}

// L4: mirrored glyphs at odd levels are emitted on their own. Isolate
// controls keep their place through L2 but are never emitted.
fn emit_run<'a>(text: &'a [char], run: ReorderedRun, out: &mut VecDeque<BidiSubrange<'a>>) {
    let odd = run.level % 2 == 1;
    let display_order: Box<dyn Iterator<Item = usize>> = if run.reversed {
        Box::new(run.range.clone().rev())
    } else {
        Box::new(run.range.clone())
    };

    let mut chunk: Option<Range<usize>> = None;
    for i in display_order {
        let glyph = if odd { bidi_mirrored(text[i]) } else { None };
        if glyph.is_none() && !isolate_control(bidi_class(text[i])) {
            chunk = Some(match chunk {
                None => i..i + 1,
                Some(range) if run.reversed => i..range.end,
                Some(range) => range.start..i + 1,
            });
            continue;
        }

        if let Some(range) = chunk.take() {
            out.push_back(span(text, range, run.reversed));
        }
        if let Some(glyph) = glyph {
            out.push_back(BidiSubrange::Mirrored { index: i, glyph });
        }
    }

    if let Some(range) = chunk {
        out.push_back(span(text, range, run.reversed));
    }
}

/// Reorders one line of a resolved paragraph and queues its subranges, not
/// including the line break marker.
pub(crate) fn emit_line<'a>(
    text: &'a [char],
    paes: &mut [PropAndEmbedding],
    line: Range<usize>,
    paragraph_level: u8,
    out: &mut VecDeque<BidiSubrange<'a>>,
) {
    reset_whitespace_levels(paes, line.clone(), paragraph_level);

    for run in reverse_runs(paes, line) {
        if run.reversed {
            for piece in split_graphemes(text, run) {
                emit_run(text, piece, out);
            }
        } else {
            emit_run(text, run, out);
        }
    }
}
