//! The Unicode Bidirectional Algorithm (UAX #9).
//!
//! Text is split into paragraphs (P1), each paragraph is resolved to
//! embedding levels, and every line is then reordered into display order.
//! The result is a lazy sequence of [`BidiSubrange`]s: spans of the input in
//! visual order, single mirrored glyphs, and line break markers.

mod explicit;
mod implicit;
mod line_break;
mod neutral;
mod reorder;
mod runs;
mod weak;

use std::collections::VecDeque;
use std::iter::Rev;
use std::ops::Range;
use std::slice;

use tracing::trace;

use crate::props::{bidi_class, BidiClass};
use explicit::{classes_of, explicit_levels, p2_p3, PropAndEmbedding};
use runs::{find_all_runs, find_run_sequences};

pub use line_break::{AllowedLineBreaks, ExtentLineBreaks, HardLineBreaks, LineBreak, NextLineBreak};

//
// Output types
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineBreakKind {
    Hard,
    Possible,
}

/// One piece of display-order output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BidiSubrange<'a> {
    /// Input code points `range`, shown right to left when `reversed`.
    Span {
        cps: &'a [char],
        range: Range<usize>,
        reversed: bool,
    },
    /// The code point at `index`, shown as `glyph`.
    Mirrored { index: usize, glyph: char },
    LineBreak(LineBreakKind),
}

impl<'a> BidiSubrange<'a> {
    pub fn is_line_break(&self) -> bool {
        matches!(self, BidiSubrange::LineBreak(_))
    }

    /// The code points to display, in display order.
    pub fn chars(&self) -> SubrangeChars<'a> {
        SubrangeChars(match *self {
            BidiSubrange::Span {
                cps,
                reversed: false,
                ..
            } => CharsInner::Forward(cps.iter()),
            BidiSubrange::Span {
                cps,
                reversed: true,
                ..
            } => CharsInner::Reversed(cps.iter().rev()),
            BidiSubrange::Mirrored { glyph, .. } => CharsInner::Single(Some(glyph)),
            BidiSubrange::LineBreak(_) => CharsInner::Single(None),
        })
    }

    /// Input indices of the displayed code points, in display order.
    pub fn indices(&self) -> SubrangeIndices {
        SubrangeIndices(match self {
            BidiSubrange::Span {
                range,
                reversed: false,
                ..
            } => IndicesInner::Forward(range.clone()),
            BidiSubrange::Span {
                range,
                reversed: true,
                ..
            } => IndicesInner::Reversed(range.clone().rev()),
            BidiSubrange::Mirrored { index, .. } => IndicesInner::Single(Some(*index)),
            BidiSubrange::LineBreak(_) => IndicesInner::Single(None),
        })
    }
}

enum CharsInner<'a> {
    Forward(slice::Iter<'a, char>),
    Reversed(Rev<slice::Iter<'a, char>>),
    Single(Option<char>),
}

pub struct SubrangeChars<'a>(CharsInner<'a>);

impl Iterator for SubrangeChars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match &mut self.0 {
            CharsInner::Forward(iter) => iter.next().copied(),
            CharsInner::Reversed(iter) => iter.next().copied(),
            CharsInner::Single(cp) => cp.take(),
        }
    }
}

enum IndicesInner {
    Forward(Range<usize>),
    Reversed(Rev<Range<usize>>),
    Single(Option<usize>),
}

pub struct SubrangeIndices(IndicesInner);

impl Iterator for SubrangeIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match &mut self.0 {
            IndicesInner::Forward(iter) => iter.next(),
            IndicesInner::Reversed(iter) => iter.next(),
            IndicesInner::Single(i) => i.take(),
        }
    }
}

//
// Paragraph resolution
//

struct Paragraph {
    paes: Vec<PropAndEmbedding>,
    // The code points that survive X9, as seen by the line breaker
    cps: Vec<char>,
    level: u8,
    line_start: usize,
}

// P1: a paragraph ends after its separator, and CR LF stays together
fn paragraph_end(text: &[char], start: usize) -> usize {
    for i in start..text.len() {
        if bidi_class(text[i]) == BidiClass::B {
            if text[i] == '\r' && text.get(i + 1) == Some(&'\n') {
                return i + 2;
            }
            return i + 1;
        }
    }
    text.len()
}

fn check_forced_level(level: Option<u8>) {
    if let Some(level) = level {
        assert!(level <= 1, "forced paragraph level must be 0 or 1, not {level}");
    }
}

fn resolve_paragraph(text: &[char], range: Range<usize>, forced_level: Option<u8>) -> Paragraph {
    let paragraph_text = &text[range.clone()];
    let classes = classes_of(paragraph_text);
    let level = forced_level.unwrap_or_else(|| p2_p3(&classes));

    let mut paes = explicit_levels(paragraph_text, &classes, range.start, level);
    let mut runs = find_all_runs(&paes, 0..paes.len(), false);
    let sequences = find_run_sequences(&paes, &mut runs, level);

    for seq in &sequences {
        weak::resolve_weak_types(&mut paes, seq);
        neutral::resolve_paired_brackets(&mut paes, seq);
        neutral::resolve_neutral_types(&mut paes, seq);
        implicit::resolve_implicit_levels(&mut paes, seq);
    }

    trace!(
        start = range.start,
        end = range.end,
        paragraph_level = level,
        runs = runs.len(),
        sequences = sequences.len(),
        longest_sequence = sequences.iter().map(|seq| seq.runs.len()).max().unwrap_or(0),
        "resolved paragraph"
    );

    let cps = paes.iter().map(|pae| pae.cp).collect();
    Paragraph {
        paes,
        cps,
        level,
        line_start: 0,
    }
}

//
// Lazy emission
//

/// Display-order subranges of a text, produced paragraph by paragraph and
/// line by line as they are pulled.
pub struct BidiSubranges<'a, B = HardLineBreaks> {
    text: &'a [char],
    forced_level: Option<u8>,
    line_breaks: B,
    next_paragraph: usize,
    paragraph: Option<Paragraph>,
    pending: VecDeque<BidiSubrange<'a>>,
}

impl<'a, B: NextLineBreak> Iterator for BidiSubranges<'a, B> {
    type Item = BidiSubrange<'a>;

    fn next(&mut self) -> Option<BidiSubrange<'a>> {
        loop {
            if let Some(subrange) = self.pending.pop_front() {
                return Some(subrange);
            }

            if let Some(paragraph) = &mut self.paragraph {
                let len = paragraph.paes.len();
                if paragraph.line_start < len {
                    let start = paragraph.line_start;
                    let line_break = self.line_breaks.next_line_break(&paragraph.cps, start);
                    let end = line_break.position.clamp(start + 1, len);

                    reorder::emit_line(
                        self.text,
                        &mut paragraph.paes,
                        start..end,
                        paragraph.level,
                        &mut self.pending,
                    );
                    self.pending.push_back(BidiSubrange::LineBreak(if line_break.hard {
                        LineBreakKind::Hard
                    } else {
                        LineBreakKind::Possible
                    }));

                    paragraph.line_start = end;
                    continue;
                }
                self.paragraph = None;
            }

            if self.next_paragraph >= self.text.len() {
                return None;
            }

            let end = paragraph_end(self.text, self.next_paragraph);
            self.paragraph = Some(resolve_paragraph(
                self.text,
                self.next_paragraph..end,
                self.forced_level,
            ));
            self.next_paragraph = end;
        }
    }
}

//
// Public functions
//

/// Reorders `text` for display, breaking lines only at hard breaks.
///
/// `paragraph_level` forces every paragraph to level 0 (LTR) or 1 (RTL); with
/// `None` each paragraph finds its own level.
pub fn bidirectional_subranges(
    text: &[char],
    paragraph_level: Option<u8>,
) -> BidiSubranges<'_, HardLineBreaks> {
    bidirectional_subranges_with(text, paragraph_level, HardLineBreaks)
}

pub fn bidirectional_subranges_with<B: NextLineBreak>(
    text: &[char],
    paragraph_level: Option<u8>,
    line_breaks: B,
) -> BidiSubranges<'_, B> {
    check_forced_level(paragraph_level);
    BidiSubranges {
        text,
        forced_level: paragraph_level,
        line_breaks,
        next_paragraph: 0,
        paragraph: None,
        pending: VecDeque::new(),
    }
}

/// Copies `text` into display order. Possible line breaks become `'\n'`.
pub fn bidirectional_transform(text: &[char], paragraph_level: Option<u8>) -> Vec<char> {
    bidirectional_transform_with(text, paragraph_level, HardLineBreaks)
}

pub fn bidirectional_transform_with<B: NextLineBreak>(
    text: &[char],
    paragraph_level: Option<u8>,
    line_breaks: B,
) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    for subrange in bidirectional_subranges_with(text, paragraph_level, line_breaks) {
        match subrange {
            BidiSubrange::LineBreak(LineBreakKind::Possible) => out.push('\n'),
            BidiSubrange::LineBreak(LineBreakKind::Hard) => {}
            other => out.extend(other.chars()),
        }
    }
    out
}

/// `&str` convenience over [`bidirectional_transform`].
pub fn reorder_str(s: &str, paragraph_level: Option<u8>) -> String {
    let text: Vec<char> = s.chars().collect();
    bidirectional_transform(&text, paragraph_level).into_iter().collect()
}

/// The level of the first paragraph of `text` by P2 and P3.
pub fn paragraph_embedding_level(text: &[char]) -> u8 {
    let end = paragraph_end(text, 0);
    p2_p3(&classes_of(&text[..end]))
}

/// Resolved levels after L1, one per input code point. Code points removed by
/// X9 have no level.
pub fn embedding_levels(text: &[char], paragraph_level: Option<u8>) -> Vec<Option<u8>> {
    check_forced_level(paragraph_level);

    let mut levels = vec![None; text.len()];
    let mut start = 0;

    while start < text.len() {
        let end = paragraph_end(text, start);
        let mut paragraph = resolve_paragraph(text, start..end, paragraph_level);

        let mut line_start = 0;
        while line_start < paragraph.paes.len() {
            let line_break = HardLineBreaks.next_line_break(&paragraph.cps, line_start);
            let line_end = line_break.position.clamp(line_start + 1, paragraph.paes.len());
            reorder::reset_whitespace_levels(
                &mut paragraph.paes,
                line_start..line_end,
                paragraph.level,
            );
            line_start = line_end;
        }

        for pae in &paragraph.paes {
            levels[pae.index] = Some(pae.embedding);
        }
        start = end;
    }

    levels
}
