//! Line breaking hooks for bidi emission.
//!
//! A breaker sees the code points of one paragraph that survive X9 and
//! reports where the line starting at a given position ends.

use unicode_linebreak::{linebreaks, BreakOpportunity};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineBreak {
    pub position: usize,
    pub hard: bool,
}

pub trait NextLineBreak {
    /// The end of the line starting at `start`. Returns `cps.len()` when the
    /// rest of the paragraph fits on one line.
    fn next_line_break(&mut self, cps: &[char], start: usize) -> LineBreak;
}

impl<F> NextLineBreak for F
where
    F: FnMut(&[char], usize) -> LineBreak,
{
    fn next_line_break(&mut self, cps: &[char], start: usize) -> LineBreak {
        self(cps, start)
    }
}

/// Breaks only after mandatory breaks (UAX #14 classes BK, CR, LF and NL).
#[derive(Clone, Copy, Debug, Default)]
pub struct HardLineBreaks;

impl NextLineBreak for HardLineBreaks {
    fn next_line_break(&mut self, cps: &[char], start: usize) -> LineBreak {
        let mut i = start;
        while i < cps.len() {
            match cps[i] {
                '\r' if cps.get(i + 1) == Some(&'\n') => {
                    return LineBreak {
                        position: i + 2,
                        hard: true,
                    }
                }
                '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}' => {
                    return LineBreak {
                        position: i + 1,
                        hard: true,
                    }
                }
                _ => i += 1,
            }
        }

        LineBreak {
            position: cps.len(),
            hard: true,
        }
    }
}

// UAX #14 opportunities after `start`, as (code point offset, mandatory)
fn opportunities(cps: &[char], start: usize) -> impl Iterator<Item = (usize, bool)> {
    let line: String = cps[start..].iter().collect();
    let mut offsets = Vec::new();
    let mut chars_seen = 0;
    let mut bytes_seen = 0;

    for (byte, opportunity) in linebreaks(&line) {
        chars_seen += line[bytes_seen..byte].chars().count();
        bytes_seen = byte;
        offsets.push((
            start + chars_seen,
            opportunity == BreakOpportunity::Mandatory,
        ));
    }

    offsets.into_iter()
}

/// Breaks at every UAX #14 opportunity.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowedLineBreaks;

impl NextLineBreak for AllowedLineBreaks {
    fn next_line_break(&mut self, cps: &[char], start: usize) -> LineBreak {
        opportunities(cps, start)
            .find(|&(position, _)| position > start)
            .map_or(
                LineBreak {
                    position: cps.len(),
                    hard: true,
                },
                |(position, hard)| LineBreak { position, hard },
            )
    }
}

/// Fills lines up to `max_extent`, as measured by `cp_extent`, breaking at the
/// last UAX #14 opportunity that fits. A segment wider than a whole line gets
/// a line of its own.
pub struct ExtentLineBreaks<F> {
    max_extent: usize,
    cp_extent: F,
}

impl<F> ExtentLineBreaks<F>
where
    F: FnMut(&[char]) -> usize,
{
    pub fn new(max_extent: usize, cp_extent: F) -> Self {
        Self {
            max_extent,
            cp_extent,
        }
    }
}

impl<F> NextLineBreak for ExtentLineBreaks<F>
where
    F: FnMut(&[char]) -> usize,
{
    fn next_line_break(&mut self, cps: &[char], start: usize) -> LineBreak {
        let mut fitting: Option<usize> = None;

        for (position, mandatory) in opportunities(cps, start) {
            if position <= start {
                continue;
            }

            let extent = (self.cp_extent)(&cps[start..position]);
            if extent > self.max_extent {
                return LineBreak {
                    position: fitting.unwrap_or(position),
                    hard: false,
                };
            }
            if mandatory {
                return LineBreak {
                    position,
                    hard: true,
                };
            }
            fitting = Some(position);
        }

        LineBreak {
            position: cps.len(),
            hard: true,
        }
    }
}
