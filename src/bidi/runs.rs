//! Level runs and isolating run sequences (BD7, BD13, X10).

use std::ops::Range;

use super::explicit::{matching_pdi, PropAndEmbedding};
use crate::props::{isolate_initiator, BidiClass};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LevelRun {
    pub start: usize,
    pub end: usize,
    pub used: bool,
}

impl LevelRun {
    fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            used: false,
        }
    }
}

/// An isolating run sequence. `positions` lists the indices into the
/// paragraph's code points, hopping from each run to the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RunSequence {
    pub runs: Vec<LevelRun>,
    pub positions: Vec<usize>,
    pub embedding: u8,
    pub sos: BidiClass,
    pub eos: BidiClass,
}

/// Maximal same-level runs within `range`. For emission, runs also break
/// wherever X9 removed code points, so each one covers a contiguous span of
/// the input. Isolate controls stay in their runs at their resolved levels.
pub(crate) fn find_all_runs(
    paes: &[PropAndEmbedding],
    range: Range<usize>,
    for_emission: bool,
) -> Vec<LevelRun> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for i in range.clone() {
        match start {
            None => start = Some(i),
            Some(s) => {
                let level_change = paes[i].embedding != paes[s].embedding;
                let gap = for_emission && paes[i].index != paes[i - 1].index + 1;
                if level_change || gap {
                    runs.push(LevelRun::new(s, i));
                    start = Some(i);
                }
            }
        }
    }

    if let Some(s) = start {
        runs.push(LevelRun::new(s, range.end));
    }

    runs
}

fn boundary_class(a: u8, b: u8) -> BidiClass {
    if a.max(b) % 2 == 1 {
        BidiClass::R
    } else {
        BidiClass::L
    }
}

pub(crate) fn find_run_sequences(
    paes: &[PropAndEmbedding],
    runs: &mut [LevelRun],
    paragraph_level: u8,
) -> Vec<RunSequence> {
    let originals: Vec<BidiClass> = paes.iter().map(|pae| pae.original).collect();
    let mut chains: Vec<Vec<LevelRun>> = Vec::new();

    for r in 0..runs.len() {
        if runs[r].used {
            continue;
        }

        let first = &paes[runs[r].start];
        if first.original == BidiClass::PDI && !first.unmatched_pdi {
            // Joined from its isolate initiator's run
            continue;
        }

        runs[r].used = true;
        let mut chain = vec![runs[r]];

        loop {
            let last = chain[chain.len() - 1].end - 1;
            if !isolate_initiator(paes[last].original) {
                break;
            }

            let pdi = matching_pdi(&originals, last);
            match runs.binary_search_by_key(&pdi, |run| run.start) {
                Ok(k) if !runs[k].used => {
                    runs[k].used = true;
                    chain.push(runs[k]);
                }
                _ => break,
            }
        }

        chains.push(chain);
    }

    // A PDI run whose initiator did not close its own run stands alone
    for run in runs.iter_mut().filter(|run| !run.used) {
        run.used = true;
        chains.push(vec![*run]);
    }
    chains.sort_by_key(|chain| chain[0].start);

    chains
        .into_iter()
        .map(|chain| {
            let front = chain[0];
            let back = chain[chain.len() - 1];
            let embedding = paes[front.start].embedding;

            let prev = if front.start > 0 {
                paes[front.start - 1].embedding
            } else {
                paragraph_level
            };

            let last = back.end - 1;
            let unterminated_isolate = isolate_initiator(paes[last].original)
                && matching_pdi(&originals, last) == paes.len();
            let next = if unterminated_isolate || back.end == paes.len() {
                paragraph_level
            } else {
                paes[back.end].embedding
            };

            RunSequence {
                positions: chain.iter().flat_map(|run| run.start..run.end).collect(),
                runs: chain,
                embedding,
                sos: boundary_class(embedding, prev),
                eos: boundary_class(embedding, next),
            }
        })
        .collect()
}
