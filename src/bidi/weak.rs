//! Weak types (W1 - W7), applied to one isolating run sequence.

use super::explicit::PropAndEmbedding;
use super::runs::RunSequence;
use crate::props::{isolate_control, BidiClass};

use BidiClass::*;

pub(crate) fn resolve_weak_types(paes: &mut [PropAndEmbedding], seq: &RunSequence) {
    let positions = &seq.positions;

    // W1
    let mut prev = seq.sos;
    for &i in positions {
        let pae = &mut paes[i];
        if pae.class == NSM {
            pae.originally_nsm = true;
            pae.class = if isolate_control(prev) { ON } else { prev };
        }
        prev = pae.class;
    }

    // W2
    let mut last_strong = seq.sos;
    for &i in positions {
        let pae = &mut paes[i];
        match pae.class {
            R | L | AL => last_strong = pae.class,
            EN if last_strong == AL => pae.class = AN,
            _ => {}
        }
    }

    // W3
    for &i in positions {
        if paes[i].class == AL {
            paes[i].class = R;
        }
    }

    // W4
    for k in 1..positions.len().saturating_sub(1) {
        let before = paes[positions[k - 1]].class;
        let after = paes[positions[k + 1]].class;
        let pae = &mut paes[positions[k]];

        match (before, pae.class, after) {
            (EN, ES, EN) | (EN, CS, EN) => pae.class = EN,
            (AN, CS, AN) => pae.class = AN,
            _ => {}
        }
    }

    // W5
    let mut k = 0;
    while k < positions.len() {
        if paes[positions[k]].class != ET {
            k += 1;
            continue;
        }

        let run_start = k;
        while k < positions.len() && paes[positions[k]].class == ET {
            k += 1;
        }

        let before_is_en = run_start > 0 && paes[positions[run_start - 1]].class == EN;
        let after_is_en = k < positions.len() && paes[positions[k]].class == EN;
        if before_is_en || after_is_en {
            for &i in &positions[run_start..k] {
                paes[i].class = EN;
            }
        }
    }

    // W6
    for &i in positions {
        if matches!(paes[i].class, ES | ET | CS) {
            paes[i].class = ON;
        }
    }

    // W7
    let mut last_strong = seq.sos;
    for &i in positions {
        let pae = &mut paes[i];
        match pae.class {
            R | L => last_strong = pae.class,
            EN if last_strong == L => pae.class = L,
            _ => {}
        }
    }
}
