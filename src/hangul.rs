//! Hangul syllable arithmetic (Unicode 3.12).

use std::ops::Deref;

const S_BASE: u32 = 0xAC00;
const L_BASE: u32 = 0x1100;
const V_BASE: u32 = 0x1161;
const T_BASE: u32 = 0x11A7;
const L_COUNT: u32 = 19;
const V_COUNT: u32 = 21;
const T_COUNT: u32 = 28;
const N_COUNT: u32 = V_COUNT * T_COUNT;
const S_COUNT: u32 = L_COUNT * N_COUNT;

pub fn hangul_syllable(cp: u32) -> bool {
    (S_BASE..S_BASE + S_COUNT).contains(&cp)
}

/// The two or three conjoining jamo of a syllable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jamo {
    cps: [u32; 3],
    len: usize,
}

impl Deref for Jamo {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.cps[..self.len]
    }
}

pub fn decompose_hangul_syllable(cp: u32) -> Jamo {
    assert!(hangul_syllable(cp), "U+{cp:04X} is not a Hangul syllable");

    let s_index = cp - S_BASE;
    let l = L_BASE + s_index / N_COUNT;
    let v = V_BASE + (s_index % N_COUNT) / T_COUNT;
    let t = s_index % T_COUNT;

    if t == 0 {
        Jamo {
            cps: [l, v, 0],
            len: 2,
        }
    } else {
        Jamo {
            cps: [l, v, T_BASE + t],
            len: 3,
        }
    }
}

pub fn compose_hangul(jamo: &[u32]) -> Option<u32> {
    let (l, v, t) = match *jamo {
        [l, v] => (l, v, None),
        [l, v, t] => (l, v, Some(t)),
        _ => return None,
    };

    if !(L_BASE..L_BASE + L_COUNT).contains(&l) || !(V_BASE..V_BASE + V_COUNT).contains(&v) {
        return None;
    }

    let lv = S_BASE + ((l - L_BASE) * V_COUNT + (v - V_BASE)) * T_COUNT;
    match t {
        None => Some(lv),
        // T_BASE itself is not a trailing consonant
        Some(t) if t > T_BASE && t < T_BASE + T_COUNT => Some(lv + (t - T_BASE)),
        Some(_) => None,
    }
}
