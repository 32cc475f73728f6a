use super::explicit::PropAndEmbedding;
use super::runs::RunSequence;
use crate::props::BidiClass;

// I1, I2
pub(crate) fn resolve_implicit_levels(paes: &mut [PropAndEmbedding], seq: &RunSequence) {
    for &i in &seq.positions {
        let pae = &mut paes[i];
        let even = pae.embedding % 2 == 0;
        match pae.class {
            BidiClass::R if even => pae.embedding += 1,
            BidiClass::AN | BidiClass::EN if even => pae.embedding += 2,
            BidiClass::L | BidiClass::EN | BidiClass::AN if !even => pae.embedding += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidi::runs::LevelRun;

    fn pae(class: BidiClass, embedding: u8) -> PropAndEmbedding {
        PropAndEmbedding {
            index: 0,
            cp: 'x',
            embedding,
            class,
            original: class,
            unmatched_pdi: false,
            originally_nsm: false,
        }
    }

    #[test]
    fn implicit_levels() {
        let mut paes = vec![
            pae(BidiClass::L, 0),
            pae(BidiClass::R, 0),
            pae(BidiClass::EN, 0),
            pae(BidiClass::AN, 0),
            pae(BidiClass::L, 1),
            pae(BidiClass::R, 1),
            pae(BidiClass::EN, 1),
            pae(BidiClass::AN, 1),
        ];
        let seq = RunSequence {
            runs: vec![LevelRun {
                start: 0,
                end: paes.len(),
                used: true,
            }],
            positions: (0..paes.len()).collect(),
            embedding: 0,
            sos: BidiClass::L,
            eos: BidiClass::L,
        };

        resolve_implicit_levels(&mut paes, &seq);

        let levels: Vec<u8> = paes.iter().map(|pae| pae.embedding).collect();
        assert_eq!(levels, vec![0, 1, 2, 2, 2, 1, 2, 2]);
    }
}
