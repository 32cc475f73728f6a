//! Variable weighting (UTS #10 S2.3).

use super::element::{CollationElement, DISABLE_CASE_LEVEL_MASK};
use super::{CollationStrength, Settings, VariableWeighting};

/// Rewrites one batch of elements in place and returns the `after_variable`
/// state for the next batch. `implicit_pair` marks a batch that is a derived
/// AAAA/BBBB pair, whose second element carries no quaternary.
pub(crate) fn s2_3(
    ces: &mut [CollationElement],
    settings: &Settings,
    variable: impl Fn(u32) -> bool,
    mut after_variable: bool,
    implicit_pair: bool,
) -> bool {
    if !settings.retain_case_bits() {
        for ce in ces.iter_mut() {
            ce.l3 &= DISABLE_CASE_LEVEL_MASK;
        }
    }

    if settings.weighting == VariableWeighting::NonIgnorable
        || settings.strength == CollationStrength::Primary
    {
        return after_variable;
    }

    for (i, ce) in ces.iter_mut().enumerate() {
        if after_variable && ce.ignorable() {
            ce.zero();
        } else if ce.l1 == 0 {
            if ce.l2 == 0 && ce.l3 == 0 {
                ce.l4 = 0;
            } else if ce.l3 != 0 {
                ce.l4 = u32::MAX;
            }
            after_variable = false;
        } else if variable(ce.l1) {
            ce.l4 = ce.l1;
            ce.l1 = 0;
            ce.l2 = 0;
            ce.l3 = 0;
            after_variable = true;
        } else {
            ce.l4 = u32::MAX;
            after_variable = false;
        }

        if implicit_pair && i == 1 {
            ce.l4 = 0;
        }
    }

    after_variable
}
