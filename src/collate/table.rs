use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::derived::{ImplicitWeights, DEFAULT_IMPLICIT_WEIGHTS};
use super::element::{tertiary_with_case, CollationElement};
use super::generate;
use super::trie::CollationTrie;
use super::{
    CaseFirst, CaseLevel, CollationOptions, CollationStrength, L2WeightOrder, VariableWeighting,
};
use crate::error::TableError;

/// A collation trie plus the settings and implicit-weight segments that go
/// with it. Built once, then shared read-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollationTable {
    trie: CollationTrie,
    variable_range: Option<(u32, u32)>,
    implicit_segments: Vec<ImplicitWeights>,
    defaults: CollationOptions,
}

impl Default for CollationTable {
    fn default() -> Self {
        Self {
            trie: CollationTrie::new(),
            variable_range: None,
            implicit_segments: DEFAULT_IMPLICIT_WEIGHTS.to_vec(),
            defaults: CollationOptions::default(),
        }
    }
}

impl CollationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table in the DUCET `allkeys.txt` format.
    pub fn from_allkeys(text: &str) -> Result<Self, TableError> {
        let mut table = Self::new();
        table.merge_allkeys(text)?;
        Ok(table)
    }

    /// Overlays entries and settings in `allkeys.txt` format on this table.
    pub fn with_tailoring(mut self, text: &str) -> Result<Self, TableError> {
        self.merge_allkeys(text)?;
        Ok(self)
    }

    pub fn insert(&mut self, cps: &[u32], ces: &[CollationElement]) {
        self.trie.insert(cps, ces);
    }

    /// Primaries in `range` are variable (punctuation, symbols and spaces).
    pub fn set_variable_range(&mut self, range: RangeInclusive<u32>) {
        self.variable_range = Some((*range.start(), *range.end()));
    }

    pub fn set_defaults(&mut self, defaults: CollationOptions) {
        self.defaults = defaults;
    }

    pub fn defaults(&self) -> &CollationOptions {
        &self.defaults
    }

    pub fn trie(&self) -> &CollationTrie {
        &self.trie
    }

    pub fn implicit_segments(&self) -> &[ImplicitWeights] {
        &self.implicit_segments
    }

    pub fn is_variable(&self, l1: u32) -> bool {
        self.variable_range
            .map_or(false, |(lo, hi)| lo <= l1 && l1 <= hi)
    }

    /// Collation elements for `cps` after variable weighting. `cps` is taken
    /// as already normalized.
    pub fn collation_elements(
        &self,
        cps: &[u32],
        options: &CollationOptions,
    ) -> Vec<CollationElement> {
        let settings = options.resolve(&self.defaults);
        let mut cps = cps.to_vec();
        let mut ces = Vec::with_capacity(cps.len() * 2);
        generate::s2(&mut cps, self, &settings, &mut ces, true);
        ces
    }

    //
    // Persistence
    //

    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        Self::from_bytes(&fs::read(path)?)
    }

    //
    // Parsing
    //

    fn merge_allkeys(&mut self, text: &str) -> Result<(), TableError> {
        let mut entries = 0usize;
        let mut variable: Option<(u32, u32)> = None;
        let mut implicit: Vec<ImplicitWeights> = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.split('#').next().unwrap_or_default().trim();

            if line.is_empty() {
                continue;
            }

            if let Some(directive) = line.strip_prefix('@') {
                if let Some(segment) = parse_implicit_weights(directive, line_no)? {
                    implicit.push(segment);
                }
                continue;
            }

            if line.starts_with('[') {
                self.parse_setting(line, line_no)?;
                continue;
            }

            let (left_of_semicolon, right_of_semicolon) = line
                .split_once(';')
                .ok_or_else(|| TableError::syntax(line_no, "expected `;`"))?;

            let re_key = regex!(r"[\dA-Fa-f]{4,6}");
            let key = re_key
                .find_iter(left_of_semicolon)
                .map(|m| parse_hex(m.as_str(), line_no))
                .collect::<Result<Vec<u32>, _>>()?;

            if key.is_empty() {
                return Err(TableError::syntax(line_no, "missing code points"));
            }

            let re_weights =
                regex!(r"\[([*.])([\dA-Fa-f]{4,8})\.([\dA-Fa-f]{4})\.([\dA-Fa-f]{4})\]");
            let mut ces = Vec::new();

            for cap in re_weights.captures_iter(right_of_semicolon) {
                let l1 = parse_hex(&cap[2], line_no)?;
                let l2 = parse_hex16(&cap[3], line_no)?;
                let l3 = parse_hex16(&cap[4], line_no)?;

                if &cap[1] == "*" {
                    variable = Some(match variable {
                        Some((lo, hi)) => (lo.min(l1), hi.max(l1)),
                        None => (l1, l1),
                    });
                }

                ces.push(CollationElement::new(l1, l2, tertiary_with_case(l3)));
            }

            if ces.is_empty() {
                return Err(TableError::syntax(line_no, "missing collation elements"));
            }

            self.trie.insert(&key, &ces);
            entries += 1;
        }

        if let Some((lo, hi)) = variable {
            self.variable_range = Some(match self.variable_range {
                Some((old_lo, old_hi)) => (old_lo.min(lo), old_hi.max(hi)),
                None => (lo, hi),
            });
        }

        if !implicit.is_empty() {
            // BBBB counts from the start of a script's first segment
            let firsts = implicit.clone();
            for segment in &mut implicit {
                segment.offset = firsts
                    .iter()
                    .filter(|s| s.base == segment.base)
                    .map(|s| s.first)
                    .min()
                    .unwrap_or(segment.first);
            }
            self.implicit_segments = implicit;
        }

        debug!(
            entries,
            keys = self.trie.len(),
            variable_range = ?self.variable_range,
            "parsed collation table"
        );

        Ok(())
    }

    // CLDR-style settings, e.g. `[alternate shifted]`
    fn parse_setting(&mut self, line: &str, line_no: usize) -> Result<(), TableError> {
        let re_setting = regex!(r"^\[\s*(\w+)\s+([\w-]+)\s*\]$");
        let cap = re_setting
            .captures(line)
            .ok_or_else(|| TableError::syntax(line_no, "malformed setting"))?;

        let unknown = || TableError::syntax(line_no, format!("unknown setting `{line}`"));

        match (&cap[1], &cap[2]) {
            ("strength", value) => {
                self.defaults.strength = Some(match value {
                    "1" => CollationStrength::Primary,
                    "2" => CollationStrength::Secondary,
                    "3" => CollationStrength::Tertiary,
                    "4" => CollationStrength::Quaternary,
                    "5" | "I" => CollationStrength::Identical,
                    _ => return Err(unknown()),
                });
            }
            ("alternate", "shifted") => self.defaults.weighting = Some(VariableWeighting::Shifted),
            ("alternate", "non-ignorable") => {
                self.defaults.weighting = Some(VariableWeighting::NonIgnorable);
            }
            ("caseFirst", "upper") => self.defaults.case_first = Some(CaseFirst::Upper),
            ("caseFirst", "lower") => self.defaults.case_first = Some(CaseFirst::Lower),
            ("caseFirst", "off") => self.defaults.case_first = Some(CaseFirst::Off),
            ("caseLevel", "on") => self.defaults.case_level = Some(CaseLevel::On),
            ("caseLevel", "off") => self.defaults.case_level = Some(CaseLevel::Off),
            ("backwards", "2") => self.defaults.l2_order = Some(L2WeightOrder::Backward),
            _ => return Err(unknown()),
        }

        Ok(())
    }
}

fn parse_implicit_weights(
    directive: &str,
    line_no: usize,
) -> Result<Option<ImplicitWeights>, TableError> {
    if !directive.starts_with("implicitweights") {
        // @version and friends
        return Ok(None);
    }

    let re_implicit =
        regex!(r"^implicitweights\s+([\dA-Fa-f]{4,6})\.\.([\dA-Fa-f]{4,6})\s*;\s*([\dA-Fa-f]{4})");
    let cap = re_implicit
        .captures(directive)
        .ok_or_else(|| TableError::syntax(line_no, "malformed @implicitweights"))?;

    let first = parse_hex(&cap[1], line_no)?;
    Ok(Some(ImplicitWeights {
        first,
        last: parse_hex(&cap[2], line_no)?,
        base: parse_hex16(&cap[3], line_no)?,
        offset: first,
    }))
}

fn parse_hex(s: &str, line_no: usize) -> Result<u32, TableError> {
    u32::from_str_radix(s, 16).map_err(|e| TableError::syntax(line_no, e.to_string()))
}

fn parse_hex16(s: &str, line_no: usize) -> Result<u16, TableError> {
    u16::from_str_radix(s, 16).map_err(|e| TableError::syntax(line_no, e.to_string()))
}
