#![warn(clippy::pedantic)]

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use unitext::props::{bidi_class, isolate_control};
use unitext::{
    bidirectional_subranges, collation_sort_key, compare_sort_keys, embedding_levels,
    CollationOptions, CollationStrength, CollationTable, TextSortKey,
};

const USAGE: &str = "usage:
    unitext collation <allkeys.txt> <CollationTest_X.txt> [shifted]
    unitext bidi <BidiCharacterTest.txt>";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("unitext=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let (passed, failed) = match args.as_slice() {
        ["collation", allkeys, test_file] => collation(allkeys, test_file, false)?,
        ["collation", allkeys, test_file, "shifted"] => collation(allkeys, test_file, true)?,
        ["bidi", test_file] => bidi(test_file)?,
        _ => bail!("{USAGE}"),
    };

    println!("{passed} passed, {failed} failed");
    if failed > 0 {
        bail!("{failed} conformance lines failed");
    }
    Ok(())
}

fn read(path: &str) -> Result<String> {
    fs::read_to_string(Path::new(path)).with_context(|| format!("Failed to read {path}"))
}

fn parse_hex(s: &str) -> Result<u32> {
    u32::from_str_radix(s, 16).with_context(|| format!("Bad code point `{s}`"))
}

//
// Collation
//

fn collation(allkeys: &str, path: &str, shifted: bool) -> Result<(usize, usize)> {
    let table = CollationTable::from_allkeys(&read(allkeys)?)
        .with_context(|| format!("Failed to parse {allkeys}"))?;

    let options = if shifted {
        CollationOptions::shifted(CollationStrength::Quaternary)
    } else {
        CollationOptions::strength(CollationStrength::Tertiary)
    };
    debug!(?options, "collation conformance");

    let test_data = read(path)?;
    let mut max_sk = TextSortKey::default();
    let (mut passed, mut failed) = (0, 0);

    for (i, line) in test_data.lines().enumerate() {
        let line = line
            .split(|c: char| c == ';' || c == '#')
            .next()
            .unwrap_or_default()
            .trim();
        if line.is_empty() {
            continue;
        }

        // The test data deliberately includes surrogates, so stay with u32
        let cps = line
            .split_whitespace()
            .map(parse_hex)
            .collect::<Result<Vec<u32>>>()
            .with_context(|| format!("{path}:{}", i + 1))?;

        let sk = collation_sort_key(&cps, &table, &options);
        if compare_sort_keys(&sk, &max_sk).is_lt() {
            warn!(line = i + 1, text = line, "sorts before the previous line");
            failed += 1;
        } else {
            passed += 1;
        }

        max_sk = sk;
    }

    info!(path, passed, failed, "collation conformance done");
    Ok((passed, failed))
}

//
// Bidi
//

fn bidi(path: &str) -> Result<(usize, usize)> {
    let test_data = read(path)?;
    let (mut passed, mut failed) = (0, 0);

    for (i, line) in test_data.lines().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 5 {
            bail!("{path}:{}: expected 5 fields", i + 1);
        }

        let text = fields[0]
            .split_whitespace()
            .map(|s| {
                let cp = parse_hex(s)?;
                char::from_u32(cp).with_context(|| format!("Not a scalar value: {s}"))
            })
            .collect::<Result<Vec<char>>>()
            .with_context(|| format!("{path}:{}", i + 1))?;

        let forced = match fields[1].trim() {
            "0" => Some(0),
            "1" => Some(1),
            _ => None,
        };

        let expected_levels: Vec<Option<u8>> = fields[3]
            .split_whitespace()
            .map(|level| level.parse().ok())
            .collect();

        let expected_order = fields[4]
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<usize>, _>>()
            .with_context(|| format!("{path}:{}", i + 1))?
            .into_iter()
            .filter(|&index| {
                text.get(index)
                    .map_or(true, |&cp| !isolate_control(bidi_class(cp)))
            })
            .collect::<Vec<usize>>();

        let levels = embedding_levels(&text, forced);
        let order: Vec<usize> = bidirectional_subranges(&text, forced)
            .flat_map(|subrange| subrange.indices())
            .collect();

        if levels == expected_levels && order == expected_order {
            passed += 1;
        } else {
            warn!(
                line = i + 1,
                levels = ?levels,
                expected_levels = ?expected_levels,
                order = ?order,
                expected_order = ?expected_order,
                "bidi mismatch"
            );
            failed += 1;
        }
    }

    info!(path, passed, failed, "bidi conformance done");
    Ok((passed, failed))
}
