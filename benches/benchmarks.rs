use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::cmp::Ordering;
use unitext::{
    bidirectional_transform, collate_str, compare_sort_keys, sort_key_str, CollationOptions,
    CollationStrength, CollationTable, TextSortKey,
};

const WORDS: [&str; 12] = [
    "death",
    "de luge",
    "de-luge",
    "deluge",
    "de Luge",
    "deLuge",
    "demark",
    "c\u{F4}t\u{E9}",
    "cote",
    "Ca\u{F1}a",
    "\u{AC01}",
    "\u{4E00}bc",
];

fn table() -> CollationTable {
    CollationTable::from_allkeys(include_str!("../test-data/allkeys_mini.txt")).unwrap()
}

fn ordered(table: &CollationTable, options: &CollationOptions) {
    let mut max_sk = TextSortKey::default();

    let mut words = WORDS;
    words.sort_by(|a, b| collate_str(a, b, table, options));

    for word in words {
        let sk = sort_key_str(word, table, options);

        let comparison = compare_sort_keys(&sk, &max_sk);
        if comparison == Ordering::Less {
            panic!();
        }

        max_sk = sk;
    }
}

fn non_ignorable(c: &mut Criterion) {
    let table = table();
    let options = CollationOptions::strength(CollationStrength::Tertiary);

    c.bench_function("non-ignorable", |b| b.iter(|| ordered(&table, &options)));
}

fn shifted(c: &mut Criterion) {
    let table = table();
    let options = CollationOptions::shifted(CollationStrength::Quaternary);

    c.bench_function("shifted", |b| b.iter(|| ordered(&table, &options)));
}

fn sort_keys(c: &mut Criterion) {
    let table = table();
    let options = CollationOptions::default();
    let text = WORDS.join(" ");

    c.bench_function("sort key", |b| {
        b.iter(|| sort_key_str(black_box(&text), &table, &options))
    });
}

fn bidi(c: &mut Criterion) {
    let text: Vec<char> = "Hello \u{5E9}\u{5DC}\u{5D5}\u{5DD} (123) \u{627}\u{644}\u{639}\u{627}\u{644}\u{645} 456!\n"
        .repeat(20)
        .chars()
        .collect();

    c.bench_function("bidi reorder", |b| {
        b.iter(|| bidirectional_transform(black_box(&text), None))
    });
}

criterion_group!(benches, non_ignorable, shifted, sort_keys, bidi);
criterion_main!(benches);
