use unitext::bidi::{AllowedLineBreaks, ExtentLineBreaks, LineBreak};
use unitext::{
    bidirectional_subranges, bidirectional_transform_with, embedding_levels,
    paragraph_embedding_level, reorder_str, BidiSubrange, LineBreakKind,
};

fn cps(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn arabic_with_digits() {
    // Digits after Arabic letters become AN and keep their order
    assert_eq!(
        reorder_str("\u{627}\u{644} 123", None),
        "123 \u{644}\u{627}"
    );
    assert_eq!(
        embedding_levels(&cps("\u{627}\u{644} 123"), None),
        vec![Some(1), Some(1), Some(1), Some(2), Some(2), Some(2)]
    );
}

#[test]
fn trailing_whitespace_takes_paragraph_level() {
    let text = cps("ab \u{5D0}\u{5D1}  ");
    assert_eq!(
        embedding_levels(&text, None),
        vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(0), Some(0)]
    );
    assert_eq!(reorder_str("ab \u{5D0}\u{5D1}  ", None), "ab \u{5D1}\u{5D0}  ");
}

#[test]
fn isolates_do_not_leak() {
    // RLI Hebrew PDI inside an English sentence
    let text = cps("a \u{2067}\u{5D0} 1\u{2069} b");
    assert_eq!(paragraph_embedding_level(&text), 0);
    assert_eq!(
        reorder_str("a \u{2067}\u{5D0} 1\u{2069} b", None),
        "a 1 \u{5D0} b"
    );
}

#[test]
fn allowed_breaks_in_rtl_text() {
    let text = cps("\u{5D0}\u{5D1} \u{5D2}\u{5D3}");
    assert_eq!(
        bidirectional_transform_with(&text, Some(1), AllowedLineBreaks),
        cps(" \u{5D1}\u{5D0}\n\u{5D3}\u{5D2}")
    );
}

#[test]
fn extent_breaks_measure_lines() {
    let text = cps("one two three four");
    let widths = ExtentLineBreaks::new(9, |cps: &[char]| cps.len());
    assert_eq!(
        bidirectional_transform_with(&text, None, widths),
        cps("one two \nthree \nfour")
    );
}

#[test]
fn custom_breakers_mark_possible_breaks() {
    let text = cps("ab\u{5D0}\u{5D1}");
    let halves = |cps: &[char], start: usize| LineBreak {
        position: (start + 2).min(cps.len()),
        hard: start + 2 >= cps.len(),
    };

    let markers: Vec<LineBreakKind> = unitext::bidirectional_subranges_with(&text, None, halves)
        .filter_map(|subrange| match subrange {
            BidiSubrange::LineBreak(kind) => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(markers, vec![LineBreakKind::Possible, LineBreakKind::Hard]);
}

#[test]
fn subranges_are_lazy() {
    let text: Vec<char> = "abc\n".repeat(1000).chars().collect();
    let first_two: Vec<BidiSubrange<'_>> = bidirectional_subranges(&text, None).take(2).collect();

    assert_eq!(
        first_two,
        vec![
            BidiSubrange::Span {
                cps: &text[0..4],
                range: 0..4,
                reversed: false,
            },
            BidiSubrange::LineBreak(LineBreakKind::Hard),
        ]
    );
}
