// Unit tests for normalization and keyword scoring.
//
// Property-style checks over a fixed corpus of awkward inputs: entity-heavy
// markup, mixed whitespace, repeated and overlapping keywords.

use filingscan::keywords::scorer::score;
use filingscan::keywords::vocabulary::Vocabulary;
use filingscan::pipeline::normalize::normalize;

const CORPUS: &[&str] = &[
    "",
    "   ",
    "Item 1A. Risk Factors",
    "Tariffs\n\nand duties&nbsp;imposed under Section&#160;301",
    "&amp;amp;lt;p&amp;amp;gt; doubly escaped markup",
    "tabs\tand\r\ncarriage returns \u{2003} em space",
    "The trade war, the TRADE WAR, and trade-war rhetoric.",
    "&lt;&gt;&quot;&#39;&#x2014;",
    "exemptionsexemptions waiver/relief",
    "trade&nbspwar &amp duties&copy\u{1f}relief",
];

fn vocab() -> Vocabulary {
    Vocabulary::from_terms([
        "tariff",
        "tariffs",
        "duty",
        "duties",
        "trade war",
        "section 301",
        "exemption",
        "exemptions",
        "waiver",
        "relief",
        "exclusion",
    ])
}

// ============================================================
// normalize
// ============================================================

#[test]
fn normalize_is_idempotent() {
    for text in CORPUS {
        let once = normalize(text);
        assert_eq!(normalize(&once), once, "normalize not idempotent for {text:?}");
    }
}

#[test]
fn normalized_text_has_no_layout_whitespace() {
    for text in CORPUS {
        let n = normalize(text);
        assert!(!n.contains('\n'), "newline left in {n:?}");
        assert!(!n.contains("  "), "double space left in {n:?}");
        assert_eq!(n.trim(), n, "untrimmed output {n:?}");
    }
}

#[test]
fn normalize_makes_entity_keywords_countable() {
    let text = normalize("Tariffs\n\nand duties&nbsp;imposed under Section&#160;301");
    let counts = score(&text, &vocab());
    assert_eq!(counts.get("section 301"), Some(&1));
    assert_eq!(counts.get("duties"), Some(&1));
}

#[test]
fn semicolonless_entities_do_not_hide_keywords() {
    let text = normalize("a trade&nbspwar over duties&amp\u{1f}tariffs");
    assert_eq!(text, "a trade war over duties& tariffs");
    let counts = score(&text, &vocab());
    assert_eq!(counts.get("trade war"), Some(&1));
    assert_eq!(counts.get("tariffs"), Some(&1));
}

// ============================================================
// score
// ============================================================

#[test]
fn scores_are_sparse() {
    let vocab = vocab();
    for text in CORPUS {
        let counts = score(&normalize(text), &vocab);
        for (keyword, n) in &counts {
            assert!(*n >= 1, "{keyword} present with zero count");
        }
        for keyword in vocab.iter() {
            let occurs = normalize(text).to_lowercase().contains(&keyword.lowered);
            assert_eq!(
                counts.contains_key(&keyword.term),
                occurs,
                "presence of {} wrong for {text:?}",
                keyword.term
            );
        }
    }
}

#[test]
fn substring_matching_counts_inside_words() {
    let counts = score("exemptionsexemptions waiver/relief", &vocab());
    assert_eq!(counts["exemption"], 2);
    assert_eq!(counts["exemptions"], 2);
    assert_eq!(counts["waiver"], 1);
    assert_eq!(counts["relief"], 1);
}

#[test]
fn matching_ignores_case() {
    let counts = score("The trade war, the TRADE WAR, and trade-war rhetoric.", &vocab());
    assert_eq!(counts["trade war"], 2);
}

#[test]
fn empty_vocabulary_scores_nothing() {
    let counts = score("tariffs everywhere", &Vocabulary::default());
    assert!(counts.is_empty());
}
