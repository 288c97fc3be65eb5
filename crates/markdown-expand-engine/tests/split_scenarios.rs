use markdown_expand_engine::{
    Block, OutputDocument, ParseOptions, SplitOptions, parse_blocks, split, split_with,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const GUIDE: &str = "# Guide *intro*

Welcome.

## Setup

```sh
cargo install
```

# Usage

- one
- two

### Deep

> quote

# Appendix
";

fn render(docs: &[OutputDocument]) -> String {
    docs.iter()
        .map(|d| format!("=== {} ===\n{}", d.title, d.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn heading_levels(content: &str) -> Vec<(u8, String)> {
    parse_blocks(content, &ParseOptions::default())
        .blocks
        .iter()
        .filter_map(Block::as_heading)
        .map(|h| (h.level(), h.content().to_string()))
        .collect()
}

#[test]
fn guide_splits_into_three_documents() {
    let docs = split(GUIDE).unwrap();

    insta::assert_snapshot!(render(&docs), @r"
=== Guide *intro* ===
Welcome.

# Setup

```sh
cargo install
```

=== Usage ===
- one
- two

## Deep

> quote

=== Appendix ===
");
}

#[rstest]
#[case::guide(GUIDE)]
#[case::example("# Intro\nSome text.\n# Chapter One\n## Section A\nBody A.\n# Chapter Two\nBody B.")]
#[case::preamble("preface\n\n## stray\n\n# One\n### three\n# Two\n###### six")]
#[case::setext("Title\n=====\n\nSub\n---\n\ntext\n\n# Next")]
#[case::no_anchor("## two\n\n### three")]
#[case::empty("")]
fn count_and_order_follow_anchors(#[case] md: &str) {
    let anchors: Vec<String> = heading_levels(md)
        .into_iter()
        .filter(|(level, _)| *level == 1)
        .map(|(_, content)| content)
        .collect();

    let docs = split(md).unwrap();
    let titles: Vec<String> = docs.iter().map(|d| d.title.clone()).collect();

    assert_eq!(titles, anchors);
}

#[test]
fn nested_headings_lose_one_level() {
    let md = "# Top\n## two\n### three\n#### four\n##### five\n###### six\n";

    let docs = split(md).unwrap();

    assert_eq!(
        heading_levels(&docs[0].content),
        vec![
            (1, "two".to_string()),
            (2, "three".to_string()),
            (3, "four".to_string()),
            (4, "five".to_string()),
            (5, "six".to_string()),
        ]
    );
}

#[test]
fn anchor_never_appears_in_its_own_body() {
    let docs = split("# Alpha\nalpha body\n## Beta\n# Gamma\n").unwrap();

    for doc in &docs {
        let headings = heading_levels(&doc.content);
        assert!(headings.iter().all(|(_, content)| *content != doc.title));
    }
}

#[rstest]
#[case("# *emphasis*", "*emphasis*")]
#[case("# __strong__ words", "__strong__ words")]
#[case("# `code` span", "`code` span")]
#[case("# [link](https://example.com \"t\")", "[link](https://example.com \"t\")")]
#[case("#    padded   ", "padded")]
#[case("# closed ##", "closed")]
#[case("Setext *title*\n===", "Setext *title*")]
#[case("# \\#1 issue", "\\#1 issue")]
#[case("# \\*not emphasis*", "\\*not emphasis*")]
fn title_keeps_inline_markdown(#[case] md: &str, #[case] title: &str) {
    let docs = split(md).unwrap();
    assert_eq!(docs, vec![OutputDocument::new(title, "")]);
}

#[rstest]
#[case::escaped_emphasis("# A\n## \\*lit*\n", "# \\*lit*\n")]
#[case::escaped_link("# A\n## \\[x](y)\n", "# \\[x](y)\n")]
fn escaped_body_headings_stay_literal(#[case] md: &str, #[case] content: &str) {
    let docs = split(md).unwrap();
    assert_eq!(docs, vec![OutputDocument::new("A", content)]);
}

#[test]
fn opaque_blocks_pass_through_unchanged() {
    let md = "# Doc\n\n<details>\n<summary>More</summary>\n</details>\n\n1. first\n2. second\n\n***\n\n~~~\n# not a heading\n~~~\n";

    let docs = split(md).unwrap();

    assert_eq!(
        docs[0].content,
        "<details>\n<summary>More</summary>\n</details>\n\n1. first\n2. second\n\n***\n\n~~~\n# not a heading\n~~~\n"
    );
}

#[test]
fn link_definitions_stay_with_their_section() {
    let md = "# One\nSee [docs].\n\n[docs]: https://example.com\n# Two\nOther.\n";

    let docs = split(md).unwrap();

    assert_eq!(
        docs,
        vec![
            OutputDocument::new("One", "See [docs].\n\n[docs]: https://example.com\n"),
            OutputDocument::new("Two", "Other.\n"),
        ]
    );
}

#[rstest]
#[case::separate(
    "# A\n\n[x]: /a\n\n[x]: /b\n\ntext [x]",
    "[x]: /a\n\n[x]: /b\n\ntext [x]\n"
)]
#[case::adjacent("# A\n\n[x]: /a\n[X]: /b\n", "[x]: /a\n[X]: /b\n")]
fn repeated_definition_labels_survive(#[case] md: &str, #[case] content: &str) {
    let docs = split(md).unwrap();
    assert_eq!(docs, vec![OutputDocument::new("A", content)]);
}

#[test]
fn gfm_tables_and_footnotes_pass_through() {
    let md = "# Data\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nNote[^1].\n\n[^1]: The footnote.\n";
    let options = SplitOptions {
        parse: ParseOptions { gfm: true },
        ..SplitOptions::default()
    };

    let docs = split_with(md, &options).unwrap();

    assert_eq!(
        docs[0].content,
        "| a | b |\n|---|---|\n| 1 | 2 |\n\nNote[^1].\n\n[^1]: The footnote.\n"
    );
}

#[test]
fn independent_splits_on_threads_agree() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| split(GUIDE).unwrap()))
        .collect();

    let expected = split(GUIDE).unwrap();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
