//! Snapshot tests pinning the segment filter's reference behavior.
//!
//! The filter output feeds directly into folder names on disk, so the
//! exact mapping for the usual title shapes is pinned here; any change
//! to it is a migration for every mirrored tree.

use mirror_tree::{FolderPath, SegmentFilter};

#[test]
fn test_segment_filter_reference_table() {
    let filter = SegmentFilter::new();
    let inputs = [
        "Create Page Test",
        "About Us",
        "News & Events",
        "Q1/Q2: Results",
        "C++ FAQ",
        "100% Pure!!",
        "already-good",
        "CAPS LOCK",
    ];
    let table = inputs
        .iter()
        .map(|input| format!("{:?} => {:?}", input, filter.filter(input)))
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(table, @r###"
"Create Page Test" => "create-page-test"
"About Us" => "about-us"
"News & Events" => "news-and-events"
"Q1/Q2: Results" => "q1-q2-results"
"C++ FAQ" => "c-faq"
"100% Pure!!" => "100-pure"
"already-good" => "already-good"
"CAPS LOCK" => "caps-lock"
"###);
}

#[test]
fn test_path_normalization_reference_table() {
    let inputs = [
        "Articles/news",
        "/Articles/news/",
        "Articles\\news\\local",
        "Articles//news",
        "/",
        "",
    ];
    let table = inputs
        .iter()
        .map(|input| format!("{:?} => {:?}", input, FolderPath::new(input).as_str()))
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(table, @r###"
"Articles/news" => "Articles/news"
"/Articles/news/" => "Articles/news"
"Articles\\news\\local" => "Articles/news/local"
"Articles//news" => "Articles/news"
"/" => ""
"" => ""
"###);
}
