//! End-position backfill over real stylesheets

use csspan_light::{LightNode, LightTree, LocationOrigin, NodeId, NodeKind, TransformConfig, transform};
use proptest::prelude::*;

fn build(css: &str) -> LightTree {
    transform(css, &TransformConfig::default()).unwrap().tree
}

/// Every node resolved, children inside parents, no partial overlaps
fn assert_well_nested(tree: &LightTree) {
    let ranges: Vec<_> = tree
        .iter()
        .map(|node| {
            assert!(node.is_resolved(), "{:?} ({}) unresolved", node.id, node.kind);
            tree.offset_range(node.id).unwrap()
        })
        .collect();

    for node in tree.iter() {
        if let Some(parent) = node.parent {
            let outer = ranges[parent.index()];
            let inner = ranges[node.id.index()];
            assert!(outer.covers(&inner), "{} {} escapes parent {}", node.kind, inner, outer);
        }
    }
    for (i, a) in ranges.iter().enumerate() {
        for b in &ranges[i + 1..] {
            assert!(!a.partially_overlaps(b), "{} partially overlaps {}", a, b);
        }
    }
}

// ============================================================================
// NESTED AT-RULES
// ============================================================================

const MEDIA_SAMPLE: &str =
    "@media (min-width: 990px) { .bg { background-color: red; } }\n.bg { background-color: green; }";

#[test]
fn test_media_block_ends_before_next_root() {
    let tree = build(MEDIA_SAMPLE);
    let roots = tree.roots();
    assert_eq!(roots.len(), 2);

    let first = tree.range(roots[0]).unwrap();
    let second = tree.range(roots[1]).unwrap();
    assert_eq!(first.end, second.start);
    assert_eq!(
        tree.text(roots[0]),
        Some("@media (min-width: 990px) { .bg { background-color: red; } }\n")
    );
    assert_eq!(tree.text(roots[1]), Some(".bg { background-color: green; }"));
}

#[test]
fn test_nested_rule_and_declaration_text() {
    let tree = build(MEDIA_SAMPLE);
    let media = tree.roots()[0];

    let inner = tree
        .children(media)
        .find(|node| node.kind == NodeKind::Rule)
        .unwrap();
    assert_eq!(inner.data.label, "style");
    assert_eq!(tree.text(inner.id), Some(".bg { background-color: red; }"));

    let decl = tree
        .children(inner.id)
        .find(|node| node.kind == NodeKind::Declaration)
        .unwrap();
    assert_eq!(decl.data.label, "background-color");
    assert_eq!(decl.data.location.map(|l| l.origin), Some(LocationOrigin::Scanned));
    assert_eq!(tree.text(decl.id), Some("background-color: red;"));

    let query = tree
        .children(media)
        .find(|node| node.kind == NodeKind::MediaQuery)
        .unwrap();
    assert_eq!(tree.text(query.id), Some("@media (min-width: 990px) { "));
}

#[test]
fn test_three_levels_of_at_rules() {
    let css = "@media screen {\n  @supports (display: grid) {\n    @media (min-width: 10px) {\n      .a { color: red; }\n    }\n  }\n}\n.b { top: 0; }\n";
    let tree = build(css);
    assert_well_nested(&tree);

    let rules: Vec<_> = tree.iter().filter(|node| node.kind == NodeKind::Rule).collect();
    assert_eq!(rules.len(), 5);
    assert_eq!(rules[0].depth, 0);
    assert_eq!(rules[1].depth, 1);
    assert_eq!(rules[2].depth, 2);
    assert_eq!(rules[3].depth, 3);
    assert_eq!(tree.text(rules[3].id), Some(".a { color: red; }"));
    assert_eq!(
        tree.text(rules[2].id),
        Some("@media (min-width: 10px) {\n      .a { color: red; }\n    }")
    );
    assert_eq!(
        tree.text(rules[1].id),
        Some("@supports (display: grid) {\n    @media (min-width: 10px) {\n      .a { color: red; }\n    }\n  }")
    );
    assert_eq!(tree.text(rules[4].id), Some(".b { top: 0; }\n"));
}

// ============================================================================
// WHOLE STYLESHEETS
// ============================================================================

const STYLESHEET: &str = r#"@import url("theme.css");

:root {
  --accent: #0af;
  --gap: 4px;
}

/* cards */
.card {
  color: var(--accent);
  background-image: url(bg.png);
  transition: opacity 200ms ease-in;
  padding: env(safe-area-inset-top, 8px);
}

@keyframes spin {
  from { transform: rotate(0deg); }
  to { transform: rotate(360deg); }
}

@media (min-resolution: 2dppx) and (aspect-ratio: 16/9) {
  .card { border-color: red blue; }
}
"#;

#[test]
fn test_full_coverage() {
    let tree = build(STYLESHEET);
    assert!(!tree.is_empty());
    assert_well_nested(&tree);

    // Every byte between the first and last root belongs to some root
    let roots = tree.roots();
    for pair in roots.windows(2) {
        let a = tree.offset_range(pair[0]).unwrap();
        let b = tree.offset_range(pair[1]).unwrap();
        assert_eq!(a.end, b.start);
    }
    let last = tree.offset_range(*roots.last().unwrap()).unwrap();
    assert_eq!(last.end, STYLESHEET.len());
}

#[test]
fn test_scanned_locations_point_at_signatures() {
    let tree = build(STYLESHEET);
    for node in tree.iter() {
        let Some(location) = node.data.location else { continue };
        if location.origin != LocationOrigin::Scanned {
            continue;
        }
        let text = tree.text(node.id).unwrap();
        match node.kind {
            NodeKind::Declaration => assert!(text.starts_with(&node.data.label), "{}", text),
            NodeKind::Variable => assert!(text.starts_with("var("), "{}", text),
            NodeKind::EnvironmentVariable => assert!(text.starts_with("env("), "{}", text),
            NodeKind::Url => assert!(text.starts_with("url("), "{}", text),
            _ => {}
        }
    }
}

#[test]
fn test_rule_labels() {
    let tree = build(STYLESHEET);
    let labels: Vec<&str> = tree
        .roots()
        .iter()
        .map(|&id| tree.get(id).unwrap().data.label.as_str())
        .collect();
    assert_eq!(labels, vec!["import", "style", "style", "keyframes", "media"]);
}

#[test]
fn test_idempotent() {
    let first = build(STYLESHEET).summary();
    let second = build(STYLESHEET).summary();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_dump_outline() {
    let tree = build(".a { color: red; }");
    let dump = tree.dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Rule: style (0:0)"));
    assert!(lines[1].starts_with("  Selector: class"));
    assert!(lines[2].starts_with("  Declaration: color (~0:5)"));
    assert!(lines[3].starts_with("    Color: "));
}

#[test]
fn test_declaration_lookup_by_offset() {
    let result = transform(".bg { background-color: red; }", &TransformConfig::default()).unwrap();
    let id = result.store.node_at_offset(6).unwrap();
    let node = result.tree.get(id).unwrap();
    assert_eq!(node.kind, NodeKind::Declaration);
    assert_eq!(node.data.label, "background-color");

    let rule = result.store.node_at_offset(0).unwrap();
    assert_eq!(result.tree.get(rule).unwrap().kind, NodeKind::Selector);
    let brace = result.store.node_at_offset(29).unwrap();
    assert_eq!(result.tree.get(brace).unwrap().kind, NodeKind::Rule);
}

// ============================================================================
// ENGINE ORDERING
// ============================================================================

fn child<'t>(tree: &'t LightTree, parent: NodeId, kind: NodeKind, label: &str) -> &'t LightNode {
    tree.children(parent)
        .find(|node| node.kind == kind && node.data.label == label)
        .unwrap_or_else(|| panic!("no {} {} under {:?}", kind, label, parent))
}

#[test]
fn test_important_declaration_after_normal_one() {
    let css = ".a { top: 0; color: red !important; left: 1px }\n.b { top: 1px }";
    let result = transform(css, &TransformConfig::default()).unwrap();
    let tree = &result.tree;
    assert_well_nested(tree);

    let rule = tree.roots()[0];
    let labels: Vec<&str> = tree.children(rule).map(|node| node.data.label.as_str()).collect();
    assert_eq!(labels, vec!["class", "top", "color", "left"]);

    assert_eq!(tree.text(child(tree, rule, NodeKind::Selector, "class").id), Some(".a { "));
    assert_eq!(tree.text(child(tree, rule, NodeKind::Declaration, "top").id), Some("top: 0; "));
    let color = child(tree, rule, NodeKind::Declaration, "color");
    assert_eq!(tree.text(color.id), Some("color: red !important; "));
    let value = tree.children(color.id).next().unwrap();
    assert_eq!(tree.text(value.id), Some("color: red !important"));
    assert_eq!(tree.text(child(tree, rule, NodeKind::Declaration, "left").id), Some("left: 1px"));

    let id = result.store.node_at_offset(css.find("red").unwrap()).unwrap();
    assert_eq!(tree.get(id).unwrap().data.label, "color");
}

#[test]
fn test_view_transition_is_a_located_root() {
    let css = ".a { top: 0 }\n@view-transition { navigation: auto; }\n.b { top: 1px }";
    let result = transform(css, &TransformConfig::default()).unwrap();
    let tree = &result.tree;
    assert_well_nested(tree);

    let roots = tree.roots();
    let labels: Vec<&str> = roots.iter().map(|&id| tree.get(id).unwrap().data.label.as_str()).collect();
    assert_eq!(labels, vec!["style", "view-transition", "style"]);
    assert_eq!(tree.text(roots[0]), Some(".a { top: 0 }\n"));
    assert_eq!(tree.text(roots[1]), Some("@view-transition { navigation: auto; }\n"));
    assert_eq!(tree.text(roots[2]), Some(".b { top: 1px }"));
    assert_eq!(tree.text(child(tree, roots[0], NodeKind::Declaration, "top").id), Some("top: 0"));

    let id = result.store.node_at_offset(2).unwrap();
    assert_eq!(tree.get(id).unwrap().parent, Some(roots[0]));
}

#[test]
fn test_declarations_after_nested_rule_belong_to_parent() {
    let css = ".a { .b { top: 0 } color: red; }";
    let tree = build(css);
    assert_well_nested(&tree);

    let outer = tree.roots()[0];
    let inner = child(&tree, outer, NodeKind::Rule, "style");
    assert_eq!(tree.text(inner.id), Some(".b { top: 0 } "));
    assert_eq!(tree.text(child(&tree, inner.id, NodeKind::Declaration, "top").id), Some("top: 0"));

    let color = child(&tree, outer, NodeKind::Declaration, "color");
    assert_eq!(tree.text(color.id), Some("color: red;"));
    let value = tree.children(color.id).next().unwrap();
    assert_eq!(value.kind, NodeKind::Color);
    assert_eq!(tree.text(value.id), Some("color: red"));
}

#[test]
fn test_function_and_selector_details() {
    let tree = build(".a > p { --w: shift(1px 2px); }");
    let dump = tree.dump();
    assert!(dump.contains("Selector: class combinator type"), "{}", dump);
    assert!(dump.contains("Function: shift "), "{}", dump);
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn stylesheet_strategy() -> impl Strategy<Value = String> {
    let decl = prop::sample::select(vec![
        "color: red;",
        "top: 0;",
        "margin: 1px 2px;",
        "width: calc(100% - 2px);",
        "--size: 1px solid;",
        "height: var(--size);",
        "left: 1px !important;",
        "color: blue !important;",
        "/* note */",
    ]);
    let nested = (
        prop::sample::select(vec!["& .n", "& > .m", "&:hover"]),
        prop::collection::vec(decl.clone(), 1..3),
    )
        .prop_map(|(selector, decls)| format!("{} {{ {} }}", selector, decls.join(" ")));
    let style = (
        prop::sample::select(vec![".a", "#b", "div > p", ".c:hover", ".d, .e"]),
        prop::collection::vec(decl, 0..4),
        prop::option::of(nested),
        any::<bool>(),
    )
        .prop_map(|(selector, decls, nested, nested_first)| {
            let decls = decls.join(" ");
            let body = match nested {
                Some(nested) if nested_first => format!("{} {}", nested, decls),
                Some(nested) => format!("{} {}", decls, nested),
                None => decls,
            };
            format!("{} {{ {} }}", selector, body)
        });

    let rule = style.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..3)
                .prop_map(|rules| format!("@media (min-width: 10px) {{\n{}\n}}", rules.join("\n"))),
            prop::collection::vec(inner, 1..3)
                .prop_map(|rules| format!("@supports (display: grid) {{ {} }}", rules.join(" "))),
        ]
    });
    let at_rule = prop::sample::select(vec![
        "@view-transition { navigation: auto; }",
        "@font-feature-values Font One { @styleset { nice-style: 12; } }",
        "@position-try --pos { top: 0; left: 1px; }",
    ])
    .prop_map(String::from);

    (
        prop::collection::vec(prop_oneof![3 => rule, 1 => at_rule], 1..5),
        any::<bool>(),
    )
        .prop_map(|(rules, comments)| rules.join(if comments { "\n/* between */\n" } else { "\n" }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_ranges_nest(css in stylesheet_strategy()) {
        let tree = build(&css);
        assert_well_nested(&tree);
        let last = tree.offset_range(*tree.roots().last().unwrap()).unwrap();
        prop_assert_eq!(last.end, css.len());
    }

    #[test]
    fn prop_transform_is_idempotent(css in stylesheet_strategy()) {
        prop_assert_eq!(build(&css).summary(), build(&css).summary());
    }
}
