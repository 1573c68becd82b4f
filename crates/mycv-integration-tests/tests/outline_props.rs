//! Property tests: the plain-text outline of an arbitrary record parses
//! back to the same tree, with the same nesting depth per section.

use mycv_core::{CvRecord, Mapping, Scalar, SectionContent};
use mycv_render::text::outline_nodes;
use mycv_render::{parse_outline, render_outline};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = SectionContent> {
    prop_oneof![
        Just(SectionContent::Scalar(Scalar::Null)),
        any::<bool>().prop_map(|b| SectionContent::Scalar(Scalar::Bool(b))),
        any::<i64>().prop_map(|i| SectionContent::Scalar(Scalar::Integer(i))),
        "[A-Za-z0-9 ,.{}\\[\\]]{0,16}".prop_map(SectionContent::string),
    ]
}

fn content() -> impl Strategy<Value = SectionContent> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(SectionContent::Sequence),
            prop::collection::vec(("[a-z][a-z_]{0,7}", inner), 0..4).prop_map(|entries| {
                let mut m = Mapping::new();
                for (k, v) in entries {
                    m.insert(k, v);
                }
                SectionContent::Mapping(m)
            }),
        ]
    })
}

fn record() -> impl Strategy<Value = CvRecord> {
    prop::collection::vec(("[a-z][a-z_]{0,11}", content()), 0..5).prop_map(|sections| {
        let mut r = CvRecord::new();
        for (heading, c) in sections {
            r.insert_section(heading, c);
        }
        r
    })
}

proptest! {
    #[test]
    fn outline_parses_back_to_its_nodes(r in record()) {
        let text = render_outline(&r);
        prop_assert_eq!(parse_outline(&text).unwrap(), outline_nodes(&r));
    }

    #[test]
    fn outline_has_one_root_per_section(r in record()) {
        let text = render_outline(&r);
        let roots = text.lines().filter(|l| !l.starts_with(' ')).count();
        prop_assert_eq!(roots, r.len());
    }

    #[test]
    fn parsed_depth_matches_content_depth(r in record()) {
        let parsed = parse_outline(&render_outline(&r)).unwrap();
        prop_assert_eq!(parsed.len(), r.len());
        for (node, (heading, content)) in parsed.iter().zip(r.iter()) {
            prop_assert_eq!(node.depth(), content.depth() + 1, "section {}", heading);
        }
    }
}
