// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Tree Renderer
//!
//! Trees are generated with arbitrary nesting, tag names and interleaved
//! text children.

use cycle_runtime::render::{materialize, Element, MemorySurface, MountId, TreeRenderer};
use cycle_runtime::vdom::{h, VElement, VNode};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

fn arb_tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}"
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,8}"
}

fn arb_tree() -> impl Strategy<Value = VElement> {
    let leaf = arb_tag().prop_map(VElement::new);
    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            arb_tag(),
            prop::collection::vec(
                prop_oneof![
                    inner.prop_map(VNode::Element),
                    arb_text().prop_map(VNode::Text),
                ],
                0..4,
            ),
        )
            .prop_map(|(tag, children)| VElement::new(tag).with_children(children))
    })
}

fn mounted() -> (Arc<MemorySurface>, TreeRenderer) {
    let surface = Arc::new(MemorySurface::with_mount("#app").unwrap());
    let renderer = TreeRenderer::new(surface.clone(), MountId::parse("#app").unwrap());
    (surface, renderer)
}

/// Rendered tag names and element nesting mirror the descriptor
fn mirrors(element: &Element, tree: &VElement) -> bool {
    let element_children: Vec<&VElement> = tree
        .children
        .iter()
        .filter_map(|child| match child {
            VNode::Element(child) => Some(child),
            VNode::Text(_) => None,
        })
        .collect();

    element.tag_name == tree.tag.to_ascii_uppercase()
        && element.children.len() == element_children.len()
        && element
            .children
            .iter()
            .zip(element_children)
            .all(|(element, tree)| mirrors(element, tree))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Rendering the same tree twice is the same as rendering it once
    #[test]
    fn prop_rebuild_is_idempotent(tree in arb_tree()) {
        let (once_surface, once) = mounted();
        once.render(&tree).unwrap();

        let (twice_surface, twice) = mounted();
        twice.render(&tree).unwrap();
        twice.render(&tree).unwrap();

        let once_content = once_surface.content(once.mount()).unwrap();
        let twice_content = twice_surface.content(twice.mount()).unwrap();
        prop_assert_eq!(once_content.children, twice_content.children);
        prop_assert_eq!(twice_content.generation, 2);
    }

    /// Text children concatenate in declaration order
    #[test]
    fn prop_text_children_concatenate(tag in arb_tag(), a in arb_text(), b in arb_text()) {
        let children: Vec<VNode> = vec![a.clone().into(), b.clone().into()];
        let element = materialize(&h(tag, children)).unwrap();

        prop_assert!(element.children.is_empty());
        prop_assert_eq!(element.text_content(), format!("{}{}", a, b));
    }

    /// Nesting depth and tag names of the rendered tree mirror the input
    #[test]
    fn prop_shape_mirrors_descriptor(tree in arb_tree()) {
        let element = materialize(&tree).unwrap();

        prop_assert_eq!(element.depth(), tree.depth());
        prop_assert!(mirrors(&element, &tree));
    }

    /// The JSON descriptor form renders the same tree
    #[test]
    fn prop_json_descriptor_renders_same_tree(tree in arb_tree()) {
        let parsed = VElement::from_descriptor(&tree.to_descriptor()).unwrap();
        prop_assert_eq!(materialize(&parsed).unwrap(), materialize(&tree).unwrap());
    }
}
