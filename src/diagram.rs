//! Tree diagrams
//!
//! Renders the decision tree as an indented outline or as Graphviz DOT
//! source. Image rasterization is left to external tooling (`dot -Tpng`).

use std::fmt::Write;

use crate::tree::{DecisionNode, DecisionTree};

/// Indented outline, one node per line
pub fn render_text(tree: &DecisionTree) -> String {
    let mut out = String::new();
    write_outline(&mut out, tree.root(), "root", 0);
    out
}

fn write_outline(out: &mut String, node: &DecisionNode, edge: &str, indent: usize) {
    let pad = "  ".repeat(indent);
    match node {
        DecisionNode::Leaf(label) => {
            let _ = writeln!(out, "{pad}{edge} -> {label}");
        }
        DecisionNode::Internal {
            feature,
            threshold,
            left,
            right,
        } => {
            let _ = writeln!(out, "{pad}{edge}: {feature} <= {threshold}");
            write_outline(out, left, "left ", indent + 1);
            write_outline(out, right, "right", indent + 1);
        }
    }
}

/// Graphviz DOT source for the tree.
///
/// Node ids are assigned in pre-order starting at 0. Left edges are labelled
/// `yes`, right edges `no`.
pub fn render_dot(tree: &DecisionTree) -> String {
    let mut out = String::from("digraph {\n");
    let mut next_id = 0usize;
    write_dot_node(&mut out, tree.root(), &mut next_id);
    out.push_str("}\n");
    out
}

fn write_dot_node(out: &mut String, node: &DecisionNode, next_id: &mut usize) -> usize {
    let id = *next_id;
    *next_id += 1;

    match node {
        DecisionNode::Leaf(label) => {
            let _ = writeln!(
                out,
                "\t{id} [label=\"Result: {label}\" fillcolor=lightblue shape=box style=filled]"
            );
        }
        DecisionNode::Internal {
            feature,
            threshold,
            left,
            right,
        } => {
            let _ = writeln!(out, "\t{id} [label=\"{feature} <= {threshold}\"]");
            let yes = write_dot_node(out, left, next_id);
            let no = write_dot_node(out, right, next_id);
            let _ = writeln!(out, "\t{id} -> {yes} [label=yes]");
            let _ = writeln!(out, "\t{id} -> {no} [label=no]");
        }
    }

    id
}
