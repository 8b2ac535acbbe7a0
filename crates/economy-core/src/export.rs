//! Graphviz DOT export of an item graph.

use crate::graph::ItemGraph;
use std::io::{self, Write};

/// Write a DOT description of `graph` to `out`.
///
/// Nodes are labelled with their producer's operation tag; edges follow
/// registration order.
pub fn write_dot<W: Write>(graph: &ItemGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph economy {{")?;
    for (_, node) in graph.items() {
        writeln!(
            out,
            "    \"{}\" [handler=\"{}\"];",
            escape(node.name()),
            escape(node.producer().operation())
        )?;
    }
    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.name_of(edge.producer), graph.name_of(edge.consumer))
        else {
            continue;
        };
        writeln!(out, "    \"{}\" -> \"{}\";", escape(from), escape(to))?;
    }
    writeln!(out, "}}")
}

impl ItemGraph {
    /// Render the graph as a DOT string.
    pub fn to_dot(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = write_dot(self, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::reference_graph;
    use crate::test_utils::graph_from_edges;

    #[test]
    fn reference_dot_lists_nodes_and_edges() {
        let dot = reference_graph().unwrap().to_dot();

        assert!(dot.starts_with("digraph economy {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("    \"iron\" [handler=\"mine_iron\"];\n"));
        assert!(dot.contains("    \"meal\" [handler=\"have_meal\"];\n"));
        assert!(dot.contains("    \"cow\" -> \"steak\";\n"));
        assert!(dot.contains("    \"steak\" -> \"meal\";\n"));
        assert_eq!(dot.matches(" -> ").count(), 7);
    }

    #[test]
    fn names_are_escaped() {
        let graph = graph_from_edges(&["say \"hi\"", "c:\\dir"], &[("say \"hi\"", "c:\\dir")]);
        let dot = graph.to_dot();
        assert!(dot.contains(r#""say \"hi\"" -> "c:\\dir";"#));
    }

    #[test]
    fn write_dot_to_sink() {
        let graph = graph_from_edges(&["a"], &[]);
        let mut out = Vec::new();
        write_dot(&graph, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "digraph economy {\n    \"a\" [handler=\"a\"];\n}\n"
        );
    }
}
