//! GML exchange format.
//!
//! The writer emits the layout most graph tools expect: a `graph [...]`
//! block whose nodes carry a dense integer `id` and the original identifier
//! as a quoted `label`, followed by `edge` blocks keyed by those ids. The
//! reader accepts general GML and rebuilds a [`Network`] from node labels.

mod parser;

use std::io::Write;

use tracing::instrument;

use crate::{error::GmlError, network::Network};

pub use self::parser::read_gml;

const INDENT: &str = "  ";

/// Writes `network` as GML.
///
/// # Errors
/// Returns [`GmlError::Io`] if writing fails.
///
/// # Examples
/// ```
/// use netgauge_core::{Network, write_gml};
///
/// let network = Network::from_edges([(7, 9)]);
/// let mut out = Vec::new();
/// write_gml(&network, &mut out)?;
/// let text = String::from_utf8(out).expect("GML is UTF-8");
/// assert!(text.contains("label \"7\""));
/// assert!(text.contains("source 0"));
/// # Ok::<(), netgauge_core::GmlError>(())
/// ```
#[instrument(
    name = "core.write_gml",
    err,
    skip(network, writer),
    fields(nodes = network.node_count(), edges = network.edge_count()),
)]
pub fn write_gml<W: Write>(network: &Network, mut writer: W) -> Result<(), GmlError> {
    writeln!(writer, "graph [")?;
    for (id, label) in network.labels().enumerate() {
        writeln!(writer, "{INDENT}node [")?;
        writeln!(writer, "{INDENT}{INDENT}id {id}")?;
        writeln!(writer, "{INDENT}{INDENT}label \"{label}\"")?;
        writeln!(writer, "{INDENT}]")?;
    }
    for (source, target) in network.edge_indices() {
        writeln!(writer, "{INDENT}edge [")?;
        writeln!(writer, "{INDENT}{INDENT}source {source}")?;
        writeln!(writer, "{INDENT}{INDENT}target {target}")?;
        writeln!(writer, "{INDENT}]")?;
    }
    writeln!(writer, "]")?;
    writer.flush()?;
    Ok(())
}

/// Serialises `network` to an in-memory GML document.
///
/// # Errors
/// Returns [`GmlError::Io`] only if the in-memory writer fails.
pub fn to_gml_bytes(network: &Network) -> Result<Vec<u8>, GmlError> {
    let mut buffer = Vec::new();
    write_gml(network, &mut buffer)?;
    Ok(buffer)
}

/// Parses a GML document held in memory.
///
/// # Errors
/// See [`read_gml`].
pub fn from_gml_bytes(bytes: &[u8]) -> Result<Network, GmlError> {
    read_gml(bytes)
}

/// Derives the artifact name for an edge-list file name: every `.txt` is
/// replaced by `.gml`, and names without `.txt` get `.gml` appended.
///
/// # Examples
/// ```
/// use netgauge_core::gml_file_name;
///
/// assert_eq!(gml_file_name("friends.txt"), "friends.gml");
/// assert_eq!(gml_file_name("edges"), "edges.gml");
/// ```
#[must_use]
pub fn gml_file_name(input: &str) -> String {
    if input.contains(".txt") {
        input.replace(".txt", ".gml")
    } else {
        format!("{input}.gml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn writes_reference_layout() {
        let network = Network::from_edges([(5, 3)]);
        let text = String::from_utf8(to_gml_bytes(&network).expect("write")).expect("utf-8");
        let expected = "graph [\n  node [\n    id 0\n    label \"5\"\n  ]\n  node [\n    id 1\n    label \"3\"\n  ]\n  edge [\n    source 0\n    target 1\n  ]\n]\n";
        assert_eq!(text, expected);
    }

    #[rstest]
    #[case::plain("graph.txt", "graph.gml")]
    #[case::nested_dirs_untouched("data/run.txt", "data/run.gml")]
    #[case::every_occurrence("a.txt.txt", "a.gml.gml")]
    #[case::no_suffix("edges.csv", "edges.csv.gml")]
    fn derives_artifact_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(gml_file_name(input), expected);
    }

    #[rstest]
    fn round_trips_labels_and_edges() {
        let network = Network::from_edges([(-4, 10), (10, 12), (12, -4), (12, 99)]);
        let restored = from_gml_bytes(&to_gml_bytes(&network).expect("write")).expect("read");
        assert_eq!(
            restored.labels().collect::<Vec<_>>(),
            network.labels().collect::<Vec<_>>()
        );
        assert_eq!(restored.edge_count(), network.edge_count());
        for (left, right) in network.edges() {
            assert!(restored.contains_edge(left, right));
        }
    }
}
