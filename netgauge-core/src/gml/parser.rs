//! Tokenizer and reader for GML documents.

use std::collections::HashMap;
use std::io::BufRead;
use std::vec::IntoIter;

use tracing::{Span, field, instrument};

use crate::{
    error::GmlError,
    network::{Network, NodeId},
};

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Open,
    Close,
    Key(String),
    Number(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    line: usize,
}

impl Token {
    fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Open => "[".to_owned(),
            TokenKind::Close => "]".to_owned(),
            TokenKind::Key(text) | TokenKind::Number(text) => text.clone(),
            TokenKind::Text(text) => format!("\"{text}\""),
        }
    }

    fn unexpected(&self) -> GmlError {
        GmlError::UnexpectedToken {
            token: self.describe(),
            line: self.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Real(f64),
    Text(String),
    List(Vec<(String, Value)>),
}

impl Value {
    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, GmlError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '[' | ']' => {
                chars.next();
                let kind = if ch == '[' {
                    TokenKind::Open
                } else {
                    TokenKind::Close
                };
                tokens.push(Token { kind, line });
            }
            '"' => {
                chars.next();
                let start = line;
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            text.push(c);
                        }
                        None => {
                            return Err(GmlError::UnexpectedEof {
                                expected: "closing quote",
                            });
                        }
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Text(text),
                    line: start,
                });
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                let mut text = String::new();
                while let Some(c) = chars.next_if(|c| {
                    c.is_ascii_alphanumeric() || matches!(*c, '-' | '+' | '.')
                }) {
                    text.push(c);
                }
                tokens.push(Token {
                    kind: TokenKind::Number(text),
                    line,
                });
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut text = String::new();
                while let Some(c) = chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '_') {
                    text.push(c);
                }
                tokens.push(Token {
                    kind: TokenKind::Key(text),
                    line,
                });
            }
            other => {
                return Err(GmlError::UnexpectedToken {
                    token: other.to_string(),
                    line,
                });
            }
        }
    }
    Ok(tokens)
}

/// Deepest list nesting accepted; real documents rarely exceed four levels.
const MAX_NESTING: usize = 64;

struct Parser {
    tokens: IntoIter<Token>,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            depth: 0,
        }
    }

    fn document(mut self) -> Result<Vec<(String, Value)>, GmlError> {
        self.list(false)
    }

    fn list(&mut self, nested: bool) -> Result<Vec<(String, Value)>, GmlError> {
        let mut entries = Vec::new();
        loop {
            let Some(token) = self.tokens.next() else {
                if nested {
                    return Err(GmlError::UnexpectedEof { expected: "`]`" });
                }
                return Ok(entries);
            };
            match &token.kind {
                TokenKind::Key(key) => {
                    let value = self.value()?;
                    entries.push((key.clone(), value));
                }
                TokenKind::Close if nested => return Ok(entries),
                _ => return Err(token.unexpected()),
            }
        }
    }

    fn value(&mut self) -> Result<Value, GmlError> {
        let token = self
            .tokens
            .next()
            .ok_or(GmlError::UnexpectedEof { expected: "value" })?;
        match &token.kind {
            TokenKind::Open => {
                if self.depth == MAX_NESTING {
                    return Err(GmlError::NestingTooDeep { depth: MAX_NESTING });
                }
                self.depth += 1;
                let entries = self.list(true)?;
                self.depth -= 1;
                Ok(Value::List(entries))
            }
            TokenKind::Text(text) => Ok(Value::Text(text.clone())),
            TokenKind::Number(text) => {
                if let Ok(value) = text.parse::<i64>() {
                    Ok(Value::Int(value))
                } else if let Ok(value) = text.parse::<f64>() {
                    Ok(Value::Real(value))
                } else {
                    Err(token.unexpected())
                }
            }
            TokenKind::Close | TokenKind::Key(_) => Err(token.unexpected()),
        }
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find_map(|(name, value)| (name == key).then_some(value))
}

fn node_label(entries: &[(String, Value)], id: i64) -> Result<NodeId, GmlError> {
    match lookup(entries, "label") {
        None => Ok(id),
        Some(Value::Int(label)) => Ok(*label),
        Some(Value::Text(label)) => label
            .trim()
            .parse::<NodeId>()
            .map_err(|_| GmlError::InvalidLabel {
                label: label.clone(),
            }),
        Some(Value::Real(label)) => Err(GmlError::InvalidLabel {
            label: label.to_string(),
        }),
        Some(Value::List(_)) => Err(GmlError::InvalidLabel {
            label: "[...]".to_owned(),
        }),
    }
}

fn endpoint(
    entries: &[(String, Value)],
    field: &'static str,
    nodes: &HashMap<i64, NodeId>,
) -> Result<NodeId, GmlError> {
    let id = lookup(entries, field)
        .and_then(Value::as_int)
        .ok_or(GmlError::MissingEndpoint { field })?;
    nodes
        .get(&id)
        .copied()
        .ok_or(GmlError::UnknownEndpoint { id })
}

/// Reads a GML document into a [`Network`].
///
/// Node identifiers come from each node's `label`, parsed as an integer; a
/// node without a label uses its GML `id`. Edges reference GML ids through
/// `source` and `target`. Unknown keys are skipped, so documents from other
/// tools (with `directed`, `graphics`, or weight attributes) load unchanged.
/// Self-loops and repeated edges are dropped as they are for edge lists.
///
/// # Errors
/// Returns a [`GmlError`] describing the first syntactic or structural
/// problem in the document.
///
/// # Examples
/// ```
/// use netgauge_core::read_gml;
///
/// let text = "graph [ node [ id 0 label \"7\" ] node [ id 1 label \"9\" ] edge [ source 0 target 1 ] ]";
/// let network = read_gml(text.as_bytes())?;
/// assert!(network.contains_edge(7, 9));
/// # Ok::<(), netgauge_core::GmlError>(())
/// ```
#[instrument(
    name = "core.read_gml",
    err,
    skip(reader),
    fields(nodes = field::Empty, edges = field::Empty),
)]
pub fn read_gml<R: BufRead>(mut reader: R) -> Result<Network, GmlError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;

    let document = Parser::new(tokenize(&source)?).document()?;
    let Some(Value::List(graph)) = lookup(&document, "graph") else {
        return Err(GmlError::MissingGraph);
    };

    let mut network = Network::new();
    let mut nodes: HashMap<i64, NodeId> = HashMap::new();
    for (key, value) in graph {
        if key != "node" {
            continue;
        }
        let Value::List(entries) = value else {
            return Err(GmlError::MissingNodeId);
        };
        let id = lookup(entries, "id")
            .and_then(Value::as_int)
            .ok_or(GmlError::MissingNodeId)?;
        let label = node_label(entries, id)?;
        if nodes.insert(id, label).is_some() {
            return Err(GmlError::DuplicateNode { id });
        }
        network.insert_node(label);
    }

    for (key, value) in graph {
        if key != "edge" {
            continue;
        }
        let Value::List(entries) = value else {
            return Err(GmlError::MissingEndpoint { field: "source" });
        };
        let source = endpoint(entries, "source", &nodes)?;
        let target = endpoint(entries, "target", &nodes)?;
        network.insert_edge(source, target);
    }

    let span = Span::current();
    span.record("nodes", network.node_count());
    span.record("edges", network.edge_count());
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn parse(text: &str) -> Result<Network, GmlError> {
        read_gml(text.as_bytes())
    }

    /// A `graph` block wrapping `levels` further nested lists.
    fn nested(levels: usize) -> String {
        format!("graph [ {} {} ]", "a [ ".repeat(levels), "] ".repeat(levels))
    }

    #[rstest]
    fn tokenizer_tracks_lines_and_skips_comments() {
        let tokens = tokenize("# header\ngraph [\n  label \"a b\"\n]\n").expect("tokenize");
        let kinds: Vec<_> = tokens.iter().map(|token| (token.kind.clone(), token.line)).collect();
        assert_eq!(
            kinds,
            vec![
                (TokenKind::Key("graph".to_owned()), 2),
                (TokenKind::Open, 2),
                (TokenKind::Key("label".to_owned()), 3),
                (TokenKind::Text("a b".to_owned()), 3),
                (TokenKind::Close, 4),
            ]
        );
    }

    #[rstest]
    fn reads_foreign_attributes_and_unlabelled_nodes() {
        let network = parse(
            "Creator \"someone\"\ngraph [\n directed 0\n node [ id 3 graphics [ x 1.5 y -2.0 ] ]\n node [ id 8 label 40 ]\n edge [ source 3 target 8 weight 0.5 ]\n]",
        )
        .expect("valid document");
        assert_eq!(network.labels().collect::<Vec<_>>(), vec![3, 40]);
        assert!(network.contains_edge(3, 40));
    }

    #[rstest]
    fn drops_self_loops_and_repeated_edges() {
        let network = parse(
            "graph [ node [ id 0 ] node [ id 1 ] edge [ source 0 target 1 ] edge [ source 1 target 0 ] edge [ source 1 target 1 ] ]",
        )
        .expect("valid document");
        assert_eq!(network.edge_count(), 1);
    }

    #[rstest]
    #[case::no_graph("node [ id 1 ]", "GML_MISSING_GRAPH")]
    #[case::unclosed_list("graph [ node [ id 1 ]", "GML_UNEXPECTED_EOF")]
    #[case::unclosed_string("graph [ node [ id 1 label \"2 ] ]", "GML_UNEXPECTED_EOF")]
    #[case::dangling_key("graph [ node", "GML_UNEXPECTED_EOF")]
    #[case::stray_close("graph [ ] ]", "GML_UNEXPECTED_TOKEN")]
    #[case::bad_character("graph [ node [ id 1 ] ; ]", "GML_UNEXPECTED_TOKEN")]
    #[case::missing_id("graph [ node [ label \"1\" ] ]", "GML_MISSING_NODE_ID")]
    #[case::text_label("graph [ node [ id 1 label \"alice\" ] ]", "GML_INVALID_LABEL")]
    #[case::duplicate_id("graph [ node [ id 1 ] node [ id 1 ] ]", "GML_DUPLICATE_NODE")]
    #[case::unknown_endpoint(
        "graph [ node [ id 1 ] edge [ source 1 target 2 ] ]",
        "GML_UNKNOWN_ENDPOINT"
    )]
    #[case::missing_target("graph [ node [ id 1 ] edge [ source 1 ] ]", "GML_MISSING_ENDPOINT")]
    #[case::too_deep(&nested(MAX_NESTING), "GML_NESTING_TOO_DEEP")]
    fn rejects_malformed_documents(#[case] text: &str, #[case] code: &str) {
        let err = parse(text).expect_err("document must be rejected");
        assert_eq!(err.code().as_str(), code, "unexpected error: {err}");
    }

    #[rstest]
    fn accepts_nesting_up_to_the_limit() {
        // `graph [` takes the first level.
        let network = parse(&nested(MAX_NESTING - 1)).expect("nesting within the limit");
        assert!(network.is_empty());
    }

    #[rstest]
    fn pathological_nesting_is_an_error_not_a_crash() {
        let err = parse(&nested(200_000)).expect_err("nesting must be bounded");
        match err {
            GmlError::NestingTooDeep { depth } => assert_eq!(depth, MAX_NESTING),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn reports_line_of_unexpected_token() {
        let err = parse("graph [\n node [ id 1 ]\n [\n]").expect_err("list without key");
        match err {
            GmlError::UnexpectedToken { token, line } => {
                assert_eq!(token, "[");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
