//! DOT graph descriptions
//!
//! Reads the subset of DOT emitted by plan-graph renderers: a single
//! `digraph`, node statements, `a -> b [label="..."]` edge chains, default
//! attribute statements and comments. Labels are normalized on ingestion.

use crate::error::{GraphError, GraphResult};
use crate::graph::{ActionGraph, NodeId};
use disambig_plan::ActionLabel;
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, tag_no_case, take_until, take_while1},
    character::complete::{char, multispace1, none_of, not_line_ending, one_of},
    combinator::{all_consuming, cut, map, opt, recognize, value},
    error::{context, ContextError, ErrorKind, ParseError, VerboseError, VerboseErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use std::fmt::Write as _;

/// One parsed statement; `at` is the input remaining where it started
#[derive(Debug)]
enum Statement<'a> {
    Node(String),
    Edges {
        at: &'a str,
        chain: Vec<String>,
        label: Option<String>,
    },
    Defaults,
}

// ============================================================================
// Lexical pieces
// ============================================================================

/// Whitespace, `//` and `/* */` comments and `#` lines
fn ws<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (), E> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(tag("//"), not_line_ending)),
            value((), pair(char('#'), not_line_ending)),
            value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
        ))),
    )(input)
}

fn bare_id<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, String, E> {
    map(
        recognize(pair(
            opt(char('-')),
            take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.'),
        )),
        String::from,
    )(input)
}

fn quoted_id<'a, E: ParseError<&'a str> + ContextError<&'a str>>(input: &'a str) -> IResult<&'a str, String, E> {
    let body = map(
        opt(escaped_transform(
            none_of("\\\""),
            '\\',
            alt((
                value("\\", char('\\')),
                value("\"", char('"')),
                value("", char('\n')),
            )),
        )),
        Option::unwrap_or_default,
    );
    preceded(char('"'), cut(terminated(body, context("closing quote", char('"')))))(input)
}

fn id<'a, E: ParseError<&'a str> + ContextError<&'a str>>(input: &'a str) -> IResult<&'a str, String, E> {
    alt((quoted_id, bare_id))(input)
}

// ============================================================================
// Attributes
// ============================================================================

fn attribute<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, (String, String), E> {
    let (input, key) = id(input)?;
    let (input, value) = opt(preceded(
        tuple((ws, char('='), ws)),
        cut(context("attribute value", id)),
    ))(input)?;
    Ok((input, (key, value.unwrap_or_else(|| "true".to_string()))))
}

/// `[k=v, k=v; ...]`
fn attribute_list<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Vec<(String, String)>, E> {
    delimited(
        pair(char('['), ws),
        many0(terminated(attribute, tuple((ws, opt(one_of(",;")), ws)))),
        cut(context("closing ']'", char(']'))),
    )(input)
}

// ============================================================================
// Statements
// ============================================================================

fn unsupported<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    at: &'a str,
    what: &'static str,
) -> nom::Err<E> {
    nom::Err::Failure(E::add_context(at, what, E::from_error_kind(at, ErrorKind::Verify)))
}

fn statement<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Statement<'a>, E> {
    let at = input;
    let (input, first) = id(input)?;
    if first.eq_ignore_ascii_case("subgraph") {
        return Err(unsupported(at, "a statement other than subgraph"));
    }
    let (input, _) = ws(input)?;

    // graph-level attribute such as rankdir=LR
    let (input, assigned) = opt(preceded(pair(char('='), ws), cut(context("attribute value", id))))(input)?;
    if assigned.is_some() {
        return Ok((input, Statement::Defaults));
    }
    if input.starts_with("--") {
        return Err(unsupported(input, "a directed edge '->'"));
    }

    let (input, targets) = many0(preceded(
        pair(tag("->"), ws),
        cut(context("edge target", terminated(id, ws))),
    ))(input)?;
    let (input, lists) = many0(terminated(attribute_list, ws))(input)?;

    if targets.is_empty() {
        let keyword = matches!(first.to_ascii_lowercase().as_str(), "graph" | "node" | "edge");
        let statement = if keyword && !lists.is_empty() {
            Statement::Defaults
        } else {
            Statement::Node(first)
        };
        return Ok((input, statement));
    }

    let label = lists
        .into_iter()
        .flatten()
        .filter(|(key, _)| key == "label")
        .map(|(_, value)| value)
        .last();
    let mut chain = vec![first];
    chain.extend(targets);
    Ok((input, Statement::Edges { at, chain, label }))
}

fn document<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Vec<Statement<'a>>, E> {
    let (input, _) = ws(input)?;
    let (input, _) = opt(terminated(tag_no_case("strict"), ws))(input)?;
    let (input, _) = context("digraph header", tag_no_case("digraph"))(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = opt(terminated(id, ws))(input)?;
    let (input, _) = context("opening '{'", char('{'))(input)?;
    let (input, statements) = many0(preceded(
        ws,
        alt((map(char(';'), |_| None), map(statement, Some))),
    ))(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = cut(context("closing '}'", char('}')))(input)?;
    let (input, _) = ws(input)?;
    Ok((input, statements.into_iter().flatten().collect()))
}

// ============================================================================
// Errors
// ============================================================================

/// 1-based line of the position where `rest` starts
fn line_of(description: &str, rest: &str) -> usize {
    let consumed = description.len().saturating_sub(rest.len());
    description.get(..consumed).map_or(0, |done| done.matches('\n').count()) + 1
}

fn syntax_error(description: &str, error: &VerboseError<&str>) -> GraphError {
    let at = error.errors.first().map_or("", |(rest, _)| *rest);
    let reason = error
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(what) => Some(format!("expected {what}")),
            _ => None,
        })
        .unwrap_or_else(|| "unexpected input".to_string());
    GraphError::malformed(line_of(description, at), reason)
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

impl ActionGraph {
    /// Parse a DOT graph description
    ///
    /// # Errors
    /// [`GraphError::MalformedDescription`] with the offending line
    pub fn from_dot(description: &str) -> GraphResult<Self> {
        let statements = match all_consuming(document::<VerboseError<&str>>)(description) {
            Ok((_, statements)) => statements,
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => return Err(syntax_error(description, &e)),
            Err(nom::Err::Incomplete(_)) => {
                return Err(GraphError::malformed(line_of(description, ""), "incomplete description"))
            }
        };

        let mut graph = ActionGraph::new();
        for statement in statements {
            match statement {
                Statement::Node(id) => graph.add_node(NodeId::new(id)),
                Statement::Defaults => {}
                Statement::Edges { at, chain, label } => {
                    let line = line_of(description, at);
                    let raw = label.ok_or_else(|| GraphError::malformed(line, "edge without label"))?;
                    let label =
                        ActionLabel::normalize(&raw).map_err(|e| GraphError::malformed(line, e.to_string()))?;
                    for pair in chain.windows(2) {
                        graph.add_edge(NodeId::new(pair[0].clone()), NodeId::new(pair[1].clone()), label.clone());
                    }
                }
            }
        }
        Ok(graph)
    }

    /// Render as DOT, nodes then edges in insertion order
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph {\n");
        for node in self.nodes() {
            let _ = writeln!(out, "    {};", quote(node.as_str()));
        }
        for edge in self.edges() {
            let _ = writeln!(
                out,
                "    {} -> {} [label={}];",
                quote(edge.source.as_str()),
                quote(edge.target.as_str()),
                quote(edge.label.as_str())
            );
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TraversalDirection;

    const RENDERED: &str = r#"
digraph G {
    // produced by a plan-graph renderer
    rankdir=LR;
    node [shape=circle];
    node0 [label="0"];
    node0 -> node1 [label="(Pick Ball1 RoomA Left)"];
    "node1" -> "node16" [label="\"(x)\""];
    node1 -> node2 [label="(y) (1)", color=red];
    /* trailing
       comment */
}
"#;

    #[test]
    fn parses_renderer_output() {
        let g = ActionGraph::from_dot(RENDERED).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(
            g.edge_label(&"node0".into(), &"node1".into()).unwrap().as_str(),
            "pick ball1 rooma left"
        );
        let out: Vec<_> = g
            .out_edges(&"node1".into())
            .unwrap()
            .into_iter()
            .map(|e| e.label.to_string())
            .collect();
        assert_eq!(out, vec!["x", "y"]);
    }

    #[test]
    fn edge_chains_share_label() {
        let g = ActionGraph::from_dot("digraph { a -> b -> c [label=go]; }").unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_label(&"b".into(), &"c".into()).unwrap().as_str(), "go");
    }

    #[test]
    fn round_trip_through_dot() {
        let g = ActionGraph::from_dot(RENDERED).unwrap();
        let again = ActionGraph::from_dot(&g.to_dot()).unwrap();
        assert_eq!(g.edges(), again.edges());
        assert_eq!(
            g.root_nodes(TraversalDirection::Backward),
            again.root_nodes(TraversalDirection::Backward)
        );
    }

    #[test]
    fn empty_digraph_is_empty_graph() {
        let g = ActionGraph::from_dot("digraph {}").unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn unlabeled_edge_is_rejected_with_line() {
        let err = ActionGraph::from_dot("digraph {\n a -> b;\n}").unwrap_err();
        assert!(matches!(err, GraphError::MalformedDescription { line: 2, .. }));
    }

    #[test]
    fn syntax_errors_name_what_was_expected() {
        let err = ActionGraph::from_dot("digraph {\n a -> b [label=x\n}").unwrap_err();
        assert_eq!(
            err,
            GraphError::MalformedDescription {
                line: 3,
                reason: "expected closing ']'".to_string(),
            }
        );
    }

    #[test]
    fn escaped_quotes_and_backslashes_in_labels() {
        let g = ActionGraph::from_dot(r#"digraph { a -> b [label="say \"hi\" \\ now"]; }"#).unwrap();
        assert_eq!(g.edge_label(&"a".into(), &"b".into()).unwrap().as_str(), r#"say hi \ now"#);
    }

    #[test]
    fn undirected_and_unknown_input_rejected() {
        assert!(ActionGraph::from_dot("graph { a -- b }").is_err());
        assert!(ActionGraph::from_dot("digraph { a -- b [label=x] }").is_err());
        assert!(ActionGraph::from_dot("digraph { subgraph s { a } }").is_err());
        assert!(ActionGraph::from_dot("digraph { a -> b [label=x]").is_err());
    }
}
