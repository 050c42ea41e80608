mod run;

pub use run::*;

use crate::core::{Edge, Instance};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

/// Errors produced while reading the plain-text instance format.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is missing the `vertices edges` header line")]
    MissingHeader,
    #[error("line {line}: expected {expected}")]
    MissingToken { line: usize, expected: &'static str },
    #[error("line {line}: invalid integer")]
    InvalidInteger {
        line: usize,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("line {line}: vertex {vertex} is out of range 1..={max}")]
    VertexOutOfRange {
        line: usize,
        vertex: usize,
        max: usize,
    },
    #[error("line {line}: self-loop at vertex {vertex}")]
    SelfLoop { line: usize, vertex: usize },
    #[error("expected {expected} edge lines, found {found}")]
    EdgeCount { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads an instance from the plain-text format: a `vertices edges` header
/// line followed by one `u v` line per edge with 1-based endpoints and an
/// optional edge weight, which is accepted and ignored. Reading stops at the
/// first blank line after the edges.
///
/// # Errors
/// - If the header or an edge line is malformed.
/// - If a vertex is outside `1..=vertices` or an edge is a self-loop.
/// - If the number of edge lines does not match the header.
/// - If the reader fails.
pub fn deserialize(reader: &mut impl BufRead) -> Result<Instance, ParseError> {
    let mut lines = reader.lines().enumerate();

    let (line, header) = loop {
        let Some((number, line)) = lines.next() else {
            return Err(ParseError::MissingHeader);
        };
        let line = line?;
        if !line.trim().is_empty() {
            break (number + 1, line);
        }
    };

    let mut tokens = header.split_whitespace();
    let vertices = parse_token(&mut tokens, line, "a vertex count")?;
    let count: usize = parse_token(&mut tokens, line, "an edge count")?;

    let mut edges = Vec::with_capacity(count);
    for (number, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }

        let number = number + 1;
        let mut tokens = line.split_whitespace();
        let u = parse_vertex(&mut tokens, number, "a source vertex", vertices)?;
        let v = parse_vertex(&mut tokens, number, "a target vertex", vertices)?;
        if u == v {
            return Err(ParseError::SelfLoop {
                line: number,
                vertex: u + 1,
            });
        }
        if let Some(weight) = tokens.next() {
            let _: i64 = parse_integer(weight, number)?;
        }

        edges.push(Edge(u, v));
    }

    if edges.len() != count {
        return Err(ParseError::EdgeCount {
            expected: count,
            found: edges.len(),
        });
    }

    Ok(Instance::new(vertices, edges))
}

/// Reads an instance from a file: `.json` files hold the serde
/// representation, anything else the plain-text format.
///
/// # Errors
/// - If the file cannot be opened or parsed.
pub fn read_instance(path: &Path) -> anyhow::Result<Instance> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);

    if path.extension().is_some_and(|extension| extension == "json") {
        Ok(serde_json::from_reader(reader)?)
    } else {
        Ok(deserialize(&mut reader)?)
    }
}

fn parse_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    expected: &'static str,
) -> Result<usize, ParseError> {
    let token = tokens.next().ok_or(ParseError::MissingToken { line, expected })?;
    parse_integer(token, line)
}

fn parse_integer<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    token: &str,
    line: usize,
) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|source| ParseError::InvalidInteger { line, source })
}

/// Parses a 1-based vertex identity and converts it to the 0-based index.
fn parse_vertex<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    expected: &'static str,
    vertices: usize,
) -> Result<usize, ParseError> {
    let vertex = parse_token(tokens, line, expected)?;
    if vertex == 0 || vertex > vertices {
        return Err(ParseError::VertexOutOfRange {
            line,
            vertex,
            max: vertices,
        });
    }
    Ok(vertex - 1)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &str) -> Result<Instance, ParseError> {
        deserialize(&mut Cursor::new(input))
    }

    #[test]
    fn parses_with_and_without_weights() -> anyhow::Result<()> {
        let instance = parse("4 3\n1 2 7\n2 3\n3 4 -1\n")?;

        assert_eq!(instance.vertices, 4);
        assert_eq!(instance.edges, vec![Edge(0, 1), Edge(1, 2), Edge(2, 3)]);
        Ok(())
    }

    #[test]
    fn stops_at_a_blank_line() -> anyhow::Result<()> {
        let instance = parse("2 1\n1 2\n\n3 4\n")?;

        assert_eq!(instance.edges, vec![Edge(0, 1)]);
        Ok(())
    }

    #[test]
    fn round_trips_through_display() -> anyhow::Result<()> {
        let instance = parse("3 2\n1 2\n2 3\n")?;
        let reparsed = parse(&instance.to_string())?;

        assert_eq!(instance, reparsed);
        Ok(())
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse(""), Err(ParseError::MissingHeader)));
        assert!(matches!(parse("3\n"), Err(ParseError::MissingToken { .. })));
        assert!(matches!(parse("a 1\n"), Err(ParseError::InvalidInteger { .. })));
        assert!(matches!(parse("2 1\n1\n"), Err(ParseError::MissingToken { .. })));
        assert!(matches!(parse("2 1\n1 2 x\n"), Err(ParseError::InvalidInteger { .. })));
        assert!(matches!(
            parse("2 1\n1 3\n"),
            Err(ParseError::VertexOutOfRange { vertex: 3, .. })
        ));
        assert!(matches!(
            parse("2 1\n0 1\n"),
            Err(ParseError::VertexOutOfRange { vertex: 0, .. })
        ));
        assert!(matches!(
            parse("2 1\n2 2\n"),
            Err(ParseError::SelfLoop { vertex: 2, .. })
        ));
        assert!(matches!(
            parse("2 2\n1 2\n"),
            Err(ParseError::EdgeCount { expected: 2, found: 1 })
        ));
    }
}
