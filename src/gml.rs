//! A reader for the subset of GML (Graph Modelling Language) used by the problem instances.
//!
//! ```text
//! graph [
//!   node [ id 0 label "Alice" ]
//!   node [ id 1 label "Bob" ]
//!   edge [ source 0 target 1 ]
//! ]
//! ```
//!
//! Nodes are named by their `label`, or by their `id` when they have none. Edges name their
//! endpoints by id. Every other key, including nested lists, is read and ignored.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct GmlError {
    pub line: usize,
    pub message: String,
}

impl GmlError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        GmlError { line, message: message.into() }
    }
}

/// Node names and the edges between them, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GmlGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Real(f64),
    Str(String),
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Entry>),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: Value,
    line: usize,
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, GmlError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
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
            '[' => {
                chars.next();
                tokens.push((Token::Open, line));
            }
            ']' => {
                chars.next();
                tokens.push((Token::Close, line));
            }
            '"' => {
                chars.next();
                let start_line = line;
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            value.push(c);
                        }
                        None => return Err(GmlError::new(start_line, "unterminated string")),
                    }
                }
                tokens.push((Token::Str(unescape(&value)), start_line));
            }
            _ => {
                let mut word = String::new();
                while let Some(c) = chars.next_if(|&c| !c.is_whitespace() && c != '[' && c != ']' && c != '"') {
                    word.push(c);
                }
                tokens.push((classify(&word, line)?, line));
            }
        }
    }

    Ok(tokens)
}

fn classify(word: &str, line: usize) -> Result<Token, GmlError> {
    let starts_numeric = word.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '.');
    if starts_numeric {
        if let Ok(value) = word.parse::<i64>() {
            return Ok(Token::Int(value));
        }
        return word
            .parse::<f64>()
            .map(Token::Real)
            .map_err(|_| GmlError::new(line, format!("invalid number {word:?}")));
    }
    if word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Ok(Token::Key(word.to_string()));
    }
    Err(GmlError::new(line, format!("unexpected {word:?}")))
}

fn unescape(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Read `key value` pairs until the closing bracket of the current list, or the end of input
/// at the top level.
fn parse_entries(tokens: &mut impl Iterator<Item = (Token, usize)>, nested: Option<usize>) -> Result<Vec<Entry>, GmlError> {
    let mut entries = Vec::new();
    loop {
        let (key, line) = match tokens.next() {
            Some((Token::Key(key), line)) => (key, line),
            Some((Token::Close, line)) => {
                return match nested {
                    Some(_) => Ok(entries),
                    None => Err(GmlError::new(line, "unmatched ']'")),
                };
            }
            Some((token, line)) => return Err(GmlError::new(line, format!("expected a key, found {token:?}"))),
            None => {
                return match nested {
                    Some(open_line) => Err(GmlError::new(open_line, "unclosed '['")),
                    None => Ok(entries),
                };
            }
        };

        let value = match tokens.next() {
            Some((Token::Int(value), _)) => Value::Int(value),
            Some((Token::Real(value), _)) => Value::Real(value),
            Some((Token::Str(value), _)) => Value::Str(value),
            Some((Token::Open, open_line)) => Value::List(parse_entries(tokens, Some(open_line))?),
            Some((token, line)) => return Err(GmlError::new(line, format!("expected a value for {key:?}, found {token:?}"))),
            None => return Err(GmlError::new(line, format!("missing value for {key:?}"))),
        };
        entries.push(Entry { key, value, line });
    }
}

fn find<'a>(entries: &'a [Entry], key: &str) -> Option<&'a Entry> {
    entries.iter().find(|entry| entry.key == key)
}

fn int_attribute(entries: &[Entry], key: &str, line: usize) -> Result<i64, GmlError> {
    match find(entries, key) {
        Some(Entry { value: Value::Int(value), .. }) => Ok(*value),
        Some(entry) => Err(GmlError::new(entry.line, format!("{key} must be an integer"))),
        None => Err(GmlError::new(line, format!("missing {key}"))),
    }
}

fn node_name(entries: &[Entry], id: i64) -> String {
    match find(entries, "label").map(|entry| &entry.value) {
        Some(Value::Str(label)) => label.clone(),
        Some(Value::Int(label)) => label.to_string(),
        Some(Value::Real(label)) => label.to_string(),
        _ => id.to_string(),
    }
}

/// Parse the first `graph` list of a GML document.
pub fn parse_gml(text: &str) -> Result<GmlGraph, GmlError> {
    let mut tokens = tokenize(text)?.into_iter();
    let document = parse_entries(&mut tokens, None)?;

    let entries = match find(&document, "graph") {
        Some(Entry { value: Value::List(entries), .. }) => entries,
        Some(entry) => return Err(GmlError::new(entry.line, "graph must be a list")),
        None => return Err(GmlError::new(1, "no graph found")),
    };

    let mut graph = GmlGraph::default();
    let mut names_by_id = FxHashMap::default();

    for entry in entries {
        let Value::List(attributes) = &entry.value else {
            continue;
        };
        match entry.key.as_str() {
            "node" => {
                let id = int_attribute(attributes, "id", entry.line)?;
                let name = node_name(attributes, id);
                if names_by_id.insert(id, name.clone()).is_some() {
                    return Err(GmlError::new(entry.line, format!("node id {id} is declared more than once")));
                }
                graph.nodes.push(name);
            }
            "edge" => {
                let source = int_attribute(attributes, "source", entry.line)?;
                let target = int_attribute(attributes, "target", entry.line)?;
                let lookup = |id: i64| {
                    names_by_id
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| GmlError::new(entry.line, format!("edge references unknown node id {id}")))
                };
                graph.edges.push((lookup(source)?, lookup(target)?));
            }
            _ => {}
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labeled_graph() {
        // Arrange
        let text = r#"
            graph [
              directed 0
              node [ id 0 label "Alice" ]
              node [
                id 1
                label "Bob"
                graphics [ x 1.5 y -2 ]
              ]
              node [ id 7 ]
              edge [ source 0 target 1 weight 3 ]
              edge [ source 1 target 7 ]
            ]
        "#;

        // Act
        let graph = parse_gml(text).unwrap();

        // Assert
        assert_eq!(graph.nodes, vec!["Alice", "Bob", "7"]);
        assert_eq!(graph.edges, vec![
            ("Alice".to_string(), "Bob".to_string()),
            ("Bob".to_string(), "7".to_string()),
        ]);
    }

    #[test]
    fn test_comments_and_entities() {
        let text = "# generated\ngraph [\n node [ id 0 label \"a&amp;b\" ] # trailing\n]\n";

        let graph = parse_gml(text).unwrap();

        assert_eq!(graph.nodes, vec!["a&b"]);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_edge_to_unknown_node() {
        let text = "graph [ node [ id 0 label \"a\" ] edge [ source 0 target 4 ] ]";

        let error = parse_gml(text).unwrap_err();

        assert_eq!(error.line, 1);
        assert!(error.message.contains("unknown node id 4"));
    }

    #[test]
    fn test_unclosed_list_reports_its_line() {
        let text = "graph [\n  node [ id 0\n";

        let error = parse_gml(text).unwrap_err();

        assert_eq!(error, GmlError::new(2, "unclosed '['"));
    }

    #[test]
    fn test_duplicate_node_ids() {
        let text = "graph [ node [ id 1 label \"a\" ] node [ id 1 label \"b\" ] ]";

        assert!(parse_gml(text).is_err());
    }

    #[test]
    fn test_missing_graph() {
        assert_eq!(parse_gml("Creator \"x\"").unwrap_err(), GmlError::new(1, "no graph found"));
    }
}
