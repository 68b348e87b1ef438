use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use crate::error::{Error, Result};
use crate::gml::parse_gml;
use crate::graph::SocialGraph;

/// One problem instance: the social graph, the buses and the rowdy groups.
#[derive(Debug, Clone)]
pub struct Problem {
    pub graph: SocialGraph,
    pub num_buses: usize,
    pub size_bus: usize,
    pub constraints: Vec<Vec<String>>,
}

fn malformed(path: &Path, reason: impl Into<String>) -> Error {
    Error::MalformedInput {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn read_input_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => malformed(path, "file not found"),
        _ => Error::Io(error),
    })
}

/// Load `graph.gml` and `parameters.txt` from an instance directory.
pub fn read_problem(dir: &Path) -> Result<Problem> {
    let graph = read_graph_gml(&dir.join("graph.gml"))?;

    let parameters_path = dir.join("parameters.txt");
    let (num_buses, size_bus, constraints) = parse_parameters(&parameters_path, &read_input_file(&parameters_path)?)?;

    Ok(Problem { graph, num_buses, size_bus, constraints })
}

/// Read a GML file as a social graph.
pub fn read_graph_gml(file_path: &Path) -> Result<SocialGraph> {
    let text = read_input_file(file_path)?;
    let gml = parse_gml(&text).map_err(|error| malformed(file_path, error.to_string()))?;

    SocialGraph::from_labeled_edges(&gml.nodes, &gml.edges).map_err(|error| malformed(file_path, error.to_string()))
}

/// Parse a parameters file: the number of buses, the bus capacity, then one rowdy group per
/// non-blank line.
pub fn parse_parameters(path: &Path, text: &str) -> Result<(usize, usize, Vec<Vec<String>>)> {
    let mut lines = text.lines();
    let mut positive = |name: &str| -> Result<usize> {
        let line = lines.next().ok_or_else(|| malformed(path, format!("missing {name}")))?;
        match line.trim().parse::<usize>() {
            Ok(0) => Err(malformed(path, format!("{name} must be positive"))),
            Ok(value) => Ok(value),
            Err(_) => Err(malformed(path, format!("{name} is not an integer: {:?}", line.trim()))),
        }
    };
    let num_buses = positive("number of buses")?;
    let size_bus = positive("bus capacity")?;

    let constraints = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_label_list(line).map_err(|reason| malformed(path, reason)))
        .collect::<Result<Vec<_>>>()?;

    Ok((num_buses, size_bus, constraints))
}

/// Parse a list of labels written as `['a', 'b']`. Quotes may be single or double; bare items
/// are taken as they are.
pub fn parse_label_list(line: &str) -> std::result::Result<Vec<String>, String> {
    let inner = line
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| format!("expected a bracketed list, found {:?}", line.trim()))?;

    let mut labels = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let label = match chars.peek().copied() {
            None => break,
            Some(quote @ ('\'' | '"')) => {
                chars.next();
                let mut label = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => label.extend(chars.next()),
                        Some(c) if c == quote => break,
                        Some(c) => label.push(c),
                        None => return Err(format!("unterminated quote in {:?}", line.trim())),
                    }
                }
                label
            }
            Some(_) => {
                let mut label = String::new();
                while let Some(c) = chars.next_if(|&c| c != ',') {
                    label.push(c);
                }
                label.trim_end().to_string()
            }
        };
        labels.push(label);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => {}
            Some(c) => return Err(format!("unexpected {c:?} in {:?}", line.trim())),
        }
    }

    Ok(labels)
}

/// Format one bus as `['a', 'b']`.
pub fn format_bus<S: AsRef<str>>(students: &[S]) -> String {
    let items: Vec<String> = students
        .iter()
        .map(|label| {
            let label = label.as_ref().replace('\\', "\\\\");
            if label.contains('\'') && !label.contains('"') {
                format!("\"{label}\"")
            } else {
                format!("'{}'", label.replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", items.join(", "))
}

/// Write one line per bus. The file appears at `file_path` complete or not at all.
pub fn write_assignment<S: AsRef<str>>(file_path: &Path, buses: &[Vec<S>]) -> Result<()> {
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        for bus in buses {
            writeln!(writer, "{}", format_bus(bus))?;
        }
        writer.flush()?;
    }
    file.persist(file_path).map_err(|error| error.error)?;
    Ok(())
}

/// Read a file written by [`write_assignment`].
pub fn read_assignment(file_path: &Path) -> Result<Vec<Vec<String>>> {
    let text = read_input_file(file_path)?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_label_list(line).map_err(|reason| malformed(file_path, reason)))
        .collect()
}
