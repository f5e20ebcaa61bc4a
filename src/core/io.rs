/*!
# Input/Output (I/O) Routines

This module reads and writes graphs in the DIMACS shortest-paths format,
the plain-text format road-network instances are distributed in:

- `c <text>` comment lines, ignored;
- `p sp <n> <m>` the problem line with vertex and arc counts, which must
  precede all arcs;
- `a <u> <v> <w>` an arc with 1-based endpoints and a positive 32-bit
  weight.

Vertex indices are converted to the crate's 0-based indexing on the way
in and back to 1-based on the way out. Because undirected instances list
every edge in both directions, the duplicate reverse arcs are ignored
with a warning rather than aborting the parse.

## Error Handling

Malformed lines, arcs before the problem line, out-of-range endpoints,
and non-positive weights all surface as
[`ThorupError::InvalidInput`](crate::core::error::ThorupError); file
system failures convert into `IoError`.
*/

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use tracing::warn;

use crate::core::error::{Result, ThorupError};
use crate::core::graph::Graph;

/// Reads a DIMACS shortest-paths file into a graph.
///
/// # Example
///
/// ```rust,no_run
/// use thorup::core::io::read_dimacs;
///
/// let graph = read_dimacs("rome99.gr").expect("failed to read graph");
/// println!("{} vertices", graph.node_count());
/// ```
pub fn read_dimacs(path: &str) -> Result<Graph> {
    let file = File::open(path)?;
    read_dimacs_from(BufReader::new(file))
}

/// Reads the DIMACS shortest-paths format from any buffered reader.
pub fn read_dimacs_from<R: BufRead>(reader: R) -> Result<Graph> {
    let mut graph: Option<Graph> = None;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split(' ');
        match tokens.next() {
            Some("c") => continue,
            Some("p") => {
                if graph.is_some() {
                    return Err(ThorupError::invalid_input(format!(
                        "line {}: repeated problem line",
                        lineno + 1
                    )));
                }
                if tokens.next() != Some("sp") {
                    return Err(ThorupError::invalid_input(format!(
                        "line {}: problem line is not 'p sp <n> <m>'",
                        lineno + 1
                    )));
                }
                let n = parse_token(tokens.next(), lineno, "vertex count")?;
                let _m: usize = parse_token(tokens.next(), lineno, "arc count")?;
                graph = Some(Graph::new(n)?);
            }
            Some("a") => {
                let graph = graph.as_mut().ok_or_else(|| {
                    ThorupError::invalid_input(format!(
                        "line {}: arc before the problem line",
                        lineno + 1
                    ))
                })?;
                let u: u32 = parse_token(tokens.next(), lineno, "source vertex")?;
                let v: u32 = parse_token(tokens.next(), lineno, "target vertex")?;
                let w: u32 = parse_token(tokens.next(), lineno, "weight")?;
                if u == 0 || v == 0 {
                    return Err(ThorupError::invalid_input(format!(
                        "line {}: DIMACS vertices are 1-based",
                        lineno + 1
                    )));
                }
                match graph.add_edge(u - 1, v - 1, w) {
                    Ok(()) => {}
                    Err(ThorupError::ParallelEdge(_)) => {
                        warn!(line = lineno + 1, u, v, "ignoring parallel arc");
                    }
                    Err(e) => {
                        return Err(ThorupError::invalid_input(format!(
                            "line {}: {}",
                            lineno + 1,
                            e
                        )));
                    }
                }
            }
            Some(other) => {
                return Err(ThorupError::invalid_input(format!(
                    "line {}: unknown line type '{}'",
                    lineno + 1,
                    other
                )));
            }
            None => continue,
        }
    }
    graph.ok_or_else(|| ThorupError::invalid_input("missing problem line"))
}

fn parse_token<T: std::str::FromStr>(
    token: Option<&str>,
    lineno: usize,
    what: &str,
) -> Result<T> {
    let token = token.ok_or_else(|| {
        ThorupError::invalid_input(format!("line {}: missing {}", lineno + 1, what))
    })?;
    token.parse().map_err(|_| {
        ThorupError::invalid_input(format!(
            "line {}: cannot parse {} '{}'",
            lineno + 1,
            what,
            token
        ))
    })
}

/// Writes a graph in DIMACS shortest-paths format, one `a` line per
/// directed arc.
pub fn write_dimacs(path: &str, graph: &Graph) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(
        writer,
        "p sp {} {}",
        graph.node_count(),
        graph.arc_count()
    )?;
    for (u, v, w) in graph.edges() {
        writeln!(writer, "a {} {} {}", u + 1, v + 1, w)?;
    }
    writer.flush()?;
    Ok(())
}
