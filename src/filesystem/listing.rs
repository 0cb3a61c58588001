use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, info};

use super::{NodeId, NodeType, PathError, Tree};

/// Number of whitespace separated fields preceding the name in an entry line:
/// mode, links, owner, group, size, month, day and time-or-year.
const ENTRY_PREFIX_FIELDS: usize = 8;
const LINKS_FIELD: usize = 1;
const SIZE_FIELD: usize = 4;

impl Tree {
    pub fn from_listing_path(path: &Path) -> Result<Self, ListingError> {
        debug!("Opening listing file: {}", path.display());
        let file = File::open(path).context(OpenSnafu {
            file_path: path.display().to_string(),
        })?;
        Self::from_listing(BufReader::new(file))
    }

    pub fn from_listing(reader: impl BufRead) -> Result<Self, ListingError> {
        ListingParser::new(reader).parse()
    }
}

impl TryFrom<&str> for Tree {
    type Error = ListingError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        Self::from_listing(contents.as_bytes())
    }
}

/// Builds a [`Tree`] out of recursive `ls -l` style output.
///
/// Every block names its directory through a label. Directory entries register
/// `<label>/<name>` so the block describing them later attaches to the node
/// that was already created. Labels are forgotten once their block is consumed.
struct ListingParser<R> {
    lines: Lines<R>,
    line_number: usize,
    tree: Option<Tree>,
    labels: HashMap<String, NodeId>,
}

struct Entry<'a> {
    node_type: NodeType,
    size: u64,
    name: &'a str,
}

impl<R: BufRead> ListingParser<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            tree: None,
            labels: HashMap::new(),
        }
    }

    fn parse(mut self) -> Result<Tree, ListingError> {
        while let Some(header) = self.next_header()? {
            self.parse_block(&header)?;
        }

        let tree = self.tree.context(EmptyListingSnafu)?;
        info!("Built tree with {} nodes", tree.node_count());
        Ok(tree)
    }

    fn parse_block(&mut self, header: &str) -> Result<(), ListingError> {
        let label = header
            .strip_suffix(':')
            .context(MalformedListingLineSnafu {
                line_number: self.line_number,
                line: header,
            })?
            .to_string();
        let directory = self.directory_for(&label, header)?;
        let header_line_number = self.line_number;

        match self.next_line()? {
            Some(line) if line.starts_with("total") => {}
            Some(line) => {
                return MalformedListingLineSnafu {
                    line_number: self.line_number,
                    line,
                }
                .fail();
            }
            None => {
                return MalformedListingLineSnafu {
                    line_number: header_line_number,
                    line: header,
                }
                .fail();
            }
        }

        let mut entries = 0;
        while let Some(line) = self.next_line()? {
            if line.trim().is_empty() {
                break;
            }
            self.add_entry(directory, &label, &line)?;
            entries += 1;
        }

        self.labels.remove(&label);
        debug!("Parsed block '{}' with {} entries", label, entries);
        Ok(())
    }

    /// Node the block labelled `label` describes. The first block becomes the
    /// root, any later block must have been announced by a directory entry.
    fn directory_for(&mut self, label: &str, header: &str) -> Result<NodeId, ListingError> {
        if let Some(id) = self.labels.get(label) {
            return Ok(*id);
        }
        if self.tree.is_some() {
            return DetachedBlockSnafu { label }.fail();
        }

        debug!("Using block '{}' as the root", label);
        let root = self.tree.insert(Tree::with_root(header)).root();
        self.labels.insert(label.to_string(), root);
        Ok(root)
    }

    fn add_entry(&mut self, directory: NodeId, label: &str, line: &str) -> Result<(), ListingError> {
        let entry = parse_entry(line).context(MalformedListingLineSnafu {
            line_number: self.line_number,
            line,
        })?;
        if matches!(entry.name, "." | "..") {
            return Ok(());
        }

        let Some(tree) = self.tree.as_mut() else {
            return DetachedBlockSnafu { label }.fail();
        };
        let id = tree
            .add_child(directory, entry.name, entry.size, entry.node_type, line)
            .context(AttachSnafu {
                line_number: self.line_number,
            })?;

        if entry.node_type == NodeType::Directory {
            self.labels.insert(format!("{}/{}", label, entry.name), id);
        }
        Ok(())
    }

    fn next_line(&mut self) -> Result<Option<String>, ListingError> {
        let line = self.lines.next().transpose().context(ReadSnafu)?;
        if line.is_some() {
            self.line_number += 1;
        }
        Ok(line)
    }

    fn next_header(&mut self) -> Result<Option<String>, ListingError> {
        while let Some(line) = self.next_line()? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

fn parse_entry(line: &str) -> Option<Entry<'_>> {
    let line = line.trim_start();
    let node_type = if line.starts_with('d') {
        NodeType::Directory
    } else {
        NodeType::File
    };

    let mut fields = [""; ENTRY_PREFIX_FIELDS];
    let mut rest = line;
    for field in fields.iter_mut() {
        let (value, remainder) = next_field(rest)?;
        *field = value;
        rest = remainder;
    }

    fields[LINKS_FIELD].parse::<u64>().ok()?;
    let size = fields[SIZE_FIELD].parse::<u64>().ok()?;
    // `rest` starts right after the single separator following the date
    let name = rest;
    if name.is_empty() {
        return None;
    }

    Some(Entry {
        node_type,
        size,
        name,
    })
}

fn next_field(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    Some(input.split_once(char::is_whitespace).unwrap_or((input, "")))
}

#[derive(Debug, Snafu)]
pub enum ListingError {
    #[snafu(display("Failed to open the listing file: {}", file_path))]
    OpenError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read the listing"))]
    ReadError { source: std::io::Error },
    #[snafu(display("Malformed listing line {}: '{}'", line_number, line))]
    MalformedListingLine { line_number: usize, line: String },
    #[snafu(display("Cannot attach listing line {}", line_number))]
    AttachError {
        line_number: usize,
        source: PathError,
    },
    #[snafu(display("Block '{}' does not belong to any listed directory", label))]
    DetachedBlock { label: String },
    #[snafu(display("The listing is empty"))]
    EmptyListing,
}
