use std::io::{BufRead, Write};

use colored::Colorize;
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::debug;

use crate::filesystem::{NodeId, NodeKind, PathError, Tree};
use crate::query::{QueryParseError, parse_query};
use crate::search::{SearchError, SearchExecutor, TraversalOrder};
use crate::session::{Command, WordsError, split_words};

const PROMPT: &str = "> ";

/// Whether the session should keep reading after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive browsing state over a loaded tree.
///
/// The current directory is the only mutable state and it always refers to a
/// directory node of `tree`.
pub struct Session {
    tree: Tree,
    cwd: NodeId,
}

impl Session {
    pub fn new(tree: Tree) -> Self {
        let cwd = tree.root();
        Self { tree, cwd }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    /// Handles lines until input ends or `quit` is read. A failing line is
    /// reported on `errors` and does not stop the session.
    pub fn run<R, W, E>(
        &mut self,
        input: R,
        output: &mut W,
        errors: &mut E,
        prompt: bool,
    ) -> std::io::Result<()>
    where
        R: BufRead,
        W: Write + ?Sized,
        E: Write + ?Sized,
    {
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(output, "{}", PROMPT)?;
                output.flush()?;
            }

            let Some(line) = lines.next().transpose()? else {
                break;
            };
            match self.execute_line(&line, output) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(error) => {
                    debug!("Command '{}' failed: {:?}", line.trim(), error);
                    writeln!(errors, "{} {}", "error:".red().bold(), error)?;
                }
            }
            output.flush()?;
        }
        Ok(())
    }

    pub fn execute_line<W>(&mut self, line: &str, output: &mut W) -> Result<Flow, SessionError>
    where
        W: Write + ?Sized,
    {
        let words = split_words(line)?;
        let Some((name, arguments)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let command = Command::lookup(name).context(UnknownCommandSnafu { name })?;
        debug!("Dispatching {:?} with arguments {:?}", command, arguments);

        match command {
            Command::Pwd => {
                no_arguments(name, arguments)?;
                writeln!(output, "{}", self.tree.path(self.cwd)).context(OutputSnafu)?;
            }
            Command::Cd => self.change_directory(optional_argument(name, arguments)?)?,
            Command::Ls => self.list(optional_argument(name, arguments)?, output)?,
            Command::Find(order) => self.find(arguments, order, output)?,
            Command::Quit => {
                no_arguments(name, arguments)?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Without a path the session returns to the root
    fn change_directory(&mut self, path: Option<&str>) -> Result<(), SessionError> {
        let Some(path) = path else {
            self.cwd = self.tree.root();
            return Ok(());
        };

        self.cwd = self.tree.resolve_directory(self.cwd, path)?;
        Ok(())
    }

    /// Prints the stored listing lines of a directory's entries, or the line
    /// of a single file
    fn list<W>(&self, path: Option<&str>, output: &mut W) -> Result<(), SessionError>
    where
        W: Write + ?Sized,
    {
        let target = match path {
            Some(path) => self.tree.resolve(self.cwd, path)?,
            None => self.cwd,
        };

        let node = self.tree.node(target);
        match node.kind() {
            NodeKind::Directory { children } => {
                for child in children {
                    writeln!(output, "{}", self.tree.node(*child).source_line())
                        .context(OutputSnafu)?;
                }
            }
            NodeKind::File => writeln!(output, "{}", node.source_line()).context(OutputSnafu)?,
        }
        Ok(())
    }

    fn find<W>(
        &self,
        arguments: &[String],
        order: TraversalOrder,
        output: &mut W,
    ) -> Result<(), SessionError>
    where
        W: Write + ?Sized,
    {
        let expression = parse_query(arguments)?;
        SearchExecutor::new(&self.tree, &expression).run(
            self.cwd,
            order.scheduler::<NodeId>(),
            output,
        )?;
        Ok(())
    }
}

fn no_arguments(command: &str, arguments: &[String]) -> Result<(), SessionError> {
    match arguments.first() {
        Some(argument) => UnexpectedArgumentSnafu { command, argument }.fail(),
        None => Ok(()),
    }
}

fn optional_argument<'a>(
    command: &str,
    arguments: &'a [String],
) -> Result<Option<&'a str>, SessionError> {
    match arguments {
        [] => Ok(None),
        [path] => Ok(Some(path.as_str())),
        [_, extra, ..] => UnexpectedArgumentSnafu {
            command,
            argument: extra,
        }
        .fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Unknown command: {}", name))]
    UnknownCommand { name: String },
    #[snafu(display("Unexpected argument '{}' to {}", argument, command))]
    UnexpectedArgument { command: String, argument: String },
    #[snafu(transparent)]
    Words { source: WordsError },
    #[snafu(transparent)]
    Path { source: PathError },
    #[snafu(transparent)]
    Query { source: QueryParseError },
    #[snafu(transparent)]
    Search { source: SearchError },
    #[snafu(display("Failed to write command output"))]
    OutputError { source: std::io::Error },
}
