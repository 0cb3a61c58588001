use crate::search::TraversalOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pwd,
    Cd,
    Ls,
    Find(TraversalOrder),
    Quit,
}

impl Command {
    /// Returns `None` for names that are not commands
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "pwd" => Some(Command::Pwd),
            "cd" => Some(Command::Cd),
            "ls" => Some(Command::Ls),
            "find" => Some(Command::Find(TraversalOrder::DepthFirst)),
            "bfs" => Some(Command::Find(TraversalOrder::BreadthFirst)),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}
