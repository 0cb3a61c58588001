//! Line-oriented browsing of a loaded tree: `pwd`, `cd`, `ls`, `find`, `bfs`
//! and `quit`.

mod command;
mod session;
mod words;

pub use command::Command;
pub use session::{Flow, Session, SessionError};
pub use words::{WordsError, split_words};
