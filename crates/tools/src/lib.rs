//! Developer tooling: the output console.
//!
//! Log events from any crate reach the console panel through
//! [`ConsoleLayer`] and a shared [`MessageLog`]; the panel drains one message
//! per frame into its [`ConsoleHistory`].

mod console;

pub use console::{ConsoleHistory, ConsoleLayer, MessageLog};
