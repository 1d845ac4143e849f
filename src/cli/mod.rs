pub mod repl;
pub mod ui;
