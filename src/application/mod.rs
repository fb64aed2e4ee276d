// Interactive analysis session (prompt loop state machine)
pub mod session;
