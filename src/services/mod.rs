pub mod callback;
pub mod dispatcher;
pub mod parser;
pub mod reply;
