pub mod edit_reader;
pub mod error_writer;
