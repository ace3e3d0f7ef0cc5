pub mod message_reader;
pub mod outcome_writer;

pub use message_reader::MessageReader;
pub use outcome_writer::OutcomeWriter;
