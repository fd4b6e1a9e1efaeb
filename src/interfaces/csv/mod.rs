pub mod item_reader;
pub mod proposal_writer;
