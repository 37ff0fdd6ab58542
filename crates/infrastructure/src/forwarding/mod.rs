pub mod response_writer;
pub mod upstream;

pub use response_writer::ResponseWriter;
pub use upstream::{ForwardTicket, UpstreamForwarder, QUEUE_DEPTH_PER_WORKER};
