mod client;
mod decode;
mod error;
mod transport;

pub use client::HttpTransport;
pub use decode::{decode_item, decode_list};
pub use error::TransportError;
pub use transport::Transport;
