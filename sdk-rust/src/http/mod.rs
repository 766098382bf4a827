mod options;
mod transport;

pub use options::HttpTransportOptions;
pub use transport::HttpTransport;
