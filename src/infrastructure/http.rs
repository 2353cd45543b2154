pub mod wled_http_forwarder;

pub use wled_http_forwarder::WledHttpForwarder;
