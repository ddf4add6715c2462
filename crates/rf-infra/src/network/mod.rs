mod http_connectivity;
mod static_connectivity;

pub use http_connectivity::{ConnectivityError, HttpConnectivity};
pub use static_connectivity::StaticConnectivity;
