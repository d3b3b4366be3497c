pub mod cx;
pub mod ndex;

pub use cx::CxError;
pub use ndex::{server_base_url, ClientError, NdexClient, NetworkStore};
