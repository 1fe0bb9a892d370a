use httpmock::MockServer;
use rest_client::{ClientConfig, RestClient};
use std::net::TcpListener;

pub fn client(server: &MockServer) -> RestClient {
    RestClient::new(&server.base_url()).unwrap()
}

pub fn client_with<F>(server: &MockServer, configure: F) -> RestClient
where
    F: FnOnce(ClientConfig) -> ClientConfig,
{
    RestClient::with_config(configure(ClientConfig::new(&server.base_url()))).unwrap()
}

/// A local port nothing is listening on.
pub fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
