use reqwest::blocking::Client;
use std::time::Duration;

/// What a client is used for; decides how long a request may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Small documents such as the resource catalog
    Catalog,
    /// Toolchain archives, which run to hundreds of megabytes
    Archive,
}

impl Purpose {
    pub fn timeout(self) -> Duration {
        match self {
            Purpose::Catalog => Duration::from_secs(30),
            Purpose::Archive => Duration::from_secs(30 * 60),
        }
    }

    pub fn client(self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .user_agent(concat!("mobup/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout())
            .build()
    }
}
