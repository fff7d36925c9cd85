use embassy_time::Duration;

use crate::constants::{DEFAULT_CLIENT_ID, DEFAULT_TIMEOUT_SECS, DEFAULT_TOPIC};

/// Configuration settings for a collection session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Wall-clock bound on a session started with [`crate::Co2Mon::run`].
    pub timeout: Duration,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `timeout` - How long a session may collect before giving up.
    pub fn new(timeout: Duration) -> Config {
        Config { timeout }
    }

    /// Sets the session timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The default configuration bounds a session at 30 seconds.
impl Default for Config {
    fn default() -> Config {
        Config {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Where and as whom readings are published.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PublishConfig<'a> {
    /// Base topic; values go to `<topic>/temperature` and `<topic>/co2`.
    pub topic: &'a str,
    /// Client identifier presented to the broker.
    pub client_id: &'a str,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

impl<'a> PublishConfig<'a> {
    /// Creates a new `PublishConfig` for `topic` with the default client id
    /// and no credentials.
    pub fn new(topic: &'a str) -> PublishConfig<'a> {
        PublishConfig {
            topic,
            ..PublishConfig::default()
        }
    }

    /// Sets the base topic.
    pub fn topic(mut self, topic: &'a str) -> Self {
        self.topic = topic;
        self
    }

    /// Sets the client identifier.
    pub fn client_id(mut self, client_id: &'a str) -> Self {
        self.client_id = client_id;
        self
    }

    /// Sets the broker credentials. Empty strings are treated as absent.
    pub fn credentials(mut self, username: &'a str, password: &'a str) -> Self {
        self.username = Some(username).filter(|u| !u.is_empty());
        self.password = Some(password).filter(|p| !p.is_empty());
        self
    }
}

impl Default for PublishConfig<'_> {
    fn default() -> Self {
        PublishConfig {
            topic: DEFAULT_TOPIC,
            client_id: DEFAULT_CLIENT_ID,
            username: None,
            password: None,
        }
    }
}
