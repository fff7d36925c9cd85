use embedded_io_async::{Read, Write};
use log::{debug, error};
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;

use crate::config::PublishConfig;
use crate::error::Error;
use crate::publish::Publisher;

const MAX_PROPERTIES: usize = 5;

/// Publishes readings to an MQTT broker.
///
/// Messages are sent with QoS 0 and are not retained.
///
/// # Type Parameters
///
/// * `T`: A connected network stream to the broker.
pub struct MqttPublisher<'a, T>
where
    T: Read + Write,
{
    client: MqttClient<'a, T, MAX_PROPERTIES, CountingRng>,
}

impl<'a, T> MqttPublisher<'a, T>
where
    T: Read + Write,
{
    /// Opens an MQTT session over `network`.
    ///
    /// # Arguments
    ///
    /// * `network`: A stream already connected to the broker.
    /// * `write_buffer`, `recv_buffer`: Packet buffers, sized for the largest
    ///   message exchanged.
    /// * `config`: Client id and credentials.
    ///
    /// # Returns
    ///
    /// * `Err(Error::PublishFailure)` if the broker refused the connection.
    pub async fn connect(
        network: T,
        write_buffer: &'a mut [u8],
        recv_buffer: &'a mut [u8],
        config: &PublishConfig<'a>,
    ) -> Result<Self, Error> {
        let mut client_config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
        client_config.add_client_id(config.client_id);
        if let Some(username) = config.username {
            client_config.add_username(username);
        }
        if let Some(password) = config.password {
            client_config.add_password(password);
        }

        let write_len = write_buffer.len();
        let recv_len = recv_buffer.len();
        let mut client = MqttClient::<_, MAX_PROPERTIES, _>::new(
            network,
            write_buffer,
            write_len,
            recv_buffer,
            recv_len,
            client_config,
        );

        debug!("Connecting to broker as {}", config.client_id);
        client.connect_to_broker().await.map_err(|e| {
            error!("Failed to connect to broker: {:?}", e);
            Error::PublishFailure
        })?;
        Ok(Self { client })
    }

    /// Closes the MQTT session.
    pub async fn disconnect(mut self) -> Result<(), Error> {
        self.client.disconnect().await.map_err(|e| {
            error!("Failed to disconnect from broker: {:?}", e);
            Error::PublishFailure
        })
    }
}

impl<T> Publisher for MqttPublisher<'_, T>
where
    T: Read + Write,
{
    type Error = ReasonCode;

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), ReasonCode> {
        self.client
            .send_message(topic, payload, QualityOfService::QoS0, false)
            .await
    }
}
