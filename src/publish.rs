use core::fmt::{Debug, Write};

use heapless::String;
use log::{debug, error};

use crate::constants::MAX_TOPIC_LEN;
use crate::error::Error;
use crate::reading::Co2MonData;

/// A sink for published readings, such as an MQTT client.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    type Error: Debug;

    /// Sends `payload` under `topic`.
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;
}

fn subtopic(base: &str, name: &str) -> Result<String<MAX_TOPIC_LEN>, Error> {
    let mut topic = String::new();
    write!(topic, "{}/{}", base, name).map_err(|_| {
        error!("Topic {}/{} exceeds {} bytes", base, name, MAX_TOPIC_LEN);
        Error::TopicTooLong
    })?;
    Ok(topic)
}

/// Publishes a complete reading under `base_topic`.
///
/// The temperature goes to `<base_topic>/temperature` with two decimals and
/// the CO2 concentration to `<base_topic>/co2` as an integer. Both messages
/// are attempted even if the first one fails.
///
/// # Returns
///
/// * `Ok(())` if both messages were accepted.
/// * `Err(Error::PublishFailure)` if the publisher rejected either message.
/// * `Err(Error::TopicTooLong)` if `base_topic` does not fit the topic buffer.
pub async fn publish_reading<P: Publisher>(
    publisher: &mut P,
    base_topic: &str,
    data: &Co2MonData,
) -> Result<(), Error> {
    let mut temperature: String<16> = String::new();
    write!(temperature, "{:.2}", data.temperature).map_err(|_| Error::PublishFailure)?;
    let mut co2: String<8> = String::new();
    write!(co2, "{}", data.co2).map_err(|_| Error::PublishFailure)?;

    let mut result = Ok(());
    for (name, payload) in [("temperature", temperature.as_str()), ("co2", co2.as_str())] {
        let topic = subtopic(base_topic, name)?;
        debug!("Publishing {} to {}", payload, topic);
        if let Err(e) = publisher.publish(&topic, payload.as_bytes()).await {
            error!("Failed to publish {}: {:?}", topic, e);
            result = Err(Error::PublishFailure);
        }
    }
    result
}
