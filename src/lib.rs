#![cfg_attr(not(test), no_std)]

use core::future::Future;

use embassy_futures::select::{select, Either};
use embassy_time::Timer;
use embedded_io_async::Read;
use log::{debug, error, warn};

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod decoder;
pub use decoder::*;

mod reading;
pub use reading::*;

mod publish;
pub use publish::*;

#[cfg(feature = "mqtt")]
mod mqtt;
#[cfg(feature = "mqtt")]
pub use mqtt::*;

/// Represents a USB CO2 monitor.
///
/// The monitor continuously reports scrambled 8-byte frames, each carrying
/// one measurement. This struct reads those frames, descrambles them and
/// collects them until both temperature and CO2 concentration are known.
///
/// # Type Parameters
///
/// * `Source`: The transport the frames are read from, typically a HID
///   device handle. It must implement `embedded_io_async::Read` and return
///   exactly one frame per read.
pub struct Co2Mon<Source> {
    source: Source,
    config: Config,
}

impl<S> Co2Mon<S>
where
    S: Read,
{
    /// Creates a new `Co2Mon` instance.
    ///
    /// # Arguments
    ///
    /// * `source`: The transport frames are read from.
    /// * `config`: The session configuration.
    pub fn new(source: S, config: Config) -> Self {
        Self { source, config }
    }

    /// Gives back the frame source.
    pub fn release(self) -> S {
        self.source
    }

    /// Reads one raw frame from the source.
    ///
    /// # Returns
    ///
    /// * `Ok([u8; 8])` with the scrambled frame.
    /// * `Err(Error::ReadFailure)` if the source reported an error.
    /// * `Err(Error::ShortRead)` if the source returned any other byte count.
    pub async fn read_frame(&mut self) -> Result<[u8; FRAME_SIZE], Error> {
        let mut frame = [0u8; FRAME_SIZE];
        let len = self.source.read(&mut frame).await.map_err(|e| {
            error!("Failed to read frame: {:?}", e);
            Error::ReadFailure
        })?;

        if len != FRAME_SIZE {
            error!("Read {} bytes, expected {}", len, FRAME_SIZE);
            return Err(Error::ShortRead { len });
        }

        debug!("Raw frame: {:02X?}", frame);
        Ok(frame)
    }

    /// Reads frames until both temperature and CO2 have been observed.
    ///
    /// Frames failing the checksum or carrying other quantities are skipped.
    /// A read error ends the session and any partial reading is dropped.
    /// There is no bound on the number of frames read; see [`Co2Mon::run`].
    pub async fn collect(&mut self) -> Result<Co2MonData, Error> {
        let mut reading = Reading::new();
        loop {
            let frame = self.read_frame().await?;
            if let Some(sample) = decode_sample(&frame) {
                reading.apply(sample);
            }
            if let Some(data) = reading.complete() {
                debug!("Collection complete: {:?}", data);
                return Ok(data);
            }
        }
    }

    /// Collects a reading, giving up when `deadline` resolves first.
    ///
    /// Returns `Err(Error::Timeout)` if the deadline wins. Values observed
    /// before the deadline are never reported.
    pub async fn run_until<D>(&mut self, deadline: D) -> Result<Co2MonData, Error>
    where
        D: Future,
    {
        match select(self.collect(), deadline).await {
            Either::First(result) => result,
            Either::Second(_) => {
                warn!("Deadline elapsed before temperature and CO2 were read");
                Err(Error::Timeout)
            }
        }
    }

    /// Collects a reading within the configured timeout.
    pub async fn run(&mut self) -> Result<Co2MonData, Error> {
        let timeout = self.config.timeout;
        debug!("Collecting for at most {} ms", timeout.as_millis());
        self.run_until(Timer::after(timeout)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::pin::Pin;
    use core::task::{Context, Poll};
    use embedded_io_async::{ErrorKind, ErrorType};
    use futures::executor::block_on;
    use std::collections::VecDeque;

    // Replays reports in order, then blocks forever.
    struct ScriptedSource {
        reports: VecDeque<Result<Vec<u8>, ErrorKind>>,
    }

    impl ScriptedSource {
        fn new(reports: Vec<Result<Vec<u8>, ErrorKind>>) -> Self {
            Self {
                reports: reports.into(),
            }
        }
    }

    impl ErrorType for ScriptedSource {
        type Error = ErrorKind;
    }

    impl Read for ScriptedSource {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
            match self.reports.pop_front() {
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(e)) => Err(e),
                None => core::future::pending().await,
            }
        }
    }

    // Resolves after being polled `remaining` more times.
    struct AfterPolls {
        remaining: u32,
    }

    impl Future for AfterPolls {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.remaining == 0 {
                return Poll::Ready(());
            }
            self.remaining -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }

    fn frame(opcode: u8, value: u16) -> Result<Vec<u8>, ErrorKind> {
        Ok(encode(opcode, value).to_vec())
    }

    fn garbage() -> Result<Vec<u8>, ErrorKind> {
        Ok(vec![0u8; FRAME_SIZE])
    }

    fn monitor(reports: Vec<Result<Vec<u8>, ErrorKind>>) -> Co2Mon<ScriptedSource> {
        Co2Mon::new(ScriptedSource::new(reports), Config::default())
    }

    #[test]
    fn completes_after_temperature_and_co2() {
        let mut mon = monitor(vec![
            frame(OPCODE_TEMPERATURE, 4680),
            frame(OPCODE_CO2, 415),
            frame(OPCODE_CO2, 999),
        ]);
        let data = block_on(mon.collect()).unwrap();
        assert!((data.temperature - 19.35).abs() < 1e-3);
        assert_eq!(data.co2, 415);
        assert_eq!(mon.release().reports.len(), 1);
    }

    #[test]
    fn skips_invalid_and_unknown_frames() {
        let mut mon = monitor(vec![
            garbage(),
            frame(0x6E, 1234),
            frame(OPCODE_CO2, 800),
            garbage(),
            frame(0x41, 7),
            frame(OPCODE_TEMPERATURE, 4700),
            frame(OPCODE_CO2, 1),
        ]);
        let data = block_on(mon.collect()).unwrap();
        assert_eq!(data.co2, 800);
        assert!((data.temperature - 20.6).abs() < 1e-3);
        assert_eq!(mon.release().reports.len(), 1);
    }

    #[test]
    fn later_frames_overwrite_earlier_ones() {
        let mut mon = monitor(vec![
            frame(OPCODE_CO2, 500),
            frame(OPCODE_CO2, 510),
            frame(OPCODE_TEMPERATURE, 4680),
        ]);
        assert_eq!(block_on(mon.collect()).unwrap().co2, 510);
    }

    #[test]
    fn read_error_aborts_partial_session() {
        let mut mon = monitor(vec![
            frame(OPCODE_TEMPERATURE, 4680),
            Err(ErrorKind::BrokenPipe),
            frame(OPCODE_CO2, 415),
        ]);
        assert_eq!(block_on(mon.collect()), Err(Error::ReadFailure));
        assert_eq!(mon.release().reports.len(), 1);
    }

    #[test]
    fn short_read_is_fatal() {
        let mut mon = monitor(vec![Ok(vec![1, 2, 3, 4, 5]), frame(OPCODE_CO2, 415)]);
        assert_eq!(
            block_on(mon.read_frame()),
            Err(Error::ShortRead { len: 5 })
        );
    }

    #[test]
    fn deadline_discards_partial_reading() {
        let mut mon = monitor(vec![frame(OPCODE_TEMPERATURE, 4680)]);
        let result = block_on(mon.run_until(AfterPolls { remaining: 3 }));
        assert_eq!(result, Err(Error::Timeout));
        assert!(mon.release().reports.is_empty());
    }

    #[test]
    fn completes_before_deadline() {
        let mut mon = monitor(vec![
            frame(OPCODE_CO2, 415),
            frame(OPCODE_TEMPERATURE, 4680),
        ]);
        let result = block_on(mon.run_until(core::future::pending::<()>()));
        assert_eq!(result.map(|d| d.co2), Ok(415));
    }

    #[test]
    fn run_times_out_after_configured_duration() {
        let config = Config::default().timeout(embassy_time::Duration::from_millis(50));
        let mut mon = Co2Mon::new(
            ScriptedSource::new(vec![frame(OPCODE_CO2, 415)]),
            config,
        );
        let started = std::time::Instant::now();
        assert_eq!(block_on(mon.run()), Err(Error::Timeout));
        assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    }

    #[test]
    fn run_completes_within_timeout() {
        let mut mon = monitor(vec![
            frame(OPCODE_TEMPERATURE, 4680),
            frame(OPCODE_CO2, 415),
        ]);
        assert_eq!(block_on(mon.run()).map(|d| d.co2), Ok(415));
    }

    #[test]
    fn expired_deadline_times_out_when_source_blocks() {
        let mut mon = monitor(vec![]);
        let result = block_on(mon.run_until(core::future::ready(())));
        assert_eq!(result, Err(Error::Timeout));
    }
}
