//! Run loop for [`FrameReceiver`].

mod backoff;
mod source;

use std::{future::Future, ops::ControlFlow};

pub use backoff::BackoffConfig;
use log::{debug, info, warn};
pub use source::DatagramSource;
use tokio::{
    select,
    signal,
    sync::mpsc::{self, error::TrySendError},
    time::{Instant, sleep, sleep_until},
};

use super::{Disposition, FrameReceiver, ReceiveDriver};
use crate::{datagram::MAX_DATAGRAM_LEN, frame::ReassembledFrame, metrics};

/// Counters accumulated over one run of the receive loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReceiveStats {
    /// Datagrams read from the source.
    pub datagrams_received: u64,
    /// Datagrams discarded by the parser, the limits or for lack of a frame.
    pub datagrams_discarded: u64,
    /// Frames accepted by the consumer channel.
    pub frames_delivered: u64,
    /// Frames dropped because the consumer channel was full.
    pub frames_dropped: u64,
    /// Failed receive calls.
    pub receive_errors: u64,
}

impl<S: DatagramSource> FrameReceiver<S> {
    /// Run the receiver until Ctrl+C is received or `frames` is closed.
    pub async fn run(self, frames: mpsc::Sender<ReassembledFrame>) -> ReceiveStats {
        self.run_with_shutdown(frames, async {
            let _ = signal::ctrl_c().await;
        })
        .await
    }

    /// Run the receiver until `shutdown` resolves or `frames` is closed.
    ///
    /// Every frame leaving the assembler is offered to `frames` without
    /// waiting; a full channel drops the frame so the socket keeps being
    /// drained. A frame still in flight at shutdown is discarded. Receive
    /// errors are logged and retried after the configured back-off.
    ///
    /// # Examples
    ///
    /// ```
    /// use depthframe::{config::ReceiverConfig, receiver::FrameReceiver};
    /// use tokio::sync::{mpsc, oneshot};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), depthframe::receiver::ReceiverError> {
    /// let config = ReceiverConfig::default().with_bind_addr(([127, 0, 0, 1], 0).into());
    /// let receiver = FrameReceiver::bind(config)?;
    /// let (frames_tx, _frames_rx) = mpsc::channel(4);
    /// let (stop_tx, stop_rx) = oneshot::channel::<()>();
    ///
    /// let handle = tokio::spawn(receiver.run_with_shutdown(frames_tx, async move {
    ///     let _ = stop_rx.await;
    /// }));
    /// let _ = stop_tx.send(());
    /// let stats = handle.await.expect("receiver task panicked");
    /// assert_eq!(stats.frames_delivered, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_with_shutdown<F>(
        self,
        frames: mpsc::Sender<ReassembledFrame>,
        shutdown: F,
    ) -> ReceiveStats
    where
        F: Future<Output = ()> + Send,
    {
        let FrameReceiver { source, config } = self;
        let mut driver = ReceiveDriver::new(&config);
        let backoff = config.backoff.normalized();
        let mut delay = backoff.initial_delay;
        let mut buf = vec![0_u8; MAX_DATAGRAM_LEN];
        let mut stats = ReceiveStats::default();

        if let Ok(addr) = source.local_addr() {
            info!("listening for frames: local_addr={addr}, magic={:#010x}", config.magic);
        }

        tokio::pin!(shutdown);

        loop {
            let deadline = driver.deadline().map(Instant::from_std);

            select! {
                biased;

                () = &mut shutdown => {
                    if driver.assembler().is_in_progress() {
                        debug!("shutdown requested; discarding in-flight frame");
                    }
                    break;
                }
                () = frames.closed() => {
                    info!("frame consumer closed; stopping receiver");
                    break;
                }
                () = expiry(deadline) => {
                    let now = Instant::now().into_std();
                    if let Some(frame) = driver.poll_expired(now)
                        && hand_off(&frames, frame, &mut stats).is_break()
                    {
                        break;
                    }
                }
                result = source.recv(&mut buf) => match result {
                    Ok(len) => {
                        delay = backoff.initial_delay;
                        stats.datagrams_received += 1;
                        metrics::inc_datagrams();

                        let now = Instant::now().into_std();
                        let mut consumer_gone = false;
                        let disposition = driver.handle_datagram(&buf[..len], now, |frame| {
                            consumer_gone |= hand_off(&frames, frame, &mut stats).is_break();
                        });
                        record_disposition(disposition, len, &mut stats);
                        if consumer_gone {
                            break;
                        }
                    }
                    Err(e) => {
                        stats.receive_errors += 1;
                        metrics::inc_receive_errors();
                        warn!("receive error: error={e}, retry_in={delay:?}");
                        select! {
                            biased;
                            () = &mut shutdown => break,
                            () = sleep(delay) => {}
                        }
                        delay = backoff.next_delay(delay);
                    }
                },
            }
        }

        debug!("receiver stopped: {stats:?}");
        stats
    }
}

async fn expiry(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn record_disposition(disposition: Disposition, len: usize, stats: &mut ReceiveStats) {
    let Some(reason) = disposition.discard_reason() else {
        return;
    };
    stats.datagrams_discarded += 1;
    metrics::inc_discarded(reason);
    match disposition {
        Disposition::Rejected(rejection) => {
            debug!("discarding datagram: len={len}, reason={rejection}");
        }
        Disposition::OverLimit {
            total_size,
            total_chunks,
        } => warn!(
            "discarding datagram for oversized frame: total_size={total_size}, \
             total_chunks={total_chunks}"
        ),
        Disposition::Orphaned => debug!("discarding chunk with no frame in flight: len={len}"),
        Disposition::Accepted => {}
    }
}

fn hand_off(
    frames: &mpsc::Sender<ReassembledFrame>,
    frame: ReassembledFrame,
    stats: &mut ReceiveStats,
) -> ControlFlow<()> {
    let outcome = frame.outcome();
    let bytes = frame.payload().len();
    let chunks_received = frame.chunks_received();
    let total_chunks = frame.total_chunks();

    match frames.try_send(frame) {
        Ok(()) => {
            stats.frames_delivered += 1;
            metrics::inc_frames(outcome);
            tracing::debug!(
                outcome = outcome.as_str(),
                bytes,
                chunks_received,
                total_chunks,
                "frame delivered"
            );
            ControlFlow::Continue(())
        }
        Err(TrySendError::Full(_)) => {
            stats.frames_dropped += 1;
            metrics::inc_dropped();
            warn!(
                "frame consumer lagging; dropping {} frame: bytes={bytes}",
                outcome.as_str()
            );
            ControlFlow::Continue(())
        }
        Err(TrySendError::Closed(_)) => ControlFlow::Break(()),
    }
}
