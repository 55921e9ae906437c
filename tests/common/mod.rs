//! Shared helpers for loopback receiver tests.

use std::{net::SocketAddr, time::Duration};

use depthframe::{
    config::ReceiverConfig,
    frame::ReassembledFrame,
    receiver::{FrameReceiver, ReceiveStats},
};
use tokio::{
    net::UdpSocket,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

/// A receiver bound to an ephemeral loopback port and running in the
/// background.
pub struct RunningReceiver {
    pub addr: SocketAddr,
    pub frames: mpsc::Receiver<ReassembledFrame>,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<ReceiveStats>,
}

impl RunningReceiver {
    pub async fn stop(self) -> ReceiveStats {
        let _ = self.stop.send(());
        self.handle.await.expect("receiver task panicked")
    }

    /// Wait for the next frame, failing the test after `limit`.
    pub async fn next_frame(&mut self, limit: Duration) -> ReassembledFrame {
        tokio::time::timeout(limit, self.frames.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("receiver closed the channel")
    }
}

pub fn spawn_receiver(config: ReceiverConfig) -> RunningReceiver {
    let config = config.with_bind_addr(([127, 0, 0, 1], 0).into());
    let receiver = FrameReceiver::bind(config).expect("bind loopback receiver");
    let addr = receiver.local_addr().expect("local address");
    let (frames_tx, frames) = mpsc::channel(8);
    let (stop, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(receiver.run_with_shutdown(frames_tx, async move {
        let _ = stop_rx.await;
    }));
    RunningReceiver {
        addr,
        frames,
        stop,
        handle,
    }
}

pub async fn sender_for(target: SocketAddr) -> UdpSocket {
    let socket = UdpSocket::bind(("127.0.0.1", 0))
        .await
        .expect("bind sender socket");
    socket.connect(target).await.expect("connect sender socket");
    socket
}
