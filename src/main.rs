//! `depthframe` binary: listen for chunked frames or emit test frames.

mod cli;

use std::{
    error::Error,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use clap::Parser;
use cli::{Cli, Command, EmitArgs, ListenArgs};
use depthframe::{
    chunker::FrameChunker,
    config::ReceiverConfig,
    rate::FrameRate,
    receiver::FrameReceiver,
};
use log::{debug, info, warn};
use tokio::{net::UdpSocket, sync::mpsc, time::Instant};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Listen(args) => listen(args).await,
        Command::Emit(args) => emit(args).await,
    }
}

async fn listen(args: ListenArgs) -> Result<(), BoxError> {
    if let Some(addr) = args.metrics_addr {
        install_metrics_exporter(addr)?;
    }

    let config = ReceiverConfig::default()
        .with_bind_addr(args.bind)
        .with_magic(args.magic)
        .with_chunk_stride(args.stride)
        .with_frame_timeout(Duration::from_millis(args.timeout_ms))
        .with_limits(args.max_frame_bytes, args.max_chunks)
        .with_recv_buffer_size(args.recv_buffer);
    let receiver = FrameReceiver::bind(config)?;

    let (frames_tx, mut frames_rx) = mpsc::channel::<depthframe::ReassembledFrame>(args.channel_capacity.get());
    let consumer = tokio::spawn(async move {
        let mut rate = FrameRate::new(Instant::now().into_std(), Duration::from_secs(1));
        while let Some(frame) = frames_rx.recv().await {
            debug!(
                "frame received: outcome={}, bytes={}, chunks={}/{}",
                frame.outcome().as_str(),
                frame.payload().len(),
                frame.chunks_received(),
                frame.total_chunks()
            );
            if let Some(report) = rate.record_at(Instant::now().into_std()) {
                info!("frames={} fps={:.2}", report.frames, report.fps);
            }
        }
        rate.frames()
    });

    let stats = receiver.run(frames_tx).await;
    let consumed = consumer.await?;
    info!(
        "receiver stopped: frames={consumed}, datagrams={}, discarded={}, dropped={}, \
         errors={}",
        stats.datagrams_received,
        stats.datagrams_discarded,
        stats.frames_dropped,
        stats.receive_errors
    );
    Ok(())
}

#[cfg(feature = "metrics")]
fn install_metrics_exporter(addr: SocketAddr) -> Result<(), BoxError> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    info!("serving metrics: addr={addr}");
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn install_metrics_exporter(addr: SocketAddr) -> Result<(), BoxError> {
    warn!("metrics support not compiled in; ignoring --metrics-addr {addr}");
    Ok(())
}

async fn emit(args: EmitArgs) -> Result<(), BoxError> {
    let chunker = FrameChunker::new(args.magic, args.stride)?;
    let local: SocketAddr = if args.target.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(args.target).await?;

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    for sequence in 0..args.frames {
        ticker.tick().await;
        let frame = gradient_frame(args.width, args.height, sequence)?;
        let datagrams = chunker.chunk(&frame)?;
        let mut sent = 0_usize;
        for datagram in &datagrams {
            match socket.send(datagram).await {
                Ok(_) => sent += 1,
                Err(e) => warn!("send failed: target={}, error={e}", args.target),
            }
        }
        info!(
            "sent frame {sequence}: bytes={}, datagrams={sent}/{}",
            frame.len(),
            datagrams.len()
        );
    }
    Ok(())
}

/// One byte per pixel; the diagonal gradient shifts with each frame.
fn gradient_frame(width: u32, height: u32, sequence: u32) -> Result<Vec<u8>, BoxError> {
    let width = usize::try_from(width)?;
    let height = usize::try_from(height)?;
    let len = width
        .checked_mul(height)
        .ok_or("frame dimensions overflow")?;
    let shift = usize::try_from(sequence)?;
    Ok((0..len)
        .map(|i| (i % width + i / width).wrapping_add(shift).to_le_bytes()[0])
        .collect())
}
