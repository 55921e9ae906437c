//! Command line interface for the `depthframe` binary.

use std::{
    net::SocketAddr,
    num::{NonZeroU32, NonZeroUsize, ParseIntError},
};

use clap::{Args, Parser, Subcommand};

/// Command line arguments for the `depthframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "depthframe",
    version,
    about = "Receive chunked depth-camera frames over UDP"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Listen for frames and report the delivered frame rate.
    Listen(ListenArgs),
    /// Send synthetic gradient frames to a receiver.
    Emit(EmitArgs),
}

#[derive(Debug, Args)]
pub struct ListenArgs {
    /// Local address to bind.
    #[arg(long, default_value = "0.0.0.0:9000")]
    pub bind: SocketAddr,
    /// Milliseconds an incomplete frame may wait for missing chunks.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
    /// Protocol tag, decimal or 0x-prefixed hex.
    #[arg(long, default_value = "0x12345678", value_parser = parse_magic)]
    pub magic: u32,
    /// Byte distance between consecutive chunk offsets.
    #[arg(long, default_value = "512")]
    pub stride: NonZeroUsize,
    /// Largest frame accepted, in bytes.
    #[arg(long, default_value = "16777216")]
    pub max_frame_bytes: NonZeroU32,
    /// Largest chunk count accepted per frame.
    #[arg(long, default_value = "65536")]
    pub max_chunks: NonZeroU32,
    /// Requested socket receive buffer, in bytes.
    #[arg(long, default_value_t = 4 * 1024 * 1024)]
    pub recv_buffer: usize,
    /// Frames buffered between the receiver and the consumer.
    #[arg(long, default_value = "8")]
    pub channel_capacity: NonZeroUsize,
    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}

#[derive(Debug, Args)]
pub struct EmitArgs {
    /// Receiver address.
    #[arg(long, default_value = "127.0.0.1:9000")]
    pub target: SocketAddr,
    /// Frame width in pixels (one byte per pixel).
    #[arg(long, default_value_t = 320)]
    pub width: u32,
    /// Frame height in pixels.
    #[arg(long, default_value_t = 240)]
    pub height: u32,
    /// Number of frames to send.
    #[arg(long, default_value_t = 1)]
    pub frames: u32,
    /// Milliseconds between frames.
    #[arg(long, default_value_t = 100)]
    pub interval_ms: u64,
    /// Protocol tag, decimal or 0x-prefixed hex.
    #[arg(long, default_value = "0x12345678", value_parser = parse_magic)]
    pub magic: u32,
    /// Bytes per chunk.
    #[arg(long, default_value = "512")]
    pub stride: NonZeroUsize,
}

/// Parse a protocol tag given in decimal or `0x`-prefixed hexadecimal.
pub fn parse_magic(value: &str) -> Result<u32, ParseIntError> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => value.parse(),
    }
}
