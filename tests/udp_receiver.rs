//! End-to-end tests sending chunked frames to a receiver over loopback UDP.

mod common;

use std::{num::NonZeroUsize, time::Duration};

use common::{sender_for, spawn_receiver};
use depthframe::{
    chunker::FrameChunker,
    config::ReceiverConfig,
    frame::FrameOutcome,
};
use rstest::rstest;

const WAIT: Duration = Duration::from_secs(5);

fn pattern(len: usize) -> Vec<u8> { (0..len).map(|i| (i % 251).to_le_bytes()[0]).collect() }

#[rstest]
#[case::single_datagram(300)]
#[case::exact_stride_multiple(1536)]
#[case::ragged_tail(10_000)]
#[tokio::test]
async fn frames_survive_the_round_trip(#[case] len: usize) {
    let mut receiver = spawn_receiver(ReceiverConfig::default());
    let sender = sender_for(receiver.addr).await;
    let frame = pattern(len);

    for datagram in FrameChunker::default().chunk(&frame).expect("frame fits") {
        sender.send(&datagram).await.expect("send datagram");
    }

    let received = receiver.next_frame(WAIT).await;
    assert_eq!(received.outcome(), FrameOutcome::Complete);
    assert_eq!(received.payload(), frame.as_slice());

    let stats = receiver.stop().await;
    assert_eq!(stats.frames_delivered, 1);
    assert_eq!(stats.datagrams_discarded, 0);
}

#[tokio::test]
async fn custom_magic_and_stride_are_honoured() {
    let stride = NonZeroUsize::new(1200).expect("non-zero");
    let config = ReceiverConfig::default()
        .with_magic(0xdead_beef)
        .with_chunk_stride(stride);
    let mut receiver = spawn_receiver(config);
    let sender = sender_for(receiver.addr).await;

    let stray = FrameChunker::default()
        .chunk(&pattern(100))
        .expect("frame fits");
    sender.send(&stray[0]).await.expect("send stray datagram");

    let frame = pattern(5000);
    let chunker = FrameChunker::new(0xdead_beef, stride).expect("valid stride");
    for datagram in chunker.chunk(&frame).expect("frame fits") {
        sender.send(&datagram).await.expect("send datagram");
    }

    let received = receiver.next_frame(WAIT).await;
    assert_eq!(received.payload(), frame.as_slice());

    let stats = receiver.stop().await;
    assert_eq!(stats.datagrams_discarded, 1);
}

#[tokio::test]
async fn missing_chunk_yields_a_timed_out_partial_frame() {
    let config = ReceiverConfig::default().with_frame_timeout(Duration::from_millis(200));
    let mut receiver = spawn_receiver(config);
    let sender = sender_for(receiver.addr).await;
    let frame = pattern(2048);

    let datagrams = FrameChunker::default().chunk(&frame).expect("frame fits");
    for (index, datagram) in datagrams.iter().enumerate() {
        if index != 2 {
            sender.send(datagram).await.expect("send datagram");
        }
    }

    let received = receiver.next_frame(WAIT).await;
    assert_eq!(received.outcome(), FrameOutcome::TimedOut);
    assert!(received.is_partial());
    assert_eq!(received.chunks_received(), 3);
    assert_eq!(&received.payload()[..1024], &frame[..1024]);
    assert!(received.payload()[1024..1536].iter().all(|b| *b == 0));
    assert_eq!(&received.payload()[1536..], &frame[1536..]);

    receiver.stop().await;
}
