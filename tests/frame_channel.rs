mod common;

use std::sync::Arc;
use std::thread;

use common::frames::{tag, tagged};
use drive_viz::core::{FrameChannel, SubmitOutcome};

#[test]
fn test_burst_keeps_newest_k_in_order() {
    let channel = FrameChannel::new(5);
    for id in 1..=12 {
        channel.submit(tagged(id));
        assert!(channel.len() <= 5);
    }

    let drained: Vec<u8> = std::iter::from_fn(|| channel.try_take()).map(|f| tag(&f)).collect();
    assert_eq!(drained, vec![8, 9, 10, 11, 12]);

    let stats = channel.stats();
    assert_eq!(stats.submitted, 12);
    assert_eq!(stats.evicted, 7);
    assert_eq!(stats.taken, 5);
}

#[test]
fn test_closed_channel_drops_everything() {
    let channel = FrameChannel::new(3);
    channel.submit(tagged(1));
    channel.close();

    assert!(channel.is_empty());
    assert_eq!(channel.submit(tagged(2)), SubmitOutcome::Closed);
    assert!(channel.try_take().is_none());
    assert_eq!(channel.stats().dropped, 1);
}

#[test]
fn test_concurrent_producer_and_consumer() {
    let channel = Arc::new(FrameChannel::new(5));
    let producer = {
        let channel = Arc::clone(&channel);
        thread::spawn(move || {
            for id in 0..200u8 {
                channel.submit(tagged(id));
                assert!(channel.len() <= 5);
            }
        })
    };

    // frames come out in submission order even with evictions in between
    let mut last: Option<u8> = None;
    let mut received = 0u64;
    while !producer.is_finished() || !channel.is_empty() {
        if let Some(frame) = channel.try_take() {
            let id = tag(&frame);
            if let Some(prev) = last {
                assert!(id > prev, "{} arrived after {}", id, prev);
            }
            last = Some(id);
            received += 1;
        }
    }
    producer.join().unwrap();

    let stats = channel.stats();
    assert_eq!(stats.submitted, 200);
    assert_eq!(stats.taken, received);
    assert_eq!(stats.evicted + stats.taken, 200);
    assert_eq!(last, Some(199));
}
