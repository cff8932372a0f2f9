//! Concurrent patching: one orchestrator per file, one shared channel

mod common;

use std::collections::HashMap;
use std::fs;
use std::thread;

use cpio_patch::{Patcher, Pattern};
use tempfile::TempDir;

use common::{gunzip, gz, payload_with_markers};

#[test]
fn concurrent_patchers_share_one_result_channel() {
    let images = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    let file_count = 4;
    let mut expected = HashMap::new();
    for i in 0..file_count {
        let offsets = [10 + i * 37, 500 + i];
        let payload = payload_with_markers(b"TARGET01", &offsets, 900);
        let path = images.path().join(format!("disk_{i}.img"));
        fs::write(&path, gz(&payload)).unwrap();
        expected.insert(path, payload_with_markers(b"TARGET02", &offsets, 900));
    }

    let (sender, receiver) = crossbeam_channel::unbounded();

    let handles: Vec<_> = expected
        .keys()
        .cloned()
        .map(|path| {
            let sender = sender.clone();
            let scratch_dir = scratch.path().to_path_buf();
            thread::spawn(move || {
                let mut patcher = Patcher::new(scratch_dir, path, sender);
                patcher.patch(
                    &[Pattern::new(
                        "marker",
                        2,
                        b"TARGET01".to_vec(),
                        b"TARGET02".to_vec(),
                    )],
                    false,
                );
            })
        })
        .collect();
    drop(sender);

    let results: Vec<_> = receiver.iter().collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(results.len(), file_count);

    for result in results {
        assert!(
            result.error.is_none(),
            "{} failed: {:?}",
            result.path.display(),
            result.error
        );
        assert_eq!(result.bytes_patched, 16);

        // Each file was patched independently with no cross-talk
        let patched = gunzip(&fs::read(&result.path).unwrap());
        assert_eq!(&patched, &expected[&result.path]);
    }
}

#[test]
fn bounded_channel_delivers_when_drained() {
    let images = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    let payload = payload_with_markers(b"TARGET01", &[42], 300);
    let path = images.path().join("disk.img");
    fs::write(&path, gz(&payload)).unwrap();

    // Capacity 1 is enough as long as the consumer drains the channel
    let (sender, receiver) = crossbeam_channel::bounded(1);

    let mut patcher = Patcher::new(scratch.path(), &path, sender);
    patcher.patch(
        &[Pattern::new(
            "marker",
            1,
            b"TARGET01".to_vec(),
            b"TARGET02".to_vec(),
        )],
        false,
    );

    let result = receiver.recv().unwrap();
    assert!(result.error.is_none());
    assert_eq!(result.bytes_patched, 8);
}
