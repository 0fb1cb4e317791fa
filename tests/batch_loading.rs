//! Batch loading over the fixture maps directory: one map per call,
//! deterministic order, monotonic progress, explicit completion.

use lib_gamemap::{BatchError, BatchLoader, MapLoader};

fn fixture_loader() -> MapLoader {
    MapLoader::from_dictionary_file("tests/data/characters_dictionary.json").unwrap()
}

#[test]
fn loads_one_map_per_call_until_done() {
    let mut batch = BatchLoader::new(fixture_loader(), "tests/data/maps").unwrap();

    // notes.txt in the directory is not a map and must be ignored.
    assert_eq!(batch.total(), 3);
    assert!(!batch.is_done());

    let mut order = Vec::new();
    let mut progress = Vec::new();
    let mut done_flags = Vec::new();
    loop {
        let step = match batch.load_next() {
            Ok(step) => step,
            Err(BatchError::AlreadyComplete) => break,
            Err(e) => panic!("load failed: {e}"),
        };
        order.push(step.name.clone());
        progress.push(step.progress);
        done_flags.push(step.done);
        assert_eq!(step.maps.len(), order.len());
    }

    // FIFO over the sorted file names.
    assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    assert_eq!(done_flags, vec![false, false, true]);

    // Progress is monotonic and ends at exactly 100.
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(progress[2], 100.0);
    assert!((progress[0] - 100.0 / 3.0).abs() < 1e-3);

    assert!(batch.is_done());
    let maps = batch.into_maps();
    assert_eq!(maps.len(), 3);
    assert_eq!(maps["beta"].characters.len(), 1);
    assert_eq!(maps["beta"].characters[0].kind, "torchguy");
    assert!(!maps["gamma"].walls().unwrap().tiles.is_empty());
}

#[test]
fn loading_past_the_end_fails_explicitly() {
    let mut batch = BatchLoader::new(fixture_loader(), "tests/data/maps").unwrap();
    for _ in 0..batch.total() {
        batch.load_next().unwrap();
    }

    assert!(matches!(
        batch.load_next(),
        Err(BatchError::AlreadyComplete)
    ));
    // The accumulated results survive the failed call.
    assert_eq!(batch.maps().len(), 3);
}

#[test]
fn empty_directory_is_complete_from_the_start() {
    let mut batch = BatchLoader::new(fixture_loader(), "tests/data/empty").unwrap();

    assert_eq!(batch.total(), 0);
    assert!(batch.is_done());
    assert_eq!(batch.progress(), 100.0);
    assert!(matches!(
        batch.load_next(),
        Err(BatchError::AlreadyComplete)
    ));
}

#[test]
fn missing_directory_fails_to_scan() {
    let result = BatchLoader::new(fixture_loader(), "tests/data/no_such_dir");
    assert!(matches!(result, Err(BatchError::Scan { .. })));
}
