//! Parallel indexing: file paths in, hashed items out.
//!
//! A fixed pool of workers drains the submitted paths. Each worker decodes,
//! hashes, registers the file with the mapper (which assigns the item id),
//! and sends the item down the result channel; decode failures go down a
//! separate error channel and never abort the batch. Dropping the producer
//! ends of both channels is what lets the collectors finish.
//!
//! Items arrive in whatever order workers finish. Ids reflect registration
//! order, not submission order, and carry no meaning across runs.

use crate::codec;
use crate::error::Error;
use crate::hash::HashKind;
use crate::vptree::{FileMapper, Item};
use log::info;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use threadpool::ThreadPool;

/// Hash every decodable file and register it with `mapper`.
///
/// Returns the indexed items together with the per-file failures.
pub fn index_files(
    files: &[PathBuf],
    hash: HashKind,
    workers: usize,
    mapper: &Arc<FileMapper>,
) -> (Vec<Item>, Vec<Error>) {
    let workers = workers.max(1).min(files.len().max(1));
    let pool = ThreadPool::new(workers);

    let (item_tx, item_rx) = mpsc::channel();
    let (err_tx, err_rx) = mpsc::channel();

    info!("indexing {} files on {} workers", files.len(), workers);

    for path in files.iter().cloned() {
        let item_tx = item_tx.clone();
        let err_tx = err_tx.clone();
        let mapper = Arc::clone(mapper);
        pool.execute(move || match codec::load(&path) {
            Err(e) => {
                let _ = err_tx.send(e);
            }
            Ok(img) => {
                let hashes = hash.fingerprint(&img);
                info!("computed image hash for {}: {}", path.display(), hashes);
                let id = mapper.register(path);
                let _ = item_tx.send(Item { id, hashes });
            }
        });
    }
    // close both channels so the collectors below can run dry
    drop(item_tx);
    drop(err_tx);

    let items: Vec<Item> = item_rx.iter().collect();
    let errors: Vec<Error> = err_rx.iter().collect();

    info!("indexed {} items, {} failures", items.len(), errors.len());
    (items, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, shade: u8) -> PathBuf {
        let path = dir.path().join(name);
        let buf = image::GrayImage::from_pixel(16, 16, image::Luma([shade]));
        buf.save(&path).unwrap();
        path
    }

    #[test]
    fn every_decodable_file_becomes_an_item() {
        let dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..12)
            .map(|i| write_png(&dir, &format!("img{}.png", i), (i * 20) as u8))
            .collect();

        let mapper = Arc::new(FileMapper::new());
        let (items, errors) = index_files(&files, HashKind::Dct, 4, &mapper);

        assert!(errors.is_empty());
        assert_eq!(items.len(), 12);
        assert_eq!(mapper.len(), 12);

        let ids: HashSet<u32> = items.iter().map(|it| it.id).collect();
        assert_eq!(ids.len(), 12);
        assert!(ids.iter().all(|&id| (1..=12).contains(&id)));

        let registered: HashSet<PathBuf> = items.iter().map(|it| mapper.path(it.id)).collect();
        assert_eq!(registered, files.into_iter().collect());
    }

    #[test]
    fn a_bad_file_fails_alone() {
        let dir = TempDir::new().unwrap();
        let good = write_png(&dir, "good.png", 80);
        let bad = dir.path().join("bad.png");
        fs::write(&bad, b"this is not a png").unwrap();

        let mapper = Arc::new(FileMapper::new());
        let (items, errors) =
            index_files(&[good.clone(), bad.clone()], HashKind::DHash, 2, &mapper);

        assert_eq!(items.len(), 1);
        assert_eq!(mapper.path(items[0].id), good);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            Error::Decode { path, .. } => assert_eq!(path, &bad),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_produces_nothing() {
        let mapper = Arc::new(FileMapper::new());
        let (items, errors) = index_files(&[], HashKind::Dct, 4, &mapper);
        assert!(items.is_empty());
        assert!(errors.is_empty());
        assert!(mapper.is_empty());
    }

    #[test]
    fn fingerprint_width_tracks_the_algorithm() {
        let dir = TempDir::new().unwrap();
        let file = write_png(&dir, "one.png", 10);

        let mapper = Arc::new(FileMapper::new());
        let (items, _) = index_files(std::slice::from_ref(&file), HashKind::DHash, 1, &mapper);
        assert_eq!(items[0].hashes.words().len(), 2);

        let mapper = Arc::new(FileMapper::new());
        let (items, _) = index_files(&[file], HashKind::Dct, 1, &mapper);
        assert_eq!(items[0].hashes.words().len(), 1);
    }
}
