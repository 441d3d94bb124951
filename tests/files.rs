use std::sync::Arc;

use num_complex::Complex;
use object_store::memory::InMemory;
use svbin::codecs::{AnyCodec, CodecId};
use svbin::{
    FileOptions, LocalBackend, ObjectStoreBackend, StorageBackend, SvbinError, load_record,
    read_record, save_record, write_record,
};

fn state() -> (Vec<usize>, Vec<Complex<f64>>) {
    let shape = vec![4, 3];
    let elements = (0..12)
        .map(|i| Complex::new(i as f64 * 0.5, 1.0 - i as f64))
        .collect();
    (shape, elements)
}

#[test]
fn blocking_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let (shape, elements) = state();
    for name in ["psi.svbin", "psi.svbin.gz", "psi.svbin.zst", "psi.svbin.lz4", "psi.svbin.zz"] {
        let path = dir.path().join(name);
        write_record(&path, &shape, &elements, 2.5, &FileOptions::default()).unwrap();
        let record = read_record(&path, &FileOptions::default()).unwrap();
        assert_eq!(record.shape(), shape.as_slice(), "{name}");
        assert_eq!(record.elements(), elements.as_slice(), "{name}");
        assert_eq!(record.time(), 2.5, "{name}");
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_record(dir.path().join("absent.svbin"), &FileOptions::default()).unwrap_err();
    assert!(matches!(err, SvbinError::Io(_)));
}

#[test]
fn write_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init.svbin");
    std::fs::write(&path, vec![0xffu8; 4096]).unwrap();
    write_record(&path, &[1], &[Complex::new(1.0, 0.0)], 0.0, &FileOptions::default()).unwrap();
    assert_eq!(read_record(&path, &FileOptions::default()).unwrap().len(), 1);
}

#[tokio::test]
async fn local_backend_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let backend = LocalBackend::new(dir.path());
    let (shape, elements) = state();

    save_record(&backend, "run/t0.svbin.gz", &shape, &elements, 0.0, &FileOptions::default())
        .await
        .unwrap();
    let record = load_record(&backend, "run/t0.svbin.gz", &FileOptions::default())
        .await
        .unwrap();
    assert_eq!(record.elements(), elements.as_slice());
    assert_eq!(backend.list("run").await.unwrap(), vec!["t0.svbin.gz".to_string()]);
}

#[tokio::test]
async fn missing_key_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let backend = LocalBackend::new(dir.path());
    let err = load_record(&backend, "nope.svbin", &FileOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SvbinError::NotFound(p) if p == "nope.svbin"));
}

#[tokio::test]
async fn object_store_backend_roundtrip() {
    let backend = ObjectStoreBackend::new(Box::new(InMemory::new()), "states");
    let options = FileOptions {
        compression: Some(AnyCodec::with_defaults(CodecId::Zstd)),
        ..FileOptions::default()
    };
    let elements = vec![Complex::new(0.0, 1.0); 8];

    save_record(&backend, "coherent.svbin", &[2, 2, 2], &elements, 1.0, &options)
        .await
        .unwrap();
    let raw = backend.get("coherent.svbin").await.unwrap().unwrap();
    assert_eq!(&raw[..4], &[0x28, 0xb5, 0x2f, 0xfd]);

    let record = load_record(&backend, "coherent.svbin", &options).await.unwrap();
    assert_eq!(record.shape(), &[2, 2, 2]);
    assert_eq!(record.time(), 1.0);
    assert!(backend.get("other.svbin").await.unwrap().is_none());
}

#[tokio::test]
async fn backend_is_shareable_across_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn StorageBackend> = Arc::new(LocalBackend::new(dir.path()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let backend = backend.clone();
            tokio::spawn(async move {
                let path = backend.join("traj", &format!("{i}.svbin"));
                let elements = vec![Complex::new(i as f64, 0.0); 3];
                save_record(&*backend, &path, &[3], &elements, i as f64, &FileOptions::default())
                    .await?;
                load_record(&*backend, &path, &FileOptions::default()).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let record = handle.await.unwrap().unwrap();
        assert_eq!(record.time(), i as f64);
    }
}
