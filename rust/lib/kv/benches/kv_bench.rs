use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use quesera_kv::{KVStore, MemoryStore, OverlayKV, RedbStore};

/// A serialized collection of roughly the size a busy season produces.
fn collection_bytes() -> Vec<u8> {
    let mut out = String::from("[");
    for i in 0..200 {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "{{\"id\":\"b{:04}\",\"productName\":\"Queso Fresco\",\"weight\":1250.0,\"milkLiters\":12000.0}}",
            i
        ));
    }
    out.push(']');
    out.into_bytes()
}

fn bench_redb_slot_overwrite(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    let value = collection_bytes();

    c.bench_function("redb_slot_overwrite", |b| {
        b.iter(|| store.set(black_box("quesera:batches"), black_box(&value)).unwrap());
    });
}

fn bench_redb_slot_read(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    store.set("quesera:batches", &collection_bytes()).unwrap();

    c.bench_function("redb_slot_read", |b| {
        b.iter(|| store.get(black_box("quesera:batches")).unwrap());
    });
}

fn bench_memory_slot_overwrite(c: &mut Criterion) {
    let store = MemoryStore::new();
    let value = collection_bytes();

    c.bench_function("memory_slot_overwrite", |b| {
        b.iter(|| store.set(black_box("quesera:batches"), black_box(&value)).unwrap());
    });
}

fn bench_overlay_seed_scan(c: &mut Criterion) {
    let overlay = OverlayKV::new(MemoryStore::new());
    for i in 0..100 {
        overlay.insert_seed(format!("seed:batch:demo-{:03}", i), b"{}".to_vec());
    }

    c.bench_function("overlay_seed_scan_100", |b| {
        b.iter(|| {
            let results = overlay.scan(black_box("seed:batch:")).unwrap();
            assert_eq!(results.len(), 100);
        });
    });
}

criterion_group!(
    benches,
    bench_redb_slot_overwrite,
    bench_redb_slot_read,
    bench_memory_slot_overwrite,
    bench_overlay_seed_scan,
);
criterion_main!(benches);
