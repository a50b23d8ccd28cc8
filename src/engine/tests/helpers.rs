use crate::config::EngineConfig;
use crate::engine::Engine;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Initialize a `tracing` subscriber controlled by `RUST_LOG`. Safe to
/// call multiple times — only the first call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Open an engine in a fresh temp directory with the default watermark.
/// Returns the `TempDir` too, so the caller keeps it alive for the test's
/// duration (it deletes the directory on drop).
pub fn open_default() -> (TempDir, Engine) {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = EngineConfig {
        root_dir: dir.path().to_path_buf(),
        ..EngineConfig::default()
    };
    let engine = Engine::open(config).unwrap();
    (dir, engine)
}

/// Open an engine with a small MemTable watermark, so a handful of writes
/// are enough to trigger a flush.
pub fn open_with_watermark(watermark: usize) -> (TempDir, Engine) {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = EngineConfig {
        root_dir: dir.path().to_path_buf(),
        mem_table_max_bytes: watermark,
        ..EngineConfig::default()
    };
    let engine = Engine::open(config).unwrap();
    (dir, engine)
}

/// Re-open an engine against an existing root directory, simulating a
/// restart after a clean shutdown or a crash.
pub fn reopen(dir: &TempDir) -> Engine {
    let config = EngineConfig {
        root_dir: dir.path().to_path_buf(),
        ..EngineConfig::default()
    };
    Engine::open(config).unwrap()
}

pub fn reopen_with_watermark(dir: &TempDir, watermark: usize) -> Engine {
    let config = EngineConfig {
        root_dir: dir.path().to_path_buf(),
        mem_table_max_bytes: watermark,
        ..EngineConfig::default()
    };
    Engine::open(config).unwrap()
}

/// List the `.db` SSTable file names (not full paths) in `dir`, sorted.
pub fn sstable_file_names(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.ends_with(".db"))
        .collect();
    names.sort();
    names
}
