//! Shared environment configuration for the binaries.

/// Read `YACHT_PORT` (default 9000).
pub fn server_port() -> u16 {
    std::env::var("YACHT_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9000)
}

/// Read `RAYON_NUM_THREADS` (default 8) and build the rayon global
/// thread pool, tolerating an already-initialized pool. Returns the
/// thread count.
pub fn init_rayon_threads_lenient() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok(); // May fail if already initialized
    num_threads
}
