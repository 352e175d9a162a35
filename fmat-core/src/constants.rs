//! Tuning constants shared by providers and dense operations

/// Elements per work item when a scalar broadcast is split across threads
pub const PARALLEL_CHUNK_SIZE: usize = 4096;

/// Below this many elements a kernel always runs on the calling thread
pub const SEQUENTIAL_THRESHOLD: usize = 4096;

/// Columns of the result handled by one parallel matrix multiply task
pub const MULTIPLY_COLUMN_BLOCK: usize = 16;

/// Sweep limit for the Jacobi SVD and eigenvalue iterations
pub const MAX_JACOBI_SWEEPS: usize = 100;
