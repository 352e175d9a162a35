//! Process-wide provider selection and parallelism settings
//!
//! Dense matrix operations look up the active [`LinearAlgebraProvider`] and
//! the parallel chunking parameters here. The first access initialises the
//! settings from the environment (see [`ControlConfig::from_env`]); callers
//! can replace them at any time with [`configure`] or [`set_provider`].

use crate::provider::{ParallelProvider, ReferenceProvider};
use fmat_core::{LinearAlgebraProvider, PARALLEL_CHUNK_SIZE};
use parking_lot::RwLock;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::{Arc, OnceLock};

/// Built-in provider choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProviderKind {
    /// [`ReferenceProvider`]
    Reference,
    /// [`ParallelProvider`]
    #[default]
    Parallel,
}

impl ProviderKind {
    /// Parse a provider name as accepted by `FMAT_PROVIDER`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "reference" | "managed" | "sequential" => Some(ProviderKind::Reference),
            "parallel" | "rayon" => Some(ProviderKind::Parallel),
            _ => None,
        }
    }

    fn instantiate(self) -> Arc<dyn LinearAlgebraProvider> {
        match self {
            ProviderKind::Reference => Arc::new(ReferenceProvider::new()),
            ProviderKind::Parallel => Arc::new(ParallelProvider::new()),
        }
    }
}

/// Configuration for provider selection and data-parallel execution
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlConfig {
    /// Elements per task when a scalar broadcast is split across threads
    pub parallel_chunk_size: usize,
    /// Upper bound on worker threads; 0 uses the global rayon pool, 1 runs
    /// everything on the calling thread
    pub max_degree_of_parallelism: usize,
    /// Provider installed by [`configure`]
    pub provider: ProviderKind,
}

impl ControlConfig {
    /// Set the chunk size used for parallel scalar broadcasts
    pub fn with_parallel_chunk_size(mut self, chunk_size: usize) -> Self {
        self.parallel_chunk_size = chunk_size.max(1);
        self
    }

    /// Set the maximum number of worker threads
    pub fn with_max_degree_of_parallelism(mut self, threads: usize) -> Self {
        self.max_degree_of_parallelism = threads;
        self
    }

    /// Select the built-in provider
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Whether every operation must run on the calling thread
    pub fn is_sequential(&self) -> bool {
        self.max_degree_of_parallelism == 1
    }

    /// Defaults overridden by `FMAT_PROVIDER`, `FMAT_CHUNK_SIZE` and
    /// `FMAT_MAX_PARALLELISM` when they are set and parse
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup("FMAT_PROVIDER") {
            match ProviderKind::parse(&value) {
                Some(kind) => config.provider = kind,
                None => log::warn!("ignoring unknown FMAT_PROVIDER value {value:?}"),
            }
        }
        if let Some(value) = lookup("FMAT_CHUNK_SIZE") {
            match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => config.parallel_chunk_size = size,
                _ => log::warn!("ignoring invalid FMAT_CHUNK_SIZE value {value:?}"),
            }
        }
        if let Some(value) = lookup("FMAT_MAX_PARALLELISM") {
            match value.trim().parse::<usize>() {
                Ok(threads) => config.max_degree_of_parallelism = threads,
                Err(_) => log::warn!("ignoring invalid FMAT_MAX_PARALLELISM value {value:?}"),
            }
        }

        config
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            parallel_chunk_size: PARALLEL_CHUNK_SIZE,
            max_degree_of_parallelism: 0,
            provider: ProviderKind::default(),
        }
    }
}

struct Control {
    config: ControlConfig,
    provider: Arc<dyn LinearAlgebraProvider>,
    pool: Option<Arc<ThreadPool>>,
}

impl Control {
    fn new(mut config: ControlConfig) -> Self {
        // Chunks must hold at least one element
        config.parallel_chunk_size = config.parallel_chunk_size.max(1);
        let pool = build_pool(config.max_degree_of_parallelism);
        Self {
            provider: config.provider.instantiate(),
            config,
            pool,
        }
    }
}

fn build_pool(threads: usize) -> Option<Arc<ThreadPool>> {
    if threads <= 1 {
        return None;
    }
    match ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(Arc::new(pool)),
        Err(err) => {
            log::warn!("falling back to the global rayon pool: {err}");
            None
        }
    }
}

static CONTROL: OnceLock<RwLock<Control>> = OnceLock::new();

fn control() -> &'static RwLock<Control> {
    CONTROL.get_or_init(|| RwLock::new(Control::new(ControlConfig::from_env())))
}

/// Replace the settings and install the provider they name
pub fn configure(config: ControlConfig) {
    log::info!(
        "configuring fmat: provider={:?} chunk_size={} max_parallelism={}",
        config.provider,
        config.parallel_chunk_size,
        config.max_degree_of_parallelism
    );
    *control().write() = Control::new(config);
}

/// Snapshot of the current settings
pub fn config() -> ControlConfig {
    control().read().config.clone()
}

/// The provider dense operations currently dispatch to
pub fn provider() -> Arc<dyn LinearAlgebraProvider> {
    control().read().provider.clone()
}

/// Install a custom provider, keeping the other settings
pub fn set_provider(provider: Arc<dyn LinearAlgebraProvider>) {
    log::info!("switching linear algebra provider to {}", provider.name());
    control().write().provider = provider;
}

/// Install the sequential [`ReferenceProvider`]
pub fn use_reference_provider() {
    set_provider(Arc::new(ReferenceProvider::new()));
}

/// Install the rayon-backed [`ParallelProvider`]
pub fn use_parallel_provider() {
    set_provider(Arc::new(ParallelProvider::new()));
}

pub(crate) fn parallel_chunk_size() -> usize {
    control().read().config.parallel_chunk_size
}

pub(crate) fn is_sequential() -> bool {
    control().read().config.is_sequential()
}

pub(crate) fn thread_pool() -> Option<Arc<ThreadPool>> {
    control().read().pool.clone()
}
