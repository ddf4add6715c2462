//! Shared fixtures for the rf-app integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use rf_app::AppDeps;
use rf_core::auth::AuthUser;
use rf_core::error::RawError;
use rf_core::ports::{AuthPort, ClockPort, SleeperPort};
use rf_infra::{
    InMemoryAuth, InMemoryErrorReporter, MemoryKeyValueStore, SampleCatalog, StaticConnectivity,
    TracingPlayer,
};

/// Clock the test moves by hand.
#[derive(Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        Self(AtomicI64::new(ms))
    }

    pub fn set(&self, ms: i64) {
        self.0.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays_ms(&self) -> Vec<u128> {
        self.delays
            .lock()
            .unwrap()
            .iter()
            .map(Duration::as_millis)
            .collect()
    }
}

#[async_trait]
impl SleeperPort for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Auth provider that fails the first `failures` calls with a network error.
pub struct FlakyAuth {
    inner: InMemoryAuth,
    failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FlakyAuth {
    pub fn new(inner: InMemoryAuth, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    fn trip(&self) -> Result<(), RawError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(RawError::with_code(
                "auth/network-request-failed",
                "Network request failed",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthPort for FlakyAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, RawError> {
        self.trip()?;
        self.inner.sign_in(email, password).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthUser, RawError> {
        self.trip()?;
        self.inner.sign_up(email, password, display_name).await
    }

    async fn sign_out(&self) -> Result<(), RawError> {
        self.trip()?;
        self.inner.sign_out().await
    }

    async fn current_user(&self) -> Option<AuthUser> {
        self.inner.current_user().await
    }
}

/// Route use-case spans to the test writer; `RUST_LOG` picks the level.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn network_error() -> RawError {
    RawError::with_code("NETWORK_REQUEST_FAILED", "Network request failed")
}

/// Concrete handles behind an `AppDeps`, kept for assertions.
pub struct Harness {
    pub auth: Arc<dyn AuthPort>,
    pub catalog: Arc<SampleCatalog>,
    pub player: Arc<TracingPlayer>,
    pub storage: Arc<MemoryKeyValueStore>,
    pub connectivity: Arc<StaticConnectivity>,
    pub reporter: Arc<InMemoryErrorReporter>,
    pub clock: Arc<ManualClock>,
    pub sleeper: Arc<RecordingSleeper>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_auth(Arc::new(InMemoryAuth::new()))
    }

    pub fn with_catalog(catalog: SampleCatalog) -> Self {
        let mut harness = Self::new();
        harness.catalog = Arc::new(catalog);
        harness
    }

    pub fn with_auth(auth: Arc<dyn AuthPort>) -> Self {
        init_test_tracing();
        Self {
            auth,
            catalog: Arc::new(SampleCatalog::with_sample_videos()),
            player: Arc::new(TracingPlayer::new()),
            storage: Arc::new(MemoryKeyValueStore::new()),
            connectivity: Arc::new(StaticConnectivity::online()),
            reporter: Arc::new(InMemoryErrorReporter::new()),
            clock: Arc::new(ManualClock::at(1_000)),
            sleeper: Arc::new(RecordingSleeper::default()),
        }
    }

    pub fn deps(&self) -> AppDeps {
        AppDeps {
            auth: self.auth.clone(),
            engagement: self.catalog.clone(),
            catalog: self.catalog.clone(),
            player: self.player.clone(),
            storage: self.storage.clone(),
            connectivity: self.connectivity.clone(),
            reporter: self.reporter.clone(),
            clock: self.clock.clone(),
            sleeper: self.sleeper.clone(),
        }
    }
}
