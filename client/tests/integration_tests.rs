//! Integration tests exercising the full client pipeline:
//! session initialization → vote submission → event delivery → debounced
//! refresh → published view snapshots.
//!
//! All timing-sensitive tests run under tokio's paused clock, so the
//! debounce window elapses only when the test advances time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, Notify};

use tally_client::{
    BackendError, ClientError, ClientSession, FixedIdentity, LedgerBackend, LocalBackend,
    SyncConfig, SyncEngine, VoteController,
};
use tally_ledger::{ElectionConfig, ElectionLedger};
use tally_store::MemoryStore;
use tally_types::{Candidate, CandidateId, VoteEvent, VoterAddress, VoterRecord};

const WINDOW: Duration = Duration::from_millis(300);

fn addr(n: u8) -> VoterAddress {
    VoterAddress::new(format!("0x{:040x}", n))
}

fn three_candidate_ledger() -> Arc<ElectionLedger<MemoryStore>> {
    Arc::new(
        ElectionLedger::open(&ElectionConfig::new([
            "Candidate 1",
            "Candidate 2",
            "Candidate 3",
        ]))
        .unwrap(),
    )
}

async fn session_for(backend: Arc<dyn LedgerBackend>, voter: VoterAddress) -> ClientSession {
    ClientSession::initialize(&FixedIdentity::new(voter), backend)
        .await
        .unwrap()
}

/// Advance past the debounce window and let pending tasks run to
/// completion.
async fn settle() {
    // Let freshly-spawned debounce timers get polled so their sleeps are
    // armed before we advance the clock past them.
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    tokio::time::advance(WINDOW + Duration::from_millis(10)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Test backends wrapping the in-process ledger
// ---------------------------------------------------------------------------

/// Counts refresh read traffic (one `candidate_count` call per refresh).
struct CountingBackend {
    inner: LocalBackend<MemoryStore>,
    count_reads: AtomicUsize,
}

impl CountingBackend {
    fn new(ledger: Arc<ElectionLedger<MemoryStore>>) -> Self {
        Self {
            inner: LocalBackend::new(ledger),
            count_reads: AtomicUsize::new(0),
        }
    }

    fn refreshes(&self) -> usize {
        self.count_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerBackend for CountingBackend {
    async fn candidate_count(&self) -> Result<u32, BackendError> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.candidate_count().await
    }

    async fn candidate(&self, id: CandidateId) -> Result<Candidate, BackendError> {
        self.inner.candidate(id).await
    }

    async fn voter_record(&self, address: &VoterAddress) -> Result<VoterRecord, BackendError> {
        self.inner.voter_record(address).await
    }

    async fn submit_vote(
        &self,
        candidate_id: CandidateId,
        address: &VoterAddress,
    ) -> Result<(), BackendError> {
        self.inner.submit_vote(candidate_id, address).await
    }

    fn subscribe_votes(&self) -> broadcast::Receiver<VoteEvent> {
        self.inner.subscribe_votes()
    }
}

/// Fails every read while `failing` is set; submissions pass through.
struct FlakyBackend {
    inner: LocalBackend<MemoryStore>,
    failing: std::sync::atomic::AtomicBool,
}

impl FlakyBackend {
    fn new(ledger: Arc<ElectionLedger<MemoryStore>>) -> Self {
        Self {
            inner: LocalBackend::new(ledger),
            failing: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(BackendError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LedgerBackend for FlakyBackend {
    async fn candidate_count(&self) -> Result<u32, BackendError> {
        self.check()?;
        self.inner.candidate_count().await
    }

    async fn candidate(&self, id: CandidateId) -> Result<Candidate, BackendError> {
        self.check()?;
        self.inner.candidate(id).await
    }

    async fn voter_record(&self, address: &VoterAddress) -> Result<VoterRecord, BackendError> {
        self.check()?;
        self.inner.voter_record(address).await
    }

    async fn submit_vote(
        &self,
        candidate_id: CandidateId,
        address: &VoterAddress,
    ) -> Result<(), BackendError> {
        self.inner.submit_vote(candidate_id, address).await
    }

    fn subscribe_votes(&self) -> broadcast::Receiver<VoteEvent> {
        self.inner.subscribe_votes()
    }
}

/// Holds every submission until the test releases the gate.
struct GatedBackend {
    inner: LocalBackend<MemoryStore>,
    gate: Notify,
}

impl GatedBackend {
    fn new(ledger: Arc<ElectionLedger<MemoryStore>>) -> Self {
        Self {
            inner: LocalBackend::new(ledger),
            gate: Notify::new(),
        }
    }

    fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl LedgerBackend for GatedBackend {
    async fn candidate_count(&self) -> Result<u32, BackendError> {
        self.inner.candidate_count().await
    }

    async fn candidate(&self, id: CandidateId) -> Result<Candidate, BackendError> {
        self.inner.candidate(id).await
    }

    async fn voter_record(&self, address: &VoterAddress) -> Result<VoterRecord, BackendError> {
        self.inner.voter_record(address).await
    }

    async fn submit_vote(
        &self,
        candidate_id: CandidateId,
        address: &VoterAddress,
    ) -> Result<(), BackendError> {
        self.gate.notified().await;
        self.inner.submit_vote(candidate_id, address).await
    }

    fn subscribe_votes(&self) -> broadcast::Receiver<VoteEvent> {
        self.inner.subscribe_votes()
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn scenario_a_first_vote_is_accepted() {
    let ledger = three_candidate_ledger();
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(Arc::clone(&ledger)));
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session.clone(), SyncConfig::default());
    let controller = VoteController::new(session, Arc::clone(&engine));

    controller.submit_vote(CandidateId::new(2)).await.unwrap();
    settle().await;

    let view = engine.view().expect("refresh published a view");
    assert_eq!(view.candidate(CandidateId::new(2)).unwrap().vote_count, 1);
    assert!(view.has_voted);
    assert!(ledger.voter_record(&addr(1)).unwrap().has_voted);
}

#[tokio::test(start_paused = true)]
async fn scenario_b_second_vote_is_rejected() {
    let ledger = three_candidate_ledger();
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(Arc::clone(&ledger)));
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session.clone(), SyncConfig::default());
    let controller = VoteController::new(session, Arc::clone(&engine));

    controller.submit_vote(CandidateId::new(2)).await.unwrap();
    settle().await;

    let err = controller.submit_vote(CandidateId::new(1)).await.unwrap_err();
    assert!(matches!(err, ClientError::AlreadyVoted));
    assert!(!controller.is_busy());

    let view = engine.refresh().await.unwrap();
    assert_eq!(view.candidate(CandidateId::new(1)).unwrap().vote_count, 0);
    assert_eq!(view.candidate(CandidateId::new(2)).unwrap().vote_count, 1);
}

#[tokio::test(start_paused = true)]
async fn scenario_c_unknown_candidate_is_rejected() {
    let ledger = three_candidate_ledger();
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(Arc::clone(&ledger)));
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session.clone(), SyncConfig::default());
    let controller = VoteController::new(session, Arc::clone(&engine));

    let err = controller.submit_vote(CandidateId::new(99)).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidCandidate(99)));
    assert!(!controller.is_busy());

    let view = engine.refresh().await.unwrap();
    assert_eq!(view.total_votes(), 0);
    assert!(!view.has_voted);
}

#[tokio::test(start_paused = true)]
async fn scenario_d_second_submission_while_in_flight_is_busy() {
    let ledger = three_candidate_ledger();
    let gated = Arc::new(GatedBackend::new(Arc::clone(&ledger)));
    let backend: Arc<dyn LedgerBackend> = Arc::clone(&gated) as Arc<dyn LedgerBackend>;
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session.clone(), SyncConfig::default());
    let controller = Arc::new(VoteController::new(session, Arc::clone(&engine)));
    let mut busy_rx = controller.subscribe_busy();

    let first = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.submit_vote(CandidateId::new(1)).await })
    };
    tokio::task::yield_now().await;

    // The first submission is parked on the backend; the busy flag is up.
    assert!(controller.is_busy());
    busy_rx.changed().await.unwrap();
    assert!(*busy_rx.borrow());

    let err = controller.submit_vote(CandidateId::new(2)).await.unwrap_err();
    assert!(matches!(err, ClientError::Busy));

    // Releasing the gate lets the first submission complete unaffected.
    gated.release();
    first.await.unwrap().unwrap();
    assert!(!controller.is_busy());

    settle().await;
    let view = engine.view().unwrap();
    assert_eq!(view.candidate(CandidateId::new(1)).unwrap().vote_count, 1);
    assert_eq!(view.candidate(CandidateId::new(2)).unwrap().vote_count, 0);
}

// ---------------------------------------------------------------------------
// Sync engine behavior
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn debounce_collapses_a_burst_into_one_refresh() {
    let counting = Arc::new(CountingBackend::new(three_candidate_ledger()));
    let backend: Arc<dyn LedgerBackend> = Arc::clone(&counting) as Arc<dyn LedgerBackend>;
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session, SyncConfig::default());

    for _ in 0..5 {
        engine.schedule_refresh();
    }
    settle().await;

    assert_eq!(counting.refreshes(), 1);
    assert!(engine.view().is_some());
}

#[tokio::test(start_paused = true)]
async fn debounce_window_restarts_on_every_call() {
    let counting = Arc::new(CountingBackend::new(three_candidate_ledger()));
    let backend: Arc<dyn LedgerBackend> = Arc::clone(&counting) as Arc<dyn LedgerBackend>;
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session, SyncConfig::default());

    engine.schedule_refresh();
    tokio::time::advance(Duration::from_millis(200)).await;
    engine.schedule_refresh();
    tokio::time::advance(Duration::from_millis(200)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    // 400 ms after the first call, but only 200 ms after the second: the
    // restarted window has not elapsed yet.
    assert_eq!(counting.refreshes(), 0);

    settle().await;
    assert_eq!(counting.refreshes(), 1);
}

#[tokio::test(start_paused = true)]
async fn refresh_is_idempotent_without_intervening_votes() {
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(three_candidate_ledger()));
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session, SyncConfig::default());

    let first = engine.refresh().await.unwrap();
    let second = engine.refresh().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_keeps_the_previous_view() {
    let flaky = Arc::new(FlakyBackend::new(three_candidate_ledger()));
    let backend: Arc<dyn LedgerBackend> = Arc::clone(&flaky) as Arc<dyn LedgerBackend>;
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session, SyncConfig::default());

    let good = engine.refresh().await.unwrap();

    flaky.set_failing(true);
    let err = engine.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Sync(_)));
    assert_eq!(engine.view().unwrap(), good);

    flaky.set_failing(false);
    engine.refresh().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn external_votes_flow_through_events_into_the_view() {
    let ledger = three_candidate_ledger();
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(Arc::clone(&ledger)));
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session, SyncConfig::default());
    let _watcher = engine.watch_events(ledger.subscribe_votes());

    // Two other voters cast votes directly against the ledger.
    ledger.try_cast_vote(CandidateId::new(3), &addr(2)).unwrap();
    ledger.try_cast_vote(CandidateId::new(3), &addr(3)).unwrap();
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    settle().await;

    let view = engine.view().expect("events triggered a refresh");
    assert_eq!(view.candidate(CandidateId::new(3)).unwrap().vote_count, 2);
    // This client's own voter still has their vote.
    assert!(!view.has_voted);
}

#[tokio::test(start_paused = true)]
async fn selection_survives_rebuilds_while_valid() {
    let ledger = three_candidate_ledger();
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(Arc::clone(&ledger)));
    let session = session_for(backend, addr(1)).await;
    let engine = SyncEngine::new(session, SyncConfig::default());

    engine.refresh().await.unwrap();
    engine.select(Some(CandidateId::new(2)));
    assert_eq!(engine.view().unwrap().selected, Some(CandidateId::new(2)));

    let view = engine.refresh().await.unwrap();
    assert_eq!(view.selected, Some(CandidateId::new(2)));

    engine.select(Some(CandidateId::new(99)));
    let view = engine.refresh().await.unwrap();
    assert_eq!(view.selected, None);
}

#[tokio::test]
async fn initialization_without_identity_fails() {
    let backend: Arc<dyn LedgerBackend> = Arc::new(LocalBackend::new(three_candidate_ledger()));
    let err = ClientSession::initialize(&FixedIdentity::unavailable(), backend)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoIdentity));
}
