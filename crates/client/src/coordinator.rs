//! The optimistic mutation coordinator.
//!
//! Owns the client-side board snapshot and drives each drag-drop through the
//! lifecycle: plan, snapshot, optimistic apply, persist, then reconcile on
//! success or roll back on failure. State lives behind a mutex that is only
//! held across synchronous sections -- the transport await is the single
//! suspension point, during which the board stays readable and further drags
//! may start.

use std::sync::Mutex;
use std::time::Duration;

use helpdesk_core::board::Board;
use helpdesk_core::reorder::plan_reorder;
use helpdesk_core::ticket::TicketStatus;
use helpdesk_core::types::TicketId;

use crate::error::ClientError;
use crate::transport::BoardTransport;

/// Default client-side timeout for the persistence request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How a completed drop settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The card was dropped where it already was (or vanished locally);
    /// no request was issued.
    Noop,
    /// Persisted and reconciled against the server board.
    Persisted,
    /// Persisted, but the reconciliation fetch failed; the optimistic board
    /// is kept until the next successful read.
    PersistedStale,
}

struct BoardState {
    board: Board,
    /// Bumped on every optimistic apply. A settling request only writes
    /// back (rollback or reconcile) while the generation still matches its
    /// own apply -- a newer drag supersedes the older settlement.
    generation: u64,
    closed: bool,
}

/// Coordinates optimistic reorders for one board instance.
pub struct BoardCoordinator<T: BoardTransport> {
    transport: T,
    state: Mutex<BoardState>,
    request_timeout: Duration,
}

impl<T: BoardTransport> BoardCoordinator<T> {
    pub fn new(transport: T, board: Board) -> Self {
        Self {
            transport,
            state: Mutex::new(BoardState {
                board,
                generation: 0,
                closed: false,
            }),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// The current board snapshot (optimistic state included).
    pub fn board(&self) -> Board {
        self.lock().board.clone()
    }

    /// Replace the board with the authoritative server state.
    pub async fn load(&self) -> Result<(), ClientError> {
        let board = self.transport.fetch_board().await?;
        let mut state = self.lock();
        if !state.closed {
            state.board = board;
            state.generation += 1;
        }
        Ok(())
    }

    /// Tear down: in-flight settlements are ignored from here on.
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// Handle one drag-drop release.
    ///
    /// Applies the planned move to the local board immediately, then
    /// persists it. On success the board is replaced by a reconciliation
    /// fetch; on failure it is restored to this drop's pre-mutation
    /// snapshot, unless a newer drop has been applied since or the
    /// coordinator was closed.
    pub async fn handle_drop(
        &self,
        ticket_id: TicketId,
        target_status: TicketStatus,
        target_index: usize,
    ) -> Result<ReorderOutcome, ClientError> {
        let (plan, snapshot, generation) = {
            let mut state = self.lock();
            if state.closed {
                return Ok(ReorderOutcome::Noop);
            }
            let Some(plan) = plan_reorder(&state.board, ticket_id, target_status, target_index)
            else {
                return Ok(ReorderOutcome::Noop);
            };
            if plan.is_noop() {
                return Ok(ReorderOutcome::Noop);
            }

            let snapshot = state.board.clone();
            state.board = plan.apply_to(&state.board);
            state.generation += 1;
            (plan, snapshot, state.generation)
        };

        let persisted = tokio::time::timeout(
            self.request_timeout,
            self.transport.persist_reorder(&plan.request()),
        )
        .await;

        match persisted {
            Ok(Ok(())) => self.reconcile(generation).await,
            Ok(Err(err)) => {
                self.rollback(snapshot, generation);
                Err(err.into())
            }
            Err(_elapsed) => {
                self.rollback(snapshot, generation);
                Err(ClientError::Timeout)
            }
        }
    }

    /// Re-fetch the authoritative board after a successful persist.
    ///
    /// A failed fetch is tolerated: the optimistic board is already correct
    /// modulo other users' concurrent edits, and the next read converges.
    async fn reconcile(&self, generation: u64) -> Result<ReorderOutcome, ClientError> {
        if self.lock().closed {
            return Ok(ReorderOutcome::Persisted);
        }

        match tokio::time::timeout(self.request_timeout, self.transport.fetch_board()).await {
            Ok(Ok(server_board)) => {
                let mut state = self.lock();
                if !state.closed && state.generation == generation {
                    state.board = server_board;
                }
                Ok(ReorderOutcome::Persisted)
            }
            Ok(Err(error)) => {
                tracing::warn!(%error, "Reconciliation fetch failed; keeping optimistic board");
                Ok(ReorderOutcome::PersistedStale)
            }
            Err(_elapsed) => {
                tracing::warn!("Reconciliation fetch timed out; keeping optimistic board");
                Ok(ReorderOutcome::PersistedStale)
            }
        }
    }

    fn rollback(&self, snapshot: Board, generation: u64) {
        let mut state = self.lock();
        if state.closed || state.generation != generation {
            return;
        }
        state.board = snapshot;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.state.lock().expect("board state lock poisoned")
    }
}
