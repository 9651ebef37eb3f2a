use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bookstore_core::{EmployeeId, Isbn};
use bookstore_events::{MessageBus, RestockRequested, topics};
use bookstore_inventory::InventoryLedger;
use bookstore_knowledge::{EntityKind, KnowledgeStore, vocab};

/// One fulfilled restock. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockRecord {
    pub tick: u64,
    pub isbn: Isbn,
    pub amount: u32,
    pub employee_id: Option<EmployeeId>,
}

/// Where restock need comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonerMode {
    /// Inferred `NeedsRestock` facts.
    Inference,
    /// Procedural `quantity < low_threshold`; permanent once entered.
    Heuristic,
}

/// Result of one synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Whether the reasoner ran successfully during this pass.
    pub inferred: bool,
    /// Restock requests published.
    pub published: usize,
}

#[derive(Debug)]
pub struct RestockCoordinator {
    interval: u64,
    restock_amount: i64,
    mode: ReasonerMode,
    warnings: usize,
    log: Vec<RestockRecord>,
}

impl RestockCoordinator {
    /// `interval` is clamped to at least 1.
    pub fn new(interval: u64, restock_amount: i64) -> Self {
        Self {
            interval: interval.max(1),
            restock_amount,
            mode: ReasonerMode::Inference,
            warnings: 0,
            log: Vec::new(),
        }
    }

    pub fn set_interval(&mut self, interval: u64) {
        self.interval = interval.max(1);
    }

    pub fn mode(&self) -> ReasonerMode {
        self.mode
    }

    pub fn reasoner_active(&self) -> bool {
        self.mode == ReasonerMode::Inference
    }

    pub fn log(&self) -> &[RestockRecord] {
        &self.log
    }

    pub fn is_due(&self, tick: u64) -> bool {
        tick % self.interval == 0
    }

    /// Evaluate restock need and publish requests for rows without one in flight.
    ///
    /// Inference runs only when `force` is set or `tick` falls on the sync
    /// interval. A failing reasoner switches the coordinator to heuristic
    /// mode for good; the pass still completes.
    pub fn synchronize<B, S>(
        &mut self,
        tick: u64,
        force: bool,
        ledger: &mut InventoryLedger,
        store: &mut S,
        bus: &mut B,
    ) -> SyncOutcome
    where
        B: MessageBus + ?Sized,
        S: KnowledgeStore + ?Sized,
    {
        if !force && !self.is_due(tick) {
            let fallback = !self.reasoner_active();
            return SyncOutcome {
                inferred: false,
                published: self.enqueue(fallback, ledger, bus),
            };
        }

        if !self.reasoner_active() {
            self.warn_once("reasoner unavailable; using procedural restock detection");
            return SyncOutcome {
                inferred: false,
                published: self.enqueue(true, ledger, bus),
            };
        }

        match store.run_inference() {
            Ok(report) => {
                let reconciled = ledger.reconcile(store);
                debug!(tick, rounds = report.rounds, derived = report.derived, reconciled, "inference complete");
                SyncOutcome {
                    inferred: true,
                    published: self.enqueue(false, ledger, bus),
                }
            }
            Err(err) => {
                self.mode = ReasonerMode::Heuristic;
                self.warn_once(&format!("reasoner failed, falling back to procedural restock detection: {err}"));
                SyncOutcome {
                    inferred: false,
                    published: self.enqueue(true, ledger, bus),
                }
            }
        }
    }

    fn warn_once(&mut self, message: &str) {
        if self.warnings == 0 {
            warn!("{message}");
            self.warnings += 1;
        }
    }

    #[cfg(test)]
    pub(crate) fn warnings(&self) -> usize {
        self.warnings
    }

    fn enqueue<B>(&self, fallback: bool, ledger: &mut InventoryLedger, bus: &mut B) -> usize
    where
        B: MessageBus + ?Sized,
    {
        let due: Vec<Isbn> = ledger
            .snapshot()
            .iter()
            .filter(|row| if fallback { row.below_threshold() } else { row.needs_restock })
            .filter(|row| !ledger.is_pending(&row.isbn))
            .map(|row| row.isbn.clone())
            .collect();

        for isbn in &due {
            let request = RestockRequested {
                book_id: isbn.clone(),
                amount: Some(self.restock_amount),
            };
            bus.publish(topics::RESTOCK, request.into_payload());
            ledger.mark_pending(isbn);
        }
        due.len()
    }

    /// Drain the restock topic on behalf of `employee`.
    ///
    /// Requests without a book id, or naming an unknown book, are dropped.
    /// Returns the number of restocks performed.
    pub fn fulfil_pending<B, S>(
        &mut self,
        tick: u64,
        employee: &EmployeeId,
        bus: &mut B,
        ledger: &mut InventoryLedger,
        store: &mut S,
    ) -> usize
    where
        B: MessageBus + ?Sized,
        S: KnowledgeStore + ?Sized,
    {
        let mut fulfilled = 0;
        while let Some(message) = bus.poll(topics::RESTOCK) {
            let Some(request) = RestockRequested::from_payload(&message.payload) else {
                debug!(tick, "discarding restock request without book id");
                continue;
            };
            let amount = request.amount.unwrap_or(self.restock_amount);
            if self.restock(tick, &request.book_id, amount, Some(employee), ledger, store) {
                fulfilled += 1;
            }
        }
        fulfilled
    }

    /// Add stock for `isbn`, attribute it to `employee` and log it.
    pub fn restock<S>(
        &mut self,
        tick: u64,
        isbn: &Isbn,
        amount: i64,
        employee: Option<&EmployeeId>,
        ledger: &mut InventoryLedger,
        store: &mut S,
    ) -> bool
    where
        S: KnowledgeStore + ?Sized,
    {
        if !ledger.apply_restock(isbn, amount, store) {
            debug!(tick, %isbn, "restock for unknown book ignored");
            return false;
        }

        if let Some(employee) = employee {
            let staff = store.resolve_or_create(EntityKind::Employee, &employee.entity_name());
            let item = ledger.inventory_entity(isbn, store);
            store.assert_relation(&staff, vocab::WORKS_AT, &item);
        }

        self.log.push(RestockRecord {
            tick,
            isbn: isbn.clone(),
            amount: u32::try_from(amount.max(0)).unwrap_or(u32::MAX),
            employee_id: employee.cloned(),
        });
        true
    }
}
