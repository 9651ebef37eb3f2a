//! Scheduled actors.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use bookstore_core::{CustomerId, EmployeeId, Isbn, Money};
use bookstore_events::{InMemoryMessageBus, MessageBus, PurchaseRequested, topics};
use bookstore_inventory::InventoryLedger;
use bookstore_knowledge::KnowledgeStore;
use bookstore_policy::DecisionPolicy;
use bookstore_purchasing::RestockCoordinator;

use crate::config::{BudgetMode, SimulationSettings};

/// Everything an actor may touch while it is activated.
pub struct TickContext<'a, S: KnowledgeStore + ?Sized> {
    pub tick: u64,
    pub rng: &'a mut ChaCha8Rng,
    pub settings: &'a SimulationSettings,
    pub policy: &'a dyn DecisionPolicy,
    pub ledger: &'a mut InventoryLedger,
    pub store: &'a mut S,
    pub bus: &'a mut InMemoryMessageBus,
    pub restocks: &'a mut RestockCoordinator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerActor {
    pub id: CustomerId,
    /// Remaining budget in depleting mode; the per-visit cap otherwise.
    pub budget: Money,
}

impl CustomerActor {
    pub fn new(id: CustomerId, budget: Money) -> Self {
        Self { id, budget }
    }

    /// Maybe enter the store, pick a book and publish a purchase request.
    ///
    /// Publishing does not buy anything: stock changes only when the
    /// purchase processor drains the request later in the tick.
    pub fn step<S>(&mut self, ctx: &mut TickContext<'_, S>)
    where
        S: KnowledgeStore + ?Sized,
    {
        if !ctx.rng.gen_bool(ctx.settings.customer_spawn_chance) {
            return;
        }
        let Some((isbn, price)) = ctx.policy.choose_purchase(ctx.ledger.snapshot(), self.budget, &mut *ctx.rng)
        else {
            return;
        };
        if self.budget < price {
            return;
        }
        if ctx.settings.budget_mode == BudgetMode::Depleting {
            self.budget = self.budget.saturating_sub(price);
        }
        trace!(tick = ctx.tick, customer = %self.id, %isbn, "purchase requested");
        let request = PurchaseRequested {
            customer_id: self.id.clone(),
            book_id: isbn,
            price,
        };
        ctx.bus.publish(topics::PURCHASES, request.into_payload());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeActor {
    pub id: EmployeeId,
}

impl EmployeeActor {
    pub fn new(id: EmployeeId) -> Self {
        Self { id }
    }

    /// Fulfil every restock request currently queued.
    pub fn step<S>(&mut self, ctx: &mut TickContext<'_, S>)
    where
        S: KnowledgeStore + ?Sized,
    {
        ctx.restocks
            .fulfil_pending(ctx.tick, &self.id, &mut *ctx.bus, &mut *ctx.ledger, &mut *ctx.store);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    /// Passive; scheduled so activation order matches the full population.
    Book(Isbn),
    Customer(CustomerActor),
    Employee(EmployeeActor),
}

impl Actor {
    pub fn id(&self) -> String {
        match self {
            Actor::Book(isbn) => format!("book::{isbn}"),
            Actor::Customer(c) => c.id.to_string(),
            Actor::Employee(e) => e.id.to_string(),
        }
    }

    pub fn step<S>(&mut self, ctx: &mut TickContext<'_, S>)
    where
        S: KnowledgeStore + ?Sized,
    {
        match self {
            Actor::Book(_) => {}
            Actor::Customer(customer) => customer.step(ctx),
            Actor::Employee(employee) => employee.step(ctx),
        }
    }
}
