use rand::{Rng, RngCore};

use bookstore_core::{Isbn, Money};
use bookstore_inventory::InventoryRow;

/// Strategy that picks which book a customer buys.
///
/// Returns `(isbn, unit_price)` or `None` when nothing is affordable and in
/// stock. Implementations must only draw randomness from `rng`.
pub trait DecisionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn choose_purchase(&self, inventory: &[InventoryRow], budget: Money, rng: &mut dyn RngCore) -> Option<(Isbn, Money)>;
}

impl<P> DecisionPolicy for Box<P>
where
    P: DecisionPolicy + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn choose_purchase(&self, inventory: &[InventoryRow], budget: Money, rng: &mut dyn RngCore) -> Option<(Isbn, Money)> {
        (**self).choose_purchase(inventory, budget, rng)
    }
}

fn affordable(inventory: &[InventoryRow], budget: Money) -> impl Iterator<Item = &InventoryRow> {
    inventory.iter().filter(move |row| row.in_stock() && row.unit_price <= budget)
}

fn decision(row: &InventoryRow) -> (Isbn, Money) {
    (row.isbn.clone(), row.unit_price)
}

/// Cheapest affordable in-stock book; ties go to the earliest row.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl DecisionPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose_purchase(&self, inventory: &[InventoryRow], budget: Money, _rng: &mut dyn RngCore) -> Option<(Isbn, Money)> {
        // `min_by_key` keeps the first of equal elements.
        affordable(inventory, budget).min_by_key(|row| row.unit_price).map(decision)
    }
}

/// Uniformly random affordable in-stock book.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl DecisionPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_purchase(&self, inventory: &[InventoryRow], budget: Money, rng: &mut dyn RngCore) -> Option<(Isbn, Money)> {
        let candidates: Vec<&InventoryRow> = affordable(inventory, budget).collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..candidates.len());
        Some(decision(candidates[pick]))
    }
}

/// Random pick among affordable books of one genre, falling back to greedy.
#[derive(Debug, Clone)]
pub struct GenrePreferencePolicy {
    genre: String,
}

impl GenrePreferencePolicy {
    pub fn new(genre: impl Into<String>) -> Self {
        Self { genre: genre.into() }
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }
}

impl DecisionPolicy for GenrePreferencePolicy {
    fn name(&self) -> &'static str {
        "genre_preference"
    }

    fn choose_purchase(&self, inventory: &[InventoryRow], budget: Money, rng: &mut dyn RngCore) -> Option<(Isbn, Money)> {
        let preferred: Vec<&InventoryRow> = affordable(inventory, budget)
            .filter(|row| row.genre.eq_ignore_ascii_case(&self.genre))
            .collect();
        if preferred.is_empty() {
            return GreedyPolicy.choose_purchase(inventory, budget, rng);
        }
        let pick = rng.gen_range(0..preferred.len());
        Some(decision(preferred[pick]))
    }
}

/// Affordable book with the most copies on the shelf; ties go to the earliest row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostStockedPolicy;

impl DecisionPolicy for MostStockedPolicy {
    fn name(&self) -> &'static str {
        "most_stocked"
    }

    fn choose_purchase(&self, inventory: &[InventoryRow], budget: Money, _rng: &mut dyn RngCore) -> Option<(Isbn, Money)> {
        affordable(inventory, budget)
            .fold(None::<&InventoryRow>, |best, row| match best {
                Some(b) if b.quantity >= row.quantity => Some(b),
                _ => Some(row),
            })
            .map(decision)
    }
}
