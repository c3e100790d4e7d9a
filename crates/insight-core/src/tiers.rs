//! Priority-tier resolution.
//!
//! A selector is an ordered list of tiers, each a `(predicate, order, render)`
//! triple tagged with a kind, followed by an unconditional fallback. The first
//! tier with at least one candidate wins; its best candidate under `order`
//! is rendered. When every tier is empty the fallback picks from the whole pool.
//!
//! Orders put the preferred entity first. Ties resolve to the earlier entity
//! in the pool, so results are reproducible for identical input.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::types::Insight;

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;
type Order<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;
type Render<'a, T> = Box<dyn Fn(&T) -> Insight + 'a>;

struct Tier<'a, T, K> {
    kind: K,
    predicate: Predicate<'a, T>,
    order: Order<'a, T>,
    render: Render<'a, T>,
}

struct Fallback<'a, T> {
    order: Order<'a, T>,
    render: Render<'a, T>,
}

/// Which rule produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierHit<K> {
    Tier(K),
    Fallback,
}

impl<K> TierHit<K> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TierHit::Fallback)
    }
}

/// The chosen entity plus its rendered insight.
#[derive(Debug, Clone)]
pub struct Resolved<'p, T, K> {
    pub hit: TierHit<K>,
    pub index: usize,
    pub entity: &'p T,
    pub insight: Insight,
}

/// Ordered decision list: first matching tier wins, else the fallback.
pub struct PriorityTiers<'a, T, K> {
    name: &'static str,
    tiers: Vec<Tier<'a, T, K>>,
    fallback: Option<Fallback<'a, T>>,
}

impl<'a, T, K> PriorityTiers<'a, T, K>
where
    K: Copy + PartialEq + Debug,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tiers: Vec::new(),
            fallback: None,
        }
    }

    /// Append a tier. Tiers are evaluated in insertion order.
    pub fn tier<P, O, R>(mut self, kind: K, predicate: P, order: O, render: R) -> Self
    where
        P: Fn(&T) -> bool + 'a,
        O: Fn(&T, &T) -> Ordering + 'a,
        R: Fn(&T) -> Insight + 'a,
    {
        self.tiers.push(Tier {
            kind,
            predicate: Box::new(predicate),
            order: Box::new(order),
            render: Box::new(render),
        });
        self
    }

    /// Set the unconditional fallback, applied to the whole pool.
    pub fn fallback<O, R>(mut self, order: O, render: R) -> Self
    where
        O: Fn(&T, &T) -> Ordering + 'a,
        R: Fn(&T) -> Insight + 'a,
    {
        self.fallback = Some(Fallback {
            order: Box::new(order),
            render: Box::new(render),
        });
        self
    }

    /// Walk the tiers in order and render the first hit.
    ///
    /// Returns `None` only for an empty pool, or a non-empty pool with no tier
    /// match and no fallback configured.
    pub fn resolve<'p>(&self, pool: &'p [T]) -> Option<Resolved<'p, T, K>> {
        for tier in &self.tiers {
            let best = pool
                .iter()
                .enumerate()
                .filter(|(_, e)| (tier.predicate)(*e))
                .min_by(|(_, a), (_, b)| (tier.order)(*a, *b));

            if let Some((index, entity)) = best {
                tracing::debug!(selector = self.name, tier = ?tier.kind, index, "priority tier matched");
                return Some(Resolved {
                    hit: TierHit::Tier(tier.kind),
                    index,
                    entity,
                    insight: (tier.render)(entity),
                });
            }
        }

        let fallback = self.fallback.as_ref()?;
        let (index, entity) = pool
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (fallback.order)(*a, *b))?;
        tracing::debug!(selector = self.name, index, "no tier matched, using fallback");
        Some(Resolved {
            hit: TierHit::Fallback,
            index,
            entity,
            insight: (fallback.render)(entity),
        })
    }
}
