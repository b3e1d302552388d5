//! Ordered fallback chain shared by all field rules.
//!
//! Every field is resolved the same way: try a list of strategies from most
//! to least trustworthy and stop at the first one that yields a value.

use tracing::{debug, trace};

use super::ExtractionMatch;
use crate::extract::text::Document;
use crate::models::vehicle::Field;

type Rung<'a, T> = Box<dyn Fn(&Document<'_>) -> Option<T> + 'a>;

/// A named list of extraction strategies for one field.
pub struct FallbackChain<'a, T> {
    field: Field,
    rungs: Vec<(&'static str, f32, Rung<'a, T>)>,
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            rungs: Vec::new(),
        }
    }

    /// Append a strategy with the confidence assigned to its matches.
    pub fn then(
        mut self,
        strategy: &'static str,
        confidence: f32,
        rung: impl Fn(&Document<'_>) -> Option<T> + 'a,
    ) -> Self {
        self.rungs.push((strategy, confidence, Box::new(rung)));
        self
    }

    /// Append a strategy only when `enabled`.
    pub fn then_if(
        self,
        enabled: bool,
        strategy: &'static str,
        confidence: f32,
        rung: impl Fn(&Document<'_>) -> Option<T> + 'a,
    ) -> Self {
        if enabled {
            self.then(strategy, confidence, rung)
        } else {
            self
        }
    }

    /// Strategy names in the order they are tried.
    pub fn strategies(&self) -> Vec<&'static str> {
        self.rungs.iter().map(|(name, _, _)| *name).collect()
    }

    /// Run strategies in order, returning the first hit.
    pub fn run(&self, doc: &Document<'_>) -> Option<ExtractionMatch<T>> {
        for (strategy, confidence, rung) in &self.rungs {
            if let Some(value) = rung(doc) {
                debug!("{} resolved by {}", self.field, strategy);
                return Some(ExtractionMatch::new(value, *confidence, *strategy));
            }
            trace!("{}: {} found nothing", self.field, strategy);
        }
        None
    }
}
