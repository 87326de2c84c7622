//! Name-to-handler lookup.

use crate::error::{AssertionError, AssertionResult};
use crate::handler::AssertionHandler;
use crate::handlers::{
    DoesNotResolve, Needed, Resolves, ResolvesWith, ResolvesWithType, SearchByName,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Registered assertion handlers, looked up case-insensitively.
#[derive(Clone)]
pub struct AssertionRegistry {
    handlers: Vec<Arc<dyn AssertionHandler>>,
    by_name: HashMap<String, usize>,
}

impl AssertionRegistry {
    /// Registry holding every built-in handler.
    pub fn builtin() -> Self {
        let handlers: Vec<Arc<dyn AssertionHandler>> = vec![
            Arc::new(Resolves),
            Arc::new(DoesNotResolve),
            Arc::new(ResolvesWith),
            Arc::new(ResolvesWithType),
            Arc::new(SearchByName),
            Arc::new(Needed),
        ];
        let by_name = handlers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.name().to_lowercase(), i))
            .collect();
        Self { handlers, by_name }
    }

    /// Registry over custom handlers. Names must be unique ignoring case.
    pub fn from_handlers(handlers: Vec<Arc<dyn AssertionHandler>>) -> AssertionResult<Self> {
        let mut by_name = HashMap::with_capacity(handlers.len());
        for (index, handler) in handlers.iter().enumerate() {
            let name = handler.name().to_lowercase();
            if by_name.insert(name.clone(), index).is_some() {
                return Err(AssertionError::DuplicateAssertion(name));
            }
        }
        Ok(Self { handlers, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn AssertionHandler>> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.handlers[index])
    }

    /// Handlers in registration order.
    pub fn handlers(&self) -> &[Arc<dyn AssertionHandler>] {
        &self.handlers
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for AssertionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
