use async_trait::async_trait;
use opsdeck_core::{
    Action, ActionCall, ActionDescriptor, ActionOutcome, CancellationSignal, CoreError, CoreResult,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for looking up and dispatching named actions.
///
/// Registries map action names to implementations. Dispatch never fails:
/// an unknown name yields a not-found [`ActionOutcome`].
#[async_trait]
pub trait ActionRegistry: Send + Sync {
    /// Look up an action by exact name.
    fn find(&self, name: &str) -> Option<Arc<dyn Action>>;

    /// Descriptors of every registered action, sorted by name.
    fn descriptors(&self) -> Vec<ActionDescriptor>;

    /// Invoke the named action with the call's arguments.
    async fn dispatch(&self, call: &ActionCall, cancel: &CancellationSignal) -> ActionOutcome {
        match self.find(call.name.trim()) {
            Some(action) => action.invoke(&call.arguments, cancel).await,
            None => ActionOutcome::unknown_action(&call.name),
        }
    }
}

/// In-memory action registry for local dispatch.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use opsdeck_core::{Action, ActionArgs, ActionOutcome, CancellationSignal};
/// use opsdeck_tools::{ActionRegistry, InMemoryActionRegistry};
/// use std::sync::Arc;
///
/// struct Hello;
///
/// #[async_trait]
/// impl Action for Hello {
///     fn name(&self) -> &str { "hello" }
///     async fn invoke(&self, _: &ActionArgs, _: &CancellationSignal) -> ActionOutcome {
///         ActionOutcome::success(serde_json::json!("hi"))
///     }
/// }
///
/// let registry = InMemoryActionRegistry::new().with_action(Arc::new(Hello));
/// assert!(registry.find("hello").is_some());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl InMemoryActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under its own name, replacing any previous one.
    pub fn with_action(mut self, action: Arc<dyn Action>) -> Self {
        self.actions.insert(action.name().to_string(), action);
        self
    }

    /// Register an action, rejecting duplicate names.
    pub fn try_with_action(mut self, action: Arc<dyn Action>) -> CoreResult<Self> {
        let name = action.name().to_string();
        if self.actions.contains_key(&name) {
            return Err(CoreError::Duplicate(name));
        }
        self.actions.insert(name, action);
        Ok(self)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl ActionRegistry for InMemoryActionRegistry {
    fn find(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    fn descriptors(&self) -> Vec<ActionDescriptor> {
        let mut descriptors: Vec<ActionDescriptor> =
            self.actions.values().map(|a| a.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_core::{ActionArgs, FailureReason};
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Action for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo arguments back"
        }

        async fn invoke(&self, args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
            ActionOutcome::success(args.clone().into_value())
        }
    }

    #[tokio::test]
    async fn test_dispatch_known_action() {
        let registry = InMemoryActionRegistry::new().with_action(Arc::new(Echo));
        let call = ActionCall::new("echo", ActionArgs::new().with("x", 1));
        let outcome = registry.dispatch(&call, &CancellationSignal::never()).await;
        assert_eq!(outcome.output(), Some(&json!({"x": 1})));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action() {
        let registry = InMemoryActionRegistry::new();
        let outcome = registry
            .dispatch(&ActionCall::bare("missing"), &CancellationSignal::never())
            .await;
        assert_eq!(
            outcome.failure_reason(),
            Some(&FailureReason::not_found("action 'missing'"))
        );
    }

    #[test]
    fn test_duplicates_and_descriptors() {
        let registry = InMemoryActionRegistry::new().with_action(Arc::new(Echo));
        assert!(matches!(
            registry.clone().try_with_action(Arc::new(Echo)),
            Err(CoreError::Duplicate(name)) if name == "echo"
        ));

        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].description, "Echo arguments back");
        assert_eq!(registry.names(), vec!["echo".to_string()]);
    }
}
