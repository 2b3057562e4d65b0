//! Activation-gated resource loading.
//!
//! An [`ActivationLoader`] is fed the view's activation signal. On every
//! rising edge it starts a new *generation*: state goes to
//! [`ViewState::Loading`] and a task runs the initialize step followed by
//! the fetch step. The task writes its outcome only if its generation is
//! still the latest one, so a reactivation supersedes an older run and the
//! older result is dropped. Dropping the loader aborts outstanding tasks.
//!
//! Lifecycle:
//! 1. `set_active(true)` - rising edge, start generation N
//! 2. `initialize()` - on failure, `Error(generic)` and stop
//! 3. `fetch()` - `Loaded`, `Empty`, or `Error(server message | fallback | generic)`
//! 4. `set_active(false)` / `set_active(true)` - next rising edge, generation N+1

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use team_api::ApiFuture;
use team_protocol::ApiResponse;

/// Render-ready state of a loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    /// The fetch succeeded but carried no payload.
    Empty,
    Loaded(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// User-facing text a view shows for failed loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMessages {
    /// Name used in logs.
    pub view: &'static str,
    /// Shown for initialization failures and transport failures.
    pub generic_failure: &'static str,
    /// Shown when the service rejects the fetch without a message.
    pub rejected_fallback: &'static str,
}

/// The two remote steps a view needs, plus its failure wording.
pub trait LoadSteps: Send + Sync + 'static {
    type Data: Clone + Send + Sync + 'static;

    fn messages(&self) -> LoadMessages;

    /// Idempotent setup call made before every fetch.
    fn initialize(&self) -> ApiFuture<'_, ()>;

    fn fetch(&self) -> ApiFuture<'_, ApiResponse<Self::Data>>;
}

struct Slot<T> {
    generation: u64,
    state: ViewState<T>,
}

/// Runs a view's [`LoadSteps`] once per activation.
pub struct ActivationLoader<S: LoadSteps> {
    steps: Arc<S>,
    slot: Arc<RwLock<Slot<S::Data>>>,
    active: bool,
    generation: u64,
    in_flight: Vec<JoinHandle<()>>,
}

impl<S: LoadSteps> ActivationLoader<S> {
    pub fn new(steps: S) -> Self {
        Self {
            steps: Arc::new(steps),
            slot: Arc::new(RwLock::new(Slot { generation: 0, state: ViewState::Loading })),
            active: false,
            generation: 0,
            in_flight: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of loads started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Feed the activation signal. Returns `true` when this call started a
    /// load, which happens only on a rising edge.
    pub async fn set_active(&mut self, active: bool) -> bool {
        let rising = active && !self.active;
        self.active = active;
        if !rising {
            return false;
        }

        self.in_flight.retain(|handle| !handle.is_finished());
        self.generation += 1;
        let generation = self.generation;
        {
            let mut slot = self.slot.write().await;
            slot.generation = generation;
            slot.state = ViewState::Loading;
        }

        tracing::info!(
            view = self.steps.messages().view,
            generation,
            "View activated, loading"
        );

        let steps = Arc::clone(&self.steps);
        let slot = Arc::clone(&self.slot);
        self.in_flight.push(tokio::spawn(async move {
            let outcome = load_once(steps.as_ref()).await;
            let mut slot = slot.write().await;
            if slot.generation != generation {
                tracing::debug!(
                    view = steps.messages().view,
                    generation,
                    current = slot.generation,
                    "Discarding superseded load result"
                );
                return;
            }
            slot.state = outcome;
        }));
        true
    }

    /// Current state, cloned for rendering.
    pub async fn state(&self) -> ViewState<S::Data> {
        self.slot.read().await.state.clone()
    }

    /// Wait for every load started so far to finish.
    pub async fn settled(&mut self) {
        for handle in self.in_flight.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Load task did not complete");
            }
        }
    }
}

impl<S: LoadSteps> Drop for ActivationLoader<S> {
    fn drop(&mut self) {
        for handle in &self.in_flight {
            handle.abort();
        }
    }
}

/// One initialize + fetch pass, collapsed to a [`ViewState`].
async fn load_once<S: LoadSteps>(steps: &S) -> ViewState<S::Data> {
    let messages = steps.messages();

    if let Err(e) = steps.initialize().await {
        tracing::warn!(view = messages.view, error = %e, "Membership initialization failed");
        return ViewState::Error(messages.generic_failure.to_string());
    }

    match steps.fetch().await {
        Ok(response) if response.success => match response.data {
            Some(data) => ViewState::Loaded(data),
            None => ViewState::Empty,
        },
        Ok(response) => {
            tracing::warn!(
                view = messages.view,
                message = response.message.as_deref().unwrap_or(""),
                "Service rejected fetch"
            );
            ViewState::Error(
                response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| messages.rejected_fallback.to_string()),
            )
        }
        Err(e) => {
            tracing::error!(view = messages.view, error = %e, "Fetch failed");
            ViewState::Error(messages.generic_failure.to_string())
        }
    }
}
