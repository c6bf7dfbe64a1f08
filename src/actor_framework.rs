use std::collections::HashMap;
use std::hash::Hash;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// 1. THE ABSTRACTION (Records keyed by a business key)
// =============================================================================

/// Trait that any stored record must implement to be managed by StoreActor.
///
/// Records are looked up by their business key (a product code for both the
/// product and the inventory store), while the store generates a surrogate id
/// on creation.
pub trait Record: Clone + Send + Sync + 'static {
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    /// Business key the store indexes the record by
    fn key(&self) -> &Self::Key;

    /// Construct the full record from the generated id and the payload
    fn from_create(id: String, payload: Self::CreatePayload) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
}

/// Errors raised by the store actor plumbing itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped the response")]
    ActorDropped,
    #[error("Record already exists: {0}")]
    AlreadyExists(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Record rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum StoreRequest<T: Record> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T>,
    },
    Get {
        key: T::Key,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        key: T::Key,
        patch: T::Patch,
        respond_to: Response<T>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct StoreActor<T: Record> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    store: HashMap<T::Key, T>,
    next_id_fn: Box<dyn Fn() -> String + Send + Sync>,
}

impl<T: Record> StoreActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> String + Send + Sync + 'static
    ) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = StoreClient { sender };
        (actor, client)
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.create(payload));
                }
                StoreRequest::Get { key, respond_to } => {
                    let item = self.store.get(&key).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::List { respond_to } => {
                    let items = self.store.values().cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
                StoreRequest::Update { key, patch, respond_to } => {
                    let result = match self.store.get_mut(&key) {
                        Some(item) => item
                            .on_update(patch)
                            .map(|_| item.clone())
                            .map_err(FrameworkError::Rejected),
                        None => Err(FrameworkError::NotFound(key.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
    }

    fn create(&mut self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id, payload).map_err(FrameworkError::Rejected)?;
        if self.store.contains_key(item.key()) {
            return Err(FrameworkError::AlreadyExists(item.key().to_string()));
        }
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.store.insert(item.key().clone(), item.clone());
        Ok(item)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct StoreClient<T: Record> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Record> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> StoreRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(build(respond_to))
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        self.request(|respond_to| StoreRequest::Create { payload, respond_to }).await
    }

    pub async fn get(&self, key: T::Key) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| StoreRequest::Get { key, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| StoreRequest::List { respond_to }).await
    }

    pub async fn update(&self, key: T::Key, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| StoreRequest::Update { key, patch, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
