//! Addresses with a lazily decoded, memoized variant and key-hash pair.
//!
//! Decoding goes through an [`AddressBackend`], which may suspend. Each
//! [`DecodedAddress`] runs its backend at most once: concurrent callers
//! wait on the in-flight decode and then share its outcome, failures
//! included. The in-flight decode is owned by the address, not by the
//! caller that started it, so a caller that gives up mid-decode leaves it
//! running for the others.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use async_trait::async_trait;
use chain_ada::{extract_key_hashes, Address, AddressVariant, DecodeError, KeyHashPair};
use futures::future::{BoxFuture, FutureExt, Shared};

/// Something that can turn raw address bytes into a variant.
#[async_trait]
pub trait AddressBackend: Send + Sync {
    async fn decode(&self, raw: &Address) -> Result<AddressVariant, DecodeError>;
}

/// Decodes in-process with [`chain_ada::decode`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

#[async_trait]
impl AddressBackend for NativeBackend {
    async fn decode(&self, raw: &Address) -> Result<AddressVariant, DecodeError> {
        chain_ada::decode(raw)
    }
}

type Decoding = Shared<BoxFuture<'static, Result<AddressVariant, DecodeError>>>;

enum DecodeState {
    NotStarted,
    InProgress(Decoding),
    Done,
}

pub struct DecodedAddress {
    raw: Address,
    backend: Arc<dyn AddressBackend>,
    state: Mutex<DecodeState>,
    variant: OnceLock<Result<AddressVariant, DecodeError>>,
    key_hashes: OnceLock<Option<KeyHashPair>>,
}

impl DecodedAddress {
    pub fn new(raw: Address) -> Self {
        Self::with_backend(raw, Arc::new(NativeBackend))
    }

    pub fn with_backend(raw: Address, backend: Arc<dyn AddressBackend>) -> Self {
        Self {
            raw,
            backend,
            state: Mutex::new(DecodeState::NotStarted),
            variant: OnceLock::new(),
            key_hashes: OnceLock::new(),
        }
    }

    /// Wrap a bech32 or base58 address string.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        Ok(Self::new(Address::parse(text)?))
    }

    pub fn address(&self) -> &Address {
        &self.raw
    }

    pub async fn variant(&self) -> Result<&AddressVariant, DecodeError> {
        if let Some(done) = self.variant.get() {
            return done.as_ref().map_err(Clone::clone);
        }

        let Some(decoding) = self.join_decode() else {
            return self.finished();
        };
        let outcome = decoding.await;

        let done = self.variant.get_or_init(|| outcome);
        *self.lock_state() = DecodeState::Done;
        done.as_ref().map_err(Clone::clone)
    }

    /// `Ok(None)` for addresses without a key-hash pair; `Err` only when
    /// the address itself cannot be decoded.
    pub async fn key_hashes(&self) -> Result<Option<&KeyHashPair>, DecodeError> {
        let variant = self.variant().await?;
        Ok(self
            .key_hashes
            .get_or_init(|| extract_key_hashes(variant))
            .as_ref())
    }

    /// The decoded variant if a decode has already completed.
    pub fn cached_variant(&self) -> Option<&Result<AddressVariant, DecodeError>> {
        self.variant.get()
    }

    /// Handle on the in-flight decode, starting it if nobody has yet.
    /// `None` once the outcome is stored.
    fn join_decode(&self) -> Option<Decoding> {
        let mut state = self.lock_state();
        match &*state {
            DecodeState::Done => None,
            DecodeState::InProgress(decoding) => Some(decoding.clone()),
            DecodeState::NotStarted => {
                let backend = Arc::clone(&self.backend);
                let raw = self.raw.clone();
                tracing::debug!(address = %raw, "starting address decode");
                let decoding = async move { backend.decode(&raw).await }
                    .boxed()
                    .shared();
                *state = DecodeState::InProgress(decoding.clone());
                Some(decoding)
            }
        }
    }

    fn finished(&self) -> Result<&AddressVariant, DecodeError> {
        match self.variant.get() {
            Some(done) => done.as_ref().map_err(Clone::clone),
            None => Err(DecodeError::UnknownFormat),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, DecodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for DecodedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedAddress")
            .field("raw", &self.raw)
            .field("variant", &self.variant.get())
            .finish()
    }
}
