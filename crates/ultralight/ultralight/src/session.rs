//! Ultralight-C session and mutual authentication
//!
//! A [`Session`] owns the reader connection for its whole lifetime and runs
//! at most one authentication handshake per transparent session:
//!
//! ```text
//! Idle -> SessionOpen -> ChallengeSent -> Authenticated
//!                                      \-> Failed
//! ```
//!
//! The handshake proves to both sides that the other holds the shared key:
//!
//! 1. `1A 00` -> card answers `AF || ek(RndB)`
//! 2. host decrypts RndB with a zero IV, draws RndA and sends
//!    `AF || ek(RndA || rol(RndB))` chained on ek(RndB)
//! 3. card answers `00 || ek(rol(RndA))` chained on the last block sent,
//!    which the host decrypts and compares against its own rol(RndA)

use rand::{CryptoRng, RngCore};
use tracing::{debug, info, trace, warn};
use ultralight_apdu_core::CardTransport;
use zeroize::Zeroizing;

use crate::{
    Error, Result,
    constants::ins,
    crypto::{self, BLOCK_SIZE, Iv, Nonce, ZERO_IV},
    keys::SharedKey,
    memory::Memory,
    transparent::{FramerConfig, TransparentFramer},
};

/// Authentication state of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No transparent session on the reader
    Idle,
    /// Transparent session open, not yet authenticated
    SessionOpen,
    /// Both challenge messages exchanged, awaiting verification
    ChallengeSent,
    /// The card proved knowledge of the shared key
    Authenticated,
    /// The handshake failed; the transparent session must be restarted
    Failed,
}

/// A connection to one Ultralight-C card
#[derive(Debug)]
pub struct Session<T: CardTransport> {
    framer: TransparentFramer<T>,
    key: SharedKey,
    state: AuthState,
}

impl<T: CardTransport> Session<T> {
    /// Create an idle session with the default reader framing
    pub fn new(transport: T, key: SharedKey) -> Self {
        Self::with_config(transport, key, FramerConfig::default())
    }

    /// Create an idle session with custom reader framing
    pub const fn with_config(transport: T, key: SharedKey, config: FramerConfig) -> Self {
        Self {
            framer: TransparentFramer::with_config(transport, config),
            key,
            state: AuthState::Idle,
        }
    }

    /// Create a session and open the transparent session right away
    pub fn open_new(transport: T, key: SharedKey, config: FramerConfig) -> Result<Self> {
        let mut session = Self::with_config(transport, key, config);
        session.open()?;
        Ok(session)
    }

    /// Current authentication state
    pub const fn state(&self) -> AuthState {
        self.state
    }

    /// Whether the card has been authenticated in this transparent session
    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// The underlying transport
    pub const fn transport(&self) -> &T {
        self.framer.transport()
    }

    /// Mutable access to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        self.framer.transport_mut()
    }

    /// Start the transparent session on the reader
    pub fn open(&mut self) -> Result<()> {
        if self.state != AuthState::Idle {
            return Err(Error::InvalidState(self.state));
        }

        self.framer.open_session()?;
        self.state = AuthState::SessionOpen;
        Ok(())
    }

    /// End the transparent session
    ///
    /// The session returns to [`AuthState::Idle`] even if the reader rejects
    /// the request, after which it may be opened again to retry.
    pub fn close(&mut self) -> Result<()> {
        if self.state == AuthState::Idle {
            return Ok(());
        }

        self.state = AuthState::Idle;
        self.framer.close_session()
    }

    /// Run the mutual authentication handshake with a fresh random RndA
    pub fn authenticate(&mut self) -> Result<()> {
        self.authenticate_with_rng(&mut rand::rng())
    }

    /// Run the mutual authentication handshake drawing RndA from `rng`
    ///
    /// Any failure is terminal for this transparent session: the state moves
    /// to [`AuthState::Failed`] and only [`close`](Self::close) followed by
    /// [`open`](Self::open) allows another attempt.
    pub fn authenticate_with_rng<R: CryptoRng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.state != AuthState::SessionOpen {
            return Err(Error::InvalidState(self.state));
        }

        match self.handshake(rng) {
            Ok(()) => {
                info!("Authentication successful: RndA matches");
                self.state = AuthState::Authenticated;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                self.state = AuthState::Failed;
                Err(e)
            }
        }
    }

    /// Block accessor for this session
    pub fn memory(&mut self) -> Result<Memory<'_, T>> {
        if self.state == AuthState::Idle {
            return Err(Error::InvalidState(self.state));
        }
        Ok(self.framer.memory())
    }

    fn handshake<R: CryptoRng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let key = self.key.expand();

        debug!("Requesting card challenge");
        let answer = self
            .framer
            .send(&[ins::AUTHENTICATE, ins::AUTHENTICATE_KEY_NO])?;
        let enc_rnd_b = challenge_block(&answer)?;
        trace!(enc_rnd_b = %hex::encode_upper(enc_rnd_b), "Encrypted RndB");

        let rnd_b = Zeroizing::new(to_nonce(&crypto::decrypt(&key, &ZERO_IV, &enc_rnd_b)?)?);

        let mut rnd_a = Zeroizing::new(Nonce::default());
        rng.fill_bytes(&mut rnd_a[..]);
        trace!(rnd_b = %hex::encode_upper(*rnd_b), rnd_a = %hex::encode_upper(*rnd_a), "Nonces");

        let mut token = Zeroizing::new([0u8; 2 * BLOCK_SIZE]);
        token[..BLOCK_SIZE].copy_from_slice(&rnd_a[..]);
        token[BLOCK_SIZE..].copy_from_slice(&crypto::rotate_left(&rnd_b));

        // The card chains on the ciphertext it sent last
        let enc_token = crypto::encrypt(&key, &enc_rnd_b, &token[..])?;

        let mut command = Vec::with_capacity(1 + enc_token.len());
        command.push(ins::ADDITIONAL_FRAME);
        command.extend_from_slice(&enc_token);

        debug!("Answering card challenge");
        let answer = self.framer.send(&command)?;
        let enc_rnd_a = challenge_block(&answer)?;
        self.state = AuthState::ChallengeSent;
        trace!(enc_rnd_a = %hex::encode_upper(enc_rnd_a), "Encrypted rotated RndA");

        let iv: Iv = to_nonce(&enc_token[BLOCK_SIZE..])?;
        let rnd_a_card = Zeroizing::new(crypto::decrypt(&key, &iv, &enc_rnd_a)?);

        if rnd_a_card.as_slice() != crypto::rotate_left(&rnd_a) {
            return Err(Error::AuthenticationFailed);
        }

        Ok(())
    }
}

impl<T: CardTransport> Drop for Session<T> {
    fn drop(&mut self) {
        if self.state != AuthState::Idle {
            if let Err(e) = self.close() {
                warn!(error = %e, "Failed to end transparent session on drop");
            }
        }
    }
}

/// The 8-byte block following the status marker of a handshake answer
fn challenge_block(answer: &[u8]) -> Result<Nonce> {
    let block = answer
        .get(1..1 + BLOCK_SIZE)
        .ok_or(Error::MalformedResponse("handshake answer shorter than one block"))?;
    to_nonce(block)
}

fn to_nonce(data: &[u8]) -> Result<Nonce> {
    data.try_into().map_err(|_| Error::InvalidLength {
        expected: BLOCK_SIZE,
        actual: data.len(),
    })
}
