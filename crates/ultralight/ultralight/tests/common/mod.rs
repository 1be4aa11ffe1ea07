//! Simulated ACR1552U reader holding a simulated Ultralight-C card

#![allow(dead_code, unreachable_pub)]

use bytes::Bytes;
use rand::{CryptoRng, RngCore};
use ultralight_c::{
    CardTransport, SharedKey, TransportError,
    constants::{ins, memory, reader},
    crypto::{self, Nonce, ZERO_IV},
};

/// Card answer status relayed by the reader when the card NAKs
pub const NAK_STATUS: [u8; 2] = [0x63, 0x00];

/// Reader preamble in front of every relayed card answer
fn preamble(answer_len: usize) -> [u8; 14] {
    [
        0xC0, 0x03, 0x00, 0x90, 0x00, 0x92, 0x01, 0x00, 0x96, 0x02, 0x00, 0x00, 0x97,
        answer_len as u8,
    ]
}

enum Handshake {
    Idle,
    AwaitingToken { rnd_b: Nonce, enc_rnd_b: Nonce },
}

/// Card side of the protocol
pub struct SimulatedCard {
    key: SharedKey,
    memory: [u8; 48 * memory::BLOCK_SIZE],
    rnd_b: Nonce,
    verify_host: bool,
    handshake: Handshake,
    authenticated: bool,
}

impl SimulatedCard {
    pub fn new(key: SharedKey) -> Self {
        let mut memory = [0u8; 48 * memory::BLOCK_SIZE];
        for (i, byte) in memory.iter_mut().enumerate() {
            *byte = i as u8;
        }
        memory[usize::from(memory::AUTH0_BLOCK) * memory::BLOCK_SIZE] =
            memory::DEFAULT_PROTECTED_FROM;

        Self {
            key,
            memory,
            rnd_b: [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77],
            verify_host: true,
            handshake: Handshake::Idle,
            authenticated: false,
        }
    }

    /// Answer the second handshake step even when the host's RndB is wrong,
    /// as a card that skips its own check would
    pub fn without_host_verification(mut self) -> Self {
        self.verify_host = false;
        self
    }

    pub fn with_rnd_b(mut self, rnd_b: Nonce) -> Self {
        self.rnd_b = rnd_b;
        self
    }

    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn block(&self, addr: u8) -> [u8; 4] {
        let start = usize::from(addr) * memory::BLOCK_SIZE;
        self.memory[start..start + memory::BLOCK_SIZE]
            .try_into()
            .unwrap()
    }

    fn reset(&mut self) {
        self.handshake = Handshake::Idle;
        self.authenticated = false;
    }

    fn is_protected(&self, addr: u8) -> bool {
        addr >= self.block(memory::AUTH0_BLOCK)[0]
    }

    fn handle(&mut self, command: &[u8]) -> Option<Vec<u8>> {
        let key = self.key.expand();

        match command {
            [ins::AUTHENTICATE, ins::AUTHENTICATE_KEY_NO] => {
                self.reset();
                let enc_rnd_b: Nonce = crypto::encrypt(&key, &ZERO_IV, &self.rnd_b)
                    .unwrap()
                    .try_into()
                    .unwrap();
                self.handshake = Handshake::AwaitingToken {
                    rnd_b: self.rnd_b,
                    enc_rnd_b,
                };

                let mut answer = vec![ins::ADDITIONAL_FRAME];
                answer.extend_from_slice(&enc_rnd_b);
                Some(answer)
            }
            [ins::ADDITIONAL_FRAME, token @ ..] if token.len() == 16 => {
                let Handshake::AwaitingToken { rnd_b, enc_rnd_b } =
                    std::mem::replace(&mut self.handshake, Handshake::Idle)
                else {
                    return None;
                };

                let plain = crypto::decrypt(&key, &enc_rnd_b, token).unwrap();
                let rnd_a: Nonce = plain[..8].try_into().unwrap();
                let host_knows_key = plain[8..] == crypto::rotate_left(&rnd_b);
                if self.verify_host && !host_knows_key {
                    return None;
                }
                self.authenticated = host_knows_key;

                let iv: Nonce = token[8..].try_into().unwrap();
                let mut answer = vec![0x00];
                answer.extend(crypto::encrypt(&key, &iv, &crypto::rotate_left(&rnd_a)).unwrap());
                Some(answer)
            }
            [ins::READ, addr] => {
                if *addr >= memory::READABLE_END
                    || (self.is_protected(*addr) && !self.authenticated)
                {
                    return None;
                }
                let mut answer = Vec::with_capacity(16);
                for offset in 0..4u8 {
                    let page = (*addr + offset) % memory::READABLE_END;
                    answer.extend_from_slice(&self.block(page));
                }
                Some(answer)
            }
            [ins::WRITE, addr, data @ ..] if data.len() == memory::BLOCK_SIZE => {
                if *addr > memory::LAST_BLOCK || (self.is_protected(*addr) && !self.authenticated) {
                    return None;
                }
                let start = usize::from(*addr) * memory::BLOCK_SIZE;
                self.memory[start..start + memory::BLOCK_SIZE].copy_from_slice(data);
                Some(vec![0x0A])
            }
            _ => None,
        }
    }
}

/// Reader side: session bracketing and the transparent exchange envelope
pub struct SimulatedReader {
    pub card: SimulatedCard,
    pub session_open: bool,
    pub sessions_closed: usize,
    /// Every APDU received, in order
    pub received: Vec<Vec<u8>>,
    exchange_failure: Option<[u8; 2]>,
    failures_left: Option<usize>,
    switch_failure: Option<[u8; 2]>,
}

impl std::fmt::Debug for SimulatedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedReader")
            .field("session_open", &self.session_open)
            .field("received", &self.received.len())
            .finish()
    }
}

impl SimulatedReader {
    pub fn new(card: SimulatedCard) -> Self {
        Self {
            card,
            session_open: false,
            sessions_closed: 0,
            received: Vec::new(),
            exchange_failure: None,
            failures_left: None,
            switch_failure: None,
        }
    }

    /// Reader holding a card keyed with the factory key
    pub fn factory() -> Self {
        Self::new(SimulatedCard::new(SharedKey::factory_default()))
    }

    /// Answer every transparent exchange with `status`
    pub fn fail_exchanges_with(mut self, status: [u8; 2]) -> Self {
        self.exchange_failure = Some(status);
        self.failures_left = None;
        self
    }

    /// Answer the next `count` transparent exchanges with `status`
    pub fn fail_next_exchanges(mut self, count: usize, status: [u8; 2]) -> Self {
        self.exchange_failure = Some(status);
        self.failures_left = Some(count);
        self
    }

    /// Refuse the protocol switch that follows session start with `status`
    pub fn fail_protocol_switch_with(mut self, status: [u8; 2]) -> Self {
        self.switch_failure = Some(status);
        self
    }

    /// Card commands relayed so far, envelopes stripped
    pub fn card_commands(&self) -> Vec<Vec<u8>> {
        self.received
            .iter()
            .filter(|apdu| apdu.starts_with(&[reader::CLA, reader::INS_TRANSPARENT, 0x00, reader::P2_EXCHANGE]))
            .map(|apdu| apdu[7..].to_vec())
            .collect()
    }

    fn exchange(&mut self, apdu: &[u8]) -> Vec<u8> {
        let [_, _, _, _, lc, reader::TAG_TRANSCEIVE, len, inner @ ..] = apdu else {
            return vec![0x67, 0x00];
        };
        if usize::from(*lc) != usize::from(*len) + 2 || usize::from(*len) != inner.len() {
            return vec![0x67, 0x00];
        }
        if !self.session_open {
            return vec![0x69, 0x86];
        }

        if let Some(status) = self.exchange_failure {
            match &mut self.failures_left {
                None => return status.to_vec(),
                Some(0) => self.exchange_failure = None,
                Some(left) => {
                    *left -= 1;
                    return status.to_vec();
                }
            }
        }

        match self.card.handle(inner) {
            Some(answer) => {
                let mut response = preamble(answer.len()).to_vec();
                response.extend_from_slice(&answer);
                response.extend_from_slice(&[0x90, 0x00]);
                response
            }
            None => NAK_STATUS.to_vec(),
        }
    }
}

impl CardTransport for SimulatedReader {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.received.push(command.to_vec());

        let response = if command == reader::START_SESSION {
            self.session_open = true;
            vec![0xC0, 0x03, 0x00, 0x90, 0x00, 0x90, 0x00]
        } else if command == reader::SWITCH_PROTOCOL_14443A {
            if let Some(status) = self.switch_failure {
                status.to_vec()
            } else if self.session_open {
                vec![0xC0, 0x03, 0x00, 0x90, 0x00, 0x90, 0x00]
            } else {
                vec![0x69, 0x86]
            }
        } else if command == reader::END_SESSION {
            self.session_open = false;
            self.sessions_closed += 1;
            self.card.reset();
            vec![0xC0, 0x03, 0x00, 0x90, 0x00, 0x90, 0x00]
        } else if command.starts_with(&[reader::CLA, reader::INS_TRANSPARENT, 0x00, reader::P2_EXCHANGE]) {
            self.exchange(command)
        } else {
            vec![0x6D, 0x00]
        };

        Ok(Bytes::from(response))
    }

    fn is_connected(&self) -> bool {
        true
    }
}

/// RNG that hands out a fixed RndA
pub struct FixedRng(pub Nonce);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.0[..4].try_into().unwrap())
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.0)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for (dst, src) in dst.iter_mut().zip(self.0.iter().cycle()) {
            *dst = *src;
        }
    }
}

impl CryptoRng for FixedRng {}
