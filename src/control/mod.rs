//! One-way parameter mailbox from the control thread to the render thread.
//!
//! Built on an `rtrb` single-producer/single-consumer ring buffer, so neither
//! side ever locks. The render thread drains everything available at the top
//! of each block and applies it in order, which makes the newest value for
//! each field win.
//!
//! The ring has a fixed capacity. When it is full the sender parks the
//! newest value per field in an atomic slot shared with the receiver, and
//! `drain` collects those slots right after the ring:
//!
//! ```text
//!   send(m) ──► slot[f] empty? ──yes──► ring.push(m) ──ok──► done
//!                    │                        │
//!                    no                      full
//!                    ▼                        ▼
//!              slot[f] = PARKED | bits(m) ◄───┘
//!
//!   drain() ──► pop ring until empty ──► swap every slot to 0
//! ```
//!
//! While a field is parked, later values for it overwrite the slot instead
//! of entering the ring, so a ring message can never overtake a parked one.

mod message;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, PushError, RingBuffer};

pub use message::{ParamValue, ParameterMessage};

pub const CONTROL_QUEUE_SIZE: usize = 64;

/// Occupancy flag above the 32 payload bits of a parked slot.
const PARKED: u64 = 1 << 32;

/// Create a connected sender/receiver pair with the default capacity.
pub fn channel<M: ParameterMessage>() -> (ParamSender<M>, ParamReceiver<M>) {
    channel_with_capacity(CONTROL_QUEUE_SIZE)
}

pub fn channel_with_capacity<M: ParameterMessage>(
    capacity: usize,
) -> (ParamSender<M>, ParamReceiver<M>) {
    let (tx, rx) = RingBuffer::<M>::new(capacity);
    let parked: Arc<[AtomicU64]> = (0..M::FIELDS).map(|_| AtomicU64::new(0)).collect();

    let sender = ParamSender {
        tx,
        parked: Arc::clone(&parked),
    };
    let receiver = ParamReceiver { rx, parked };

    (sender, receiver)
}

/// Control-thread end of the mailbox.
pub struct ParamSender<M: ParameterMessage> {
    tx: Producer<M>,
    parked: Arc<[AtomicU64]>,
}

impl<M: ParameterMessage> ParamSender<M> {
    /// Deliver a message, superseding any undelivered value for the same
    /// field. Never blocks.
    pub fn send(&mut self, message: M) {
        let field = message.field();
        debug_assert!(field < M::FIELDS, "field index out of range");
        let slot = &self.parked[field];

        if slot.load(Ordering::Acquire) & PARKED == 0 {
            match self.tx.push(message) {
                Ok(()) => return,
                Err(PushError::Full(_)) => {}
            }
        }

        let previous = slot.swap(PARKED | u64::from(message.to_bits()), Ordering::AcqRel);
        if previous & PARKED == 0 {
            tracing::debug!(field, "control queue full, coalescing parameter updates");
        }
    }

    /// Fields whose newest value is waiting in a parked slot.
    pub fn parked(&self) -> usize {
        self.parked
            .iter()
            .filter(|slot| slot.load(Ordering::Acquire) & PARKED != 0)
            .count()
    }

    /// True once the render half has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.tx.is_abandoned()
    }
}

/// Render-thread end of the mailbox.
pub struct ParamReceiver<M> {
    rx: Consumer<M>,
    parked: Arc<[AtomicU64]>,
}

impl<M: ParameterMessage> ParamReceiver<M> {
    /// Apply every delivered message in arrival order, parked values last.
    /// Never blocks and never allocates. Returns the number of messages
    /// applied.
    #[inline]
    pub fn drain(&mut self, mut apply: impl FnMut(M)) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.pop() {
            apply(message);
            applied += 1;
        }

        for (field, slot) in self.parked.iter().enumerate() {
            let bits = slot.swap(0, Ordering::AcqRel);
            if bits & PARKED != 0 {
                apply(M::from_bits(field, bits as u32));
                applied += 1;
            }
        }

        applied
    }

    /// Messages in the ring, not counting parked values.
    pub fn pending(&self) -> usize {
        self.rx.slots()
    }
}
