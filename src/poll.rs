//! Poll scheduler and event dispatcher.
//!
//! Timer interrupt context usually must not perform bus I/O, so each poll is
//! split in two: the timer handler calls [`PollSlot::submit`] (cheap,
//! interrupt-safe), and a context that may block drives
//! [`Poller::run_pending`], which reads one report, decodes it and emits the
//! resulting events. The slot holds at most one request; submitting while
//! one is queued is a no-op, so a timer that outpaces the worker coalesces
//! into a single pending poll instead of piling up work.
//!
//! Events within one cycle are emitted in a fixed order: `AbsX`, `AbsY`,
//! then `Contact`. The position events are best-effort; the contact event is
//! delivered blocking and flagged as a frame boundary, so a consumer never
//! observes a press or release without having drained the coordinates that
//! belong to it.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::{
    sync::Exc7200, Delivery, Error, EventSink, InputEvent, ScreenConfig, TouchSample,
};

/// Single pending-poll slot shared between the timer and the worker context.
///
/// `const`-constructible, so it can live in a `static` that both an
/// interrupt handler and the worker reference.
pub struct PollSlot {
    pending: AtomicBool,
}

impl PollSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Request one poll cycle. Safe to call from interrupt context.
    ///
    /// Returns `true` if the request was newly queued, `false` if a poll was
    /// already pending and this request coalesced into it.
    pub fn submit(&self) -> bool {
        !self.pending.swap(true, Ordering::AcqRel)
    }

    /// Whether a poll is currently queued.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

impl Default for PollSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll worker: owns the register driver, the event sink and the screen
/// geometry, and executes queued poll cycles outside interrupt context.
pub struct Poller<'a, I2C, S> {
    touch: Exc7200<I2C>,
    sink: S,
    slot: &'a PollSlot,
    config: ScreenConfig,
}

impl<'a, I2C, S> Poller<'a, I2C, S>
where
    I2C: I2c<SevenBitAddress>,
    S: EventSink,
{
    /// Probe the controller and build the poll worker.
    ///
    /// Arm the recurring [`POLL_PERIOD_MS`](crate::POLL_PERIOD_MS) timer
    /// only once this returns `Ok`; on [`Error::NotReady`] there is nothing
    /// to poll and no timer should ever fire.
    pub fn new(
        mut touch: Exc7200<I2C>,
        sink: S,
        slot: &'a PollSlot,
        config: ScreenConfig,
    ) -> Result<Self, Error<I2C::Error>> {
        touch.probe()?;
        Ok(Self {
            touch,
            sink,
            slot,
            config,
        })
    }

    /// Execute one queued poll cycle, if any.
    ///
    /// Call from a context that may block (a thread, work queue or idle
    /// loop), never from the timer handler itself. The exclusive borrow
    /// keeps cycles serialized; a tick arriving mid-cycle queues the next
    /// one.
    ///
    /// Returns `Ok(true)` when a cycle ran, `Ok(false)` when nothing was
    /// queued. A failed bus read aborts the cycle with [`Error::Bus`] and no
    /// events; the next submitted tick retries naturally.
    pub fn run_pending(&mut self) -> Result<bool, Error<I2C::Error>> {
        if !self.slot.take() {
            return Ok(false);
        }
        self.poll_once()?;
        Ok(true)
    }

    fn poll_once(&mut self) -> Result<(), Error<I2C::Error>> {
        let sample = match self.touch.read_report() {
            Ok(sample) => sample,
            Err(e) => {
                error!("touch report read failed");
                return Err(e);
            }
        };

        if let Some(sample) = sample {
            dispatch(sample, &self.config, &mut self.sink);
        }

        Ok(())
    }

    /// Tear down, returning the register driver and the sink.
    ///
    /// Stop the platform timer first; a request still queued in the slot is
    /// simply dropped with it.
    pub fn destroy(self) -> (Exc7200<I2C>, S) {
        (self.touch, self.sink)
    }
}

/// Rescale one decoded sample and emit its input events.
///
/// On a press: `AbsX`, `AbsY` (best-effort), then `Contact(true)` blocking
/// with the frame-boundary flag. On a release: only `Contact(false)`, also
/// blocking and flagged; no position accompanies a release.
pub fn dispatch<S: EventSink>(sample: TouchSample, config: &ScreenConfig, sink: &mut S) {
    let (x, y) = config.scale(sample.x, sample.y);

    debug!("pressed={} x={} y={}", sample.pressed, x, y);

    if sample.pressed {
        let _ = sink.report(InputEvent::AbsX(x), false, Delivery::BestEffort);
        let _ = sink.report(InputEvent::AbsY(y), false, Delivery::BestEffort);
    }

    if sink
        .report(InputEvent::Contact(sample.pressed), true, Delivery::Blocking)
        .is_err()
    {
        warn!("event sink rejected a contact event");
    }
}
