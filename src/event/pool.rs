//! A free list of [`Event`]s for fire-and-forget dispatch.
//!
//! The pool is thread local: events hold `Rc`s and never cross threads. An
//! acquired event is handed out inside a [`PooledEvent`] guard which puts it
//! back when dropped, including while unwinding out of a panicking listener,
//! so an event still in use can never be handed to another borrower.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use super::{Event, EventData, EventType};

/// How many released events the free list keeps by default.
pub const DEFAULT_MAX_RETAINED: usize = 32;

thread_local! {
    static EVENT_POOL: RefCell<PoolState> = const { RefCell::new(PoolState::new()) };
}

struct PoolState {
    free: Vec<Event>,
    max_retained: usize,
    created: usize,
    in_use: usize,
}

impl PoolState {
    const fn new() -> Self {
        Self {
            free: Vec::new(),
            max_retained: DEFAULT_MAX_RETAINED,
            created: 0,
            in_use: 0,
        }
    }
}

/// Counters describing the current thread's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Events waiting in the free list.
    pub free: usize,
    /// Events allocated by the pool since the thread started.
    pub created: usize,
    /// Events currently borrowed through a [`PooledEvent`].
    pub in_use: usize,
}

/// Handle to the current thread's event pool.
pub struct EventPool;

impl EventPool {
    /// Take an event from the free list, or allocate one, initialized as a fresh event.
    pub fn acquire(
        event_type: impl Into<EventType>,
        bubbles: bool,
        data: Option<EventData>,
    ) -> PooledEvent {
        let event_type = event_type.into();
        debug_assert!(!event_type.is_empty(), "event type must not be empty");
        let recycled = EVENT_POOL.with_borrow_mut(|pool| {
            pool.in_use += 1;
            let recycled = pool.free.pop();
            if recycled.is_none() {
                pool.created += 1;
                trace!(created = pool.created, "event pool grew");
            }
            recycled
        });
        let event = match recycled {
            Some(mut event) => {
                event.reset(event_type, bubbles, data);
                event
            }
            None => Event::new(event_type, bubbles, data),
        };
        PooledEvent { event: Some(event) }
    }

    /// Cap the number of events kept for reuse. Excess events are dropped.
    pub fn set_max_retained(max: usize) {
        let trimmed = EVENT_POOL.with_borrow_mut(|pool| {
            pool.max_retained = max;
            if pool.free.len() > max {
                pool.free.split_off(max)
            } else {
                Vec::new()
            }
        });
        if !trimmed.is_empty() {
            debug!(dropped = trimmed.len(), max, "event pool trimmed");
        }
    }

    pub fn max_retained() -> usize {
        EVENT_POOL.with_borrow(|pool| pool.max_retained)
    }

    /// Drop every event in the free list.
    pub fn clear() {
        let free = EVENT_POOL.with_borrow_mut(|pool| std::mem::take(&mut pool.free));
        drop(free);
    }

    pub fn stats() -> PoolStats {
        EVENT_POOL.with_borrow(|pool| PoolStats {
            free: pool.free.len(),
            created: pool.created,
            in_use: pool.in_use,
        })
    }

    fn release(mut event: Event) {
        // Resetting drops payload and targets, which may run arbitrary code, so
        // it has to happen before the pool is borrowed.
        event.reset(EventType::Borrowed("released"), false, None);
        let _ = EVENT_POOL.try_with(|pool| {
            let mut pool = pool.borrow_mut();
            pool.in_use = pool.in_use.saturating_sub(1);
            if pool.free.len() < pool.max_retained {
                pool.free.push(event);
            } else {
                debug!(max = pool.max_retained, "event pool full, dropping released event");
            }
        });
    }
}

/// An event borrowed from the [`EventPool`], returned to it on drop.
pub struct PooledEvent {
    event: Option<Event>,
}

impl Deref for PooledEvent {
    type Target = Event;

    fn deref(&self) -> &Event {
        self.event.as_ref().expect("pooled event is only taken on drop")
    }
}

impl DerefMut for PooledEvent {
    fn deref_mut(&mut self) -> &mut Event {
        self.event.as_mut().expect("pooled event is only taken on drop")
    }
}

impl Drop for PooledEvent {
    fn drop(&mut self) {
        if let Some(event) = self.event.take() {
            EventPool::release(event);
        }
    }
}
