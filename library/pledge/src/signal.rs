//! # Signals
//!
//! Minimal push-based streams used to wire view-model inputs to outputs.
//!
//! The model is single-threaded and synchronous: sending a value calls every
//! observer in subscription order before `send` returns. There is no failure
//! channel and no completion; a signal goes quiet once every writer feeding
//! it has been dropped.
//!
//! Delivery is serialised per signal. A value sent while that signal is still
//! delivering an earlier one (an observer writing back into the graph) is
//! queued and delivered to every observer only after the earlier value has
//! reached all of them.
//!
//! ## Ownership
//!
//! ```text
//! Subscription ──strong──► derived core ──strong──► upstream Subscription ──► source core
//!                                ▲                                                │
//!                                └──────────────weak (Observer)───────────────────┘
//! ```
//!
//! A derived signal keeps its sources alive; a source only holds a weak
//! handle back. Dropping the last handle to a derived signal (and every
//! [`Subscription`] on it) therefore detaches it from its source.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Core<T> {
    observers: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
    upstream: RefCell<Vec<Subscription>>,
    delivering: Cell<bool>,
    pending: RefCell<VecDeque<T>>,
}

impl<T> Core<T> {
    fn new() -> Self {
        Core {
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            upstream: RefCell::new(Vec::new()),
            delivering: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    fn attach(&self, callback: Callback<T>) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers.borrow_mut().push((id, callback));
        id
    }

    fn deliver(&self, value: &T)
    where
        T: Clone,
    {
        if self.delivering.get() {
            self.pending.borrow_mut().push_back(value.clone());
            return;
        }

        self.delivering.set(true);
        self.broadcast(value);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(queued) => self.broadcast(&queued),
                None => break,
            }
        }
        self.delivering.set(false);
    }

    fn broadcast(&self, value: &T) {
        // Snapshot first so observers may subscribe or unsubscribe while we deliver.
        let snapshot: Vec<Callback<T>> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in snapshot {
            callback(value);
        }
    }
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<T> Detach for Core<T> {
    fn detach(&self, id: u64) {
        self.observers.borrow_mut().retain(|(i, _)| *i != id);
    }
}

/// Handle to an active observation. Dropping it stops delivery.
#[must_use = "dropping a Subscription immediately detaches the observer"]
pub struct Subscription {
    source: Option<Rc<dyn Detach>>,
    id: u64,
}

impl Subscription {
    /// Detach now instead of waiting for drop.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(source) = self.source.take() {
            source.detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// A hot stream of values.
pub struct Signal<T> {
    core: Rc<Core<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal {
            core: self.core.clone(),
        }
    }
}

/// Write side of a [`Signal::pipe`].
pub struct Observer<T> {
    core: Weak<Core<T>>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Observer {
            core: self.core.clone(),
        }
    }
}

impl<T: Clone> Observer<T> {
    /// Deliver `value` to every current observer of the paired signal.
    pub fn send(&self, value: &T) {
        if let Some(core) = self.core.upgrade() {
            core.deliver(value);
        }
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a signal together with the observer that feeds it.
    pub fn pipe() -> (Signal<T>, Observer<T>) {
        let core = Rc::new(Core::new());
        let observer = Observer {
            core: Rc::downgrade(&core),
        };
        (Signal { core }, observer)
    }

    pub fn observe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.core.attach(Rc::new(f));
        let source: Rc<dyn Detach> = self.core.clone();
        Subscription {
            source: Some(source),
            id,
        }
    }

    #[cfg(test)]
    fn observer_count(&self) -> usize {
        self.core.observers.borrow().len()
    }

    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Signal<U> {
        let (signal, observer) = Signal::pipe();
        let subscription = self.observe(move |value| observer.send(&f(value)));
        signal.retain(subscription);
        signal
    }

    pub fn filter_map<U: Clone + 'static>(&self, f: impl Fn(&T) -> Option<U> + 'static) -> Signal<U> {
        let (signal, observer) = Signal::pipe();
        let subscription = self.observe(move |value| {
            if let Some(mapped) = f(value) {
                observer.send(&mapped);
            }
        });
        signal.retain(subscription);
        signal
    }

    /// Forward only the first `count` values.
    pub fn take(&self, count: usize) -> Signal<T> {
        let (signal, observer) = Signal::pipe();
        let remaining = Cell::new(count);
        let subscription = self.observe(move |value| {
            let left = remaining.get();
            if left > 0 {
                remaining.set(left - 1);
                observer.send(value);
            }
        });
        signal.retain(subscription);
        signal
    }

    fn retain(&self, subscription: Subscription) {
        self.core.upstream.borrow_mut().push(subscription);
    }
}

impl<T: Clone + 'static> Signal<Option<T>> {
    /// Drop `None` values and unwrap the rest.
    pub fn skip_nil(&self) -> Signal<T> {
        self.filter_map(|value| value.clone())
    }
}

/// Combine the latest values of two signals.
///
/// Nothing is emitted until both sources have produced at least one value;
/// after that, every value from either source emits the pair of latest values.
/// Older values are overwritten, never queued.
pub fn combine_latest<A, B>(a: &Signal<A>, b: &Signal<B>) -> Signal<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let (signal, observer) = Signal::pipe();
    let latest: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));

    let from_a = {
        let latest = latest.clone();
        let observer = observer.clone();
        a.observe(move |value| {
            let pair = {
                let mut latest = latest.borrow_mut();
                latest.0 = Some(value.clone());
                both(&latest)
            };
            if let Some(pair) = pair {
                observer.send(&pair);
            }
        })
    };
    let from_b = b.observe(move |value| {
        let pair = {
            let mut latest = latest.borrow_mut();
            latest.1 = Some(value.clone());
            both(&latest)
        };
        if let Some(pair) = pair {
            observer.send(&pair);
        }
    });

    signal.retain(from_a);
    signal.retain(from_b);
    signal
}

fn both<A: Clone, B: Clone>(latest: &(Option<A>, Option<B>)) -> Option<(A, B)> {
    match latest {
        (Some(a), Some(b)) => Some((a.clone(), b.clone())),
        _ => None,
    }
}

/// A latest-value cell whose writes are observable.
///
/// [`MutableProperty::signal`] emits each value written *after* subscription;
/// the initial value is never emitted.
pub struct MutableProperty<T> {
    value: RefCell<T>,
    signal: Signal<T>,
    observer: Observer<T>,
}

impl<T: Clone + 'static> MutableProperty<T> {
    pub fn new(initial: T) -> Self {
        let (signal, observer) = Signal::pipe();
        MutableProperty {
            value: RefCell::new(initial),
            signal,
            observer,
        }
    }

    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the stored value and notify observers.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        self.observer.send(&value);
    }

    pub fn signal(&self) -> Signal<T> {
        self.signal.clone()
    }
}
