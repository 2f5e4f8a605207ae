use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::subscriber::{Subscriber, Subscribers};

/// Single value with change notification.
///
/// `set` notifies only when the new value differs from the current one.
/// Notification is synchronous and happens while the observable is mutably
/// borrowed: a subscriber cannot write back into the same observable. Behind a
/// `RefCell` such a write panics with a borrow error.
///
/// Serialization covers the value only; subscribers are runtime state.
pub struct Observable<T> {
    value: T,
    subscribers: Subscribers<T>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Subscribers::new(),
        }
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Register `subscriber` (ignored if already present) and optionally call it
    /// right away with the current value.
    pub fn subscribe(&mut self, subscriber: &Subscriber<T>, notify_immediately: bool) {
        self.subscribers.add(subscriber);
        if notify_immediately {
            subscriber.call(&self.value);
        }
    }

    /// Remove `subscriber`; unknown subscribers are ignored.
    pub fn unsubscribe(&mut self, subscriber: &Subscriber<T>) -> bool {
        self.subscribers.remove(subscriber)
    }

    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: PartialEq> Observable<T> {
    /// Store `value` and notify if it differs. Returns whether it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.subscribers.notify(&self.value);
        true
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Serialize> Serialize for Observable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Observable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::new)
    }
}
