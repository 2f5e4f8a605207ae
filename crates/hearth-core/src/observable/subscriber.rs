use std::fmt;
use std::rc::Rc;

/// Callback handle with identity.
///
/// Two handles are the same subscriber when they are clones of one another;
/// wrapping the same closure twice yields two different subscribers. Keep a
/// clone around to unsubscribe later.
pub struct Subscriber<T: ?Sized>(Rc<dyn Fn(&T)>);

impl<T: ?Sized> Subscriber<T> {
    pub fn new(f: impl Fn(&T) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Identity comparison (allocation address, not behaviour).
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    #[inline]
    pub fn call(&self, value: &T) {
        (self.0)(value)
    }
}

impl<T: ?Sized> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscriber({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Ordered subscriber list, no duplicates by identity.
pub(crate) struct Subscribers<T: ?Sized> {
    list: Vec<Subscriber<T>>,
}

impl<T: ?Sized> Subscribers<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Returns `false` if the subscriber was already present.
    pub(crate) fn add(&mut self, subscriber: &Subscriber<T>) -> bool {
        if self.list.iter().any(|s| s.same(subscriber)) {
            return false;
        }
        self.list.push(subscriber.clone());
        true
    }

    pub(crate) fn remove(&mut self, subscriber: &Subscriber<T>) -> bool {
        match self.list.iter().position(|s| s.same(subscriber)) {
            Some(i) => {
                self.list.remove(i);
                true
            }
            None => false,
        }
    }

    /// Call every subscriber in subscription order.
    pub(crate) fn notify(&self, value: &T) {
        for s in &self.list {
            s.call(value);
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }
}
