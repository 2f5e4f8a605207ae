use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::subscriber::{Subscriber, Subscribers};

/// Sequence with change notification.
///
/// Every structural mutation notifies subscribers with the whole sequence,
/// whether or not any element actually changed. `remove` is the exception: it
/// notifies only when something was removed.
pub struct ObservableList<T> {
    items: Vec<T>,
    subscribers: Subscribers<[T]>,
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            subscribers: Subscribers::new(),
        }
    }

    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
        self.notify();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.notify();
    }

    /// Replace the contents with `items` and notify once.
    ///
    /// An empty source (including `None`) leaves the list empty.
    pub fn replace_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.items.clear();
        self.items.extend(items);
        self.notify();
    }

    pub fn subscribe(&mut self, subscriber: &Subscriber<[T]>, notify_immediately: bool) {
        self.subscribers.add(subscriber);
        if notify_immediately {
            subscriber.call(&self.items);
        }
    }

    pub fn unsubscribe(&mut self, subscriber: &Subscriber<[T]>) -> bool {
        self.subscribers.remove(subscriber)
    }

    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    fn notify(&self) {
        self.subscribers.notify(&self.items);
    }
}

impl<T: PartialEq> ObservableList<T> {
    /// Remove the first element equal to `item`. Returns whether one was removed.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(i) = self.items.iter().position(|x| x == item) else {
            return false;
        };
        self.items.remove(i);
        self.notify();
        true
    }
}

impl<T: Clone> ObservableList<T> {
    /// Independent copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            subscribers: Subscribers::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &self.items)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Serialize> Serialize for ObservableList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ObservableList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (Subscriber<[T]>, Rc<RefCell<Vec<Vec<T>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (Subscriber::new(move |v: &[T]| sink.borrow_mut().push(v.to_vec())), seen)
    }

    #[test]
    fn add_and_clear_notify_with_full_contents() {
        let mut list = ObservableList::new();
        let (sub, seen) = recorder();
        list.subscribe(&sub, false);

        list.add("sword");
        list.add("shield");
        list.clear();

        assert_eq!(
            *seen.borrow(),
            [vec!["sword"], vec!["sword", "shield"], vec![]]
        );
        assert!(list.is_empty());
    }

    #[test]
    fn clearing_an_empty_list_still_notifies() {
        let mut list = ObservableList::<u8>::new();
        let (sub, seen) = recorder();
        list.subscribe(&sub, false);

        list.clear();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn remove_notifies_only_on_success() {
        let mut list = ObservableList::from(vec![1, 2, 1]);
        let (sub, seen) = recorder();
        list.subscribe(&sub, false);

        assert!(!list.remove(&7));
        assert!(seen.borrow().is_empty());

        assert!(list.remove(&1));
        assert_eq!(*seen.borrow(), [vec![2, 1]]);
        assert_eq!(list.items(), [2, 1]);
    }

    #[test]
    fn replace_all_notifies_once() {
        let mut list = ObservableList::from(vec![9]);
        let (sub, seen) = recorder();
        list.subscribe(&sub, false);

        list.replace_all(vec![1, 2, 3]);

        assert_eq!(*seen.borrow(), [vec![1, 2, 3]]);
        assert_eq!(list.snapshot(), [1, 2, 3]);
    }

    #[test]
    fn replace_all_with_nothing_empties_the_list() {
        let mut list = ObservableList::from(vec![4, 5]);
        let (sub, seen) = recorder();
        list.subscribe(&sub, false);

        list.replace_all(None);

        assert!(list.is_empty());
        assert_eq!(*seen.borrow(), [Vec::<i32>::new()]);
    }

    #[test]
    fn snapshot_is_independent() {
        let list = ObservableList::from(vec![1, 2, 3]);
        let mut copy = list.snapshot();
        copy.push(4);
        copy[0] = 100;

        assert_eq!(list.items(), [1, 2, 3]);
    }

    #[test]
    fn subscribe_immediately_sends_current_contents() {
        let mut list = ObservableList::from(vec!['a', 'b']);
        let (sub, seen) = recorder();

        list.subscribe(&sub, true);
        list.subscribe(&sub, false);
        assert_eq!(list.subscriber_count(), 1);
        assert_eq!(*seen.borrow(), [vec!['a', 'b']]);

        assert!(list.unsubscribe(&sub));
        assert!(!list.unsubscribe(&sub));
        list.add('c');
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn serializes_as_a_plain_sequence() {
        let list = ObservableList::from(vec![3, 1]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, "[3,1]");

        let back: ObservableList<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items(), [3, 1]);
    }
}
