use std::fmt;

/// Handle returned by [`Notifier::subscribe`], used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

/// A typed observer list.
///
/// Subscribers are called synchronously, in subscription order, every time the owner
/// broadcasts. There is no global dispatcher; each resource owns its own list.
pub struct Notifier<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<E> Notifier<E> {
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn broadcast(&mut self, event: &E) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn broadcast_reaches_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::<u32>::default();

        let a = seen.clone();
        notifier.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = seen.clone();
        notifier.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        notifier.broadcast(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier = Notifier::<()>::default();

        let c = count.clone();
        let id = notifier.subscribe(move |_| *c.borrow_mut() += 1);
        notifier.broadcast(&());
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.broadcast(&());

        assert_eq!(*count.borrow(), 1);
        assert!(notifier.is_empty());
    }
}
