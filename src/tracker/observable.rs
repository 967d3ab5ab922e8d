use tokio::sync::watch;

/// A value that can be read synchronously and observed for changes.
///
/// New subscribers see the current value straight away: their first
/// `changed().await` resolves immediately.
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        let mut receiver = self.sender.subscribe();
        receiver.mark_changed();
        receiver
    }

    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.sender.send_modify(modify);
    }

    /// Resolves with the first value, current one included, that satisfies
    /// `predicate`.
    pub async fn wait_for(&self, mut predicate: impl FnMut(&T) -> bool) -> T {
        let mut receiver = self.sender.subscribe();
        let matched = receiver
            .wait_for(|value| predicate(value))
            .await
            .map(|value| T::clone(&value));
        match matched {
            Ok(value) => value,
            // the sender lives in `self`, so the channel cannot close here
            Err(_) => self.get(),
        }
    }
}

impl<T: Clone + PartialEq> Observable<T> {
    /// Stores `value` and notifies only when it differs from the current one.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
