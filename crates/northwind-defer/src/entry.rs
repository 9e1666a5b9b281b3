//! Named result entries.

use std::fmt;
use std::future::Future;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

/// A result that has not settled yet.
pub type PendingResult<'a, T, E> = LocalBoxFuture<'a, Result<T, E>>;

/// One named value handed from a loader to the view.
pub enum Entry<'a, T, E> {
    /// A plain, already available value.
    Ready(T),
    /// A value whose computation failed.
    Failed(E),
    /// A value still being computed.
    Pending(PendingResult<'a, T, E>),
}

impl<'a, T, E> Entry<'a, T, E> {
    /// Wrap a future as a pending entry.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + 'a,
    {
        Self::Pending(future.boxed_local())
    }

    /// Build a settled entry from a result.
    pub fn settled(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error),
        }
    }

    /// Whether the entry still has to be awaited.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Take the settled result, or `None` while the entry is pending.
    pub fn into_settled(self) -> Option<Result<T, E>> {
        match self {
            Self::Ready(value) => Some(Ok(value)),
            Self::Failed(error) => Some(Err(error)),
            Self::Pending(_) => None,
        }
    }

    /// Wait for the entry to settle.
    pub async fn settle(self) -> Result<T, E> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Failed(error) => Err(error),
            Self::Pending(future) => future.await,
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Entry<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// An insertion-ordered set of named entries for one request.
pub struct ResultSet<'a, T, E> {
    entries: Vec<(String, Entry<'a, T, E>)>,
}

impl<'a, T, E> ResultSet<'a, T, E> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an entry, builder style.
    pub fn with(mut self, name: impl Into<String>, entry: Entry<'a, T, E>) -> Self {
        self.insert(name, entry);
        self
    }

    /// Insert an entry. A repeated name replaces the old entry in place.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry<'a, T, E>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((name, entry)),
        }
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&Entry<'a, T, E>> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, e)| e)
    }

    /// Remove and return an entry by name.
    pub fn take(&mut self, name: &str) -> Option<Entry<'a, T, E>> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Entry names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry<'a, T, E>)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry is still pending.
    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(|(_, e)| e.is_pending())
    }
}

impl<T, E> Default for ResultSet<'_, T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, E> IntoIterator for ResultSet<'a, T, E> {
    type Item = (String, Entry<'a, T, E>);
    type IntoIter = std::vec::IntoIter<(String, Entry<'a, T, E>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T, E> FromIterator<(String, Entry<'a, T, E>)> for ResultSet<'a, T, E> {
    fn from_iter<I: IntoIterator<Item = (String, Entry<'a, T, E>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, entry) in iter {
            set.insert(name, entry);
        }
        set
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for ResultSet<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces_in_place() {
        let mut set: ResultSet<'_, i32, String> = ResultSet::new()
            .with("b", Entry::Ready(1))
            .with("a", Entry::Ready(2));
        set.insert("b", Entry::Ready(3));

        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(matches!(set.get("b"), Some(Entry::Ready(3))));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_take_removes_entry() {
        let mut set: ResultSet<'_, i32, String> =
            ResultSet::new().with("a", Entry::Failed("boom".to_string()));
        assert!(matches!(set.take("a"), Some(Entry::Failed(_))));
        assert!(set.take("a").is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_into_settled() {
        let pending: Entry<'_, i32, String> = Entry::pending(async { Ok(1) });
        assert!(pending.is_pending());
        assert!(pending.into_settled().is_none());
        assert_eq!(Entry::<i32, String>::Ready(4).into_settled(), Some(Ok(4)));
        assert_eq!(
            Entry::<i32, String>::settled(Err("e".to_string())).into_settled(),
            Some(Err("e".to_string()))
        );
    }

    #[test]
    fn test_settle_pending() {
        let entry: Entry<'_, &str, String> = Entry::pending(async { Ok("x") });
        assert_eq!(futures::executor::block_on(entry.settle()), Ok("x"));
    }

    #[test]
    fn test_debug_hides_futures() {
        let set: ResultSet<'_, i32, String> = ResultSet::new()
            .with("a", Entry::Ready(1))
            .with("b", Entry::pending(async { Ok(2) }));
        assert!(set.has_pending());
        assert_eq!(format!("{:?}", set), r#"{"a": Ready(1), "b": Pending(..)}"#);
    }
}
