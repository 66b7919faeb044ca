use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::api::{ApiClient, ApiError, Transport};
use crate::token::{KeyValueStorage, TokenStore};

/// Last known point total as reported by `/stats`.
pub struct PointsDisplay<T, S> {
    api: Rc<ApiClient<T>>,
    tokens: Rc<TokenStore<S>>,
    total: Cell<Option<u32>>,
    listeners: RefCell<Vec<Rc<dyn Fn(u32)>>>,
}

impl<T: Transport, S: KeyValueStorage> PointsDisplay<T, S> {
    pub fn new(api: Rc<ApiClient<T>>, tokens: Rc<TokenStore<S>>) -> Self {
        Self {
            api,
            tokens,
            total: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn total(&self) -> Option<u32> {
        self.total.get()
    }

    pub fn subscribe(&self, listener: impl Fn(u32) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub async fn refresh(&self) -> Result<u32, ApiError> {
        let authorization = self.tokens.get();
        let total = self.api.stats(authorization.as_deref()).await?;
        self.total.set(Some(total));

        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(total);
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{block_on, FakeTransport};
    use crate::token::MemoryStorage;

    fn display(replies: &[&str]) -> PointsDisplay<FakeTransport, MemoryStorage> {
        let api = Rc::new(ApiClient::new("http://scores.test", FakeTransport::new(replies)));
        let tokens = Rc::new(TokenStore::new(MemoryStorage::new()));
        PointsDisplay::new(api, tokens)
    }

    #[test]
    fn test_refresh_stores_and_notifies() {
        let points = display(&[r#"{"total_points": 80}"#, r#"{"total_points": 120}"#]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            points.subscribe(move |total| seen.borrow_mut().push(total));
        }

        assert_eq!(points.total(), None);
        assert_eq!(block_on(points.refresh()).unwrap(), 80);
        assert_eq!(block_on(points.refresh()).unwrap(), 120);
        assert_eq!(points.total(), Some(120));
        assert_eq!(seen.borrow().as_slice(), &[80, 120]);
    }

    #[test]
    fn test_failed_refresh_keeps_last_total() {
        let points = display(&[r#"{"total_points": 80}"#]);
        block_on(points.refresh()).unwrap();
        assert!(block_on(points.refresh()).is_err());
        assert_eq!(points.total(), Some(80));
    }

    #[test]
    fn test_refresh_sends_current_token() {
        let points = display(&[r#"{"total_points": 0}"#]);
        points.tokens.set(Some("abc"));
        block_on(points.refresh()).unwrap();

        let requests = points.api.transport().requests();
        assert_eq!(requests[0].header("Authorization"), Some("UserState abc"));
    }
}
