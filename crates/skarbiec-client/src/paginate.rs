//! Cursor pagination.

use crate::error::Result;

/// One page of a listing response.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// Continuation token for the next page, if the server issued one.
    pub next_token: Option<String>,
    /// Whether the server signalled more results.
    pub has_more: bool,
}

/// Fully drain one cursor-paginated query into a single ordered sequence.
///
/// `fetch` is invoked with `None` first (that call carries the query's
/// filter parameters) and with the continuation token alone on every
/// subsequent call. Pages accumulate in server-returned order until the
/// server stops signalling more results or stops issuing tokens. Tokens
/// are scoped to this one query and consumed exactly once.
///
/// An inner failure propagates immediately and the partial accumulation
/// is discarded; callers that want partial results rely on the crawler's
/// per-branch fault isolation instead.
pub async fn drain_pages<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: AsyncFnMut(Option<String>) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = fetch(token.take()).await?;
        items.extend(page.items);
        match (page.has_more, page.next_token) {
            (true, Some(next)) => token = Some(next),
            _ => return Ok(items),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_pages_accumulate_in_server_order() {
        let mut tokens_seen = Vec::new();
        let items = drain_pages(async |token| {
            tokens_seen.push(token.clone());
            Ok(match token.as_deref() {
                None => Page {
                    items: vec![1, 2],
                    next_token: Some("t1".to_owned()),
                    has_more: true,
                },
                Some("t1") => Page {
                    items: vec![3],
                    next_token: Some("t2".to_owned()),
                    has_more: true,
                },
                _ => Page {
                    items: vec![4, 5],
                    next_token: None,
                    has_more: false,
                },
            })
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            tokens_seen,
            vec![None, Some("t1".to_owned()), Some("t2".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_single_page_stops_without_token() {
        let items = drain_pages(async |_token| {
            Ok(Page {
                items: vec!["only"],
                next_token: None,
                has_more: false,
            })
        })
        .await
        .unwrap();
        assert_eq!(items, vec!["only"]);
    }

    #[tokio::test]
    async fn test_has_more_without_token_stops() {
        // A server claiming more results but issuing no token cannot be
        // continued; the drain must terminate rather than loop.
        let items = drain_pages(async |_token| {
            Ok(Page {
                items: vec![1],
                next_token: None,
                has_more: true,
            })
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1]);
    }

    #[tokio::test]
    async fn test_inner_failure_discards_partial_accumulation() {
        let mut calls = 0u32;
        let result: Result<Vec<i32>> = drain_pages(async |token| {
            calls += 1;
            match token {
                None => Ok(Page {
                    items: vec![1, 2],
                    next_token: Some("t1".to_owned()),
                    has_more: true,
                }),
                Some(_) => Err(Error::config("listing rejected")),
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Config { .. })));
        assert_eq!(calls, 2);
    }
}
