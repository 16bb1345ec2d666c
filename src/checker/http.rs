// src/checker/http.rs
// =============================================================================
// External URL verification.
//
// For each distinct URL, one pass through a small state machine:
// 1. Whitelist match => valid, no network call
// 2. Cache hit       => reuse the earlier outcome, no network call
// 3. HEAD probe (GET fallback on 405):
//      status < 400  => valid
//      status 429    => exponential backoff and retry, bounded budget
//      status >= 400 => invalid, no retry
//      transport err => invalid, no retry
//
// A fixed politeness delay separates consecutive fresh probes so distinct
// checks never hammer remote hosts back to back. Whitelist hits, cache hits,
// and malformed URLs never trigger it.
// =============================================================================

use anyhow::Result;
use regex::Regex;
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;

use super::CheckOutcome;

/// Per-request network timeout.
const TIMEOUT: Duration = Duration::from_secs(10);

/// Total request attempts per URL when rate limited (initial try included).
const RETRY_BUDGET: u32 = 2;

/// Pause between distinct external checks.
const REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Some hosts reject clients without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0 (linkscan link checker) AppleWebKit/537.36";

/// Bounded retry state for rate-limited responses.
///
/// Separate from the HTTP plumbing so the retry contract is testable on its
/// own: each call to `next_delay` consumes one attempt and yields the backoff
/// to sleep before the next try, or `None` once the budget is spent.
#[derive(Debug)]
pub struct Backoff {
    attempt: u32,
    budget: u32,
}

impl Backoff {
    pub fn new(budget: u32) -> Self {
        Self { attempt: 0, budget }
    }

    /// `Some(2^attempt seconds)` while attempts remain, `None` afterwards.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.budget {
            None
        } else {
            Some(Duration::from_secs(1u64 << (self.attempt - 1)))
        }
    }
}

/// Checks external URLs, remembering every outcome for the rest of the run.
pub struct UrlChecker {
    client: Client,
    cache: HashMap<String, CheckOutcome>,
    whitelist: Vec<Regex>,
    /// Whether a network probe has gone out yet; decides when the
    /// politeness delay applies.
    probed: bool,
}

impl UrlChecker {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()?;

        // GitHub issue/discussion listings sit behind aggressive rate
        // limiting but are structurally always present, so they are assumed
        // valid rather than probed.
        let whitelist = [
            r"^https://github\.com/[^/]+/[^/]+/issues",
            r"^https://github\.com/[^/]+/[^/]+/discussions",
            r"^https://github\.com/orgs/[^/]+/discussions",
            r"^https://github\.com/orgs/[^/]+/repositories",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("hard-coded whitelist pattern compiles"))
        .collect();

        Ok(Self {
            client,
            cache: HashMap::new(),
            whitelist,
            probed: false,
        })
    }

    /// Validate one external URL, reusing earlier results where possible.
    ///
    /// Each distinct URL hits the network at most once per run; every later
    /// occurrence gets the cached outcome.
    pub async fn check(&mut self, url: &str) -> CheckOutcome {
        if self.is_whitelisted(url) {
            return CheckOutcome::valid("Known-good URL (assumed valid)");
        }

        if let Some(cached) = self.cache.get(url) {
            return cached.clone();
        }

        // Reject junk like "https://" or embedded whitespace before spending
        // a request on it
        let outcome = match url::Url::parse(url) {
            Err(e) => CheckOutcome::invalid(format!("Invalid URL: {e}")),
            Ok(_) => {
                // Be nice to servers: pause between consecutive fresh
                // probes, never before the first one or after the last
                if self.probed {
                    sleep(REQUEST_DELAY).await;
                }
                self.probed = true;
                self.probe(url).await
            }
        };

        self.cache.insert(url.to_string(), outcome.clone());
        outcome
    }

    pub fn is_whitelisted(&self, url: &str) -> bool {
        self.whitelist.iter().any(|p| p.is_match(url))
    }

    async fn probe(&self, url: &str) -> CheckOutcome {
        let mut backoff = Backoff::new(RETRY_BUDGET);

        loop {
            let response = match self.send_probe(url).await {
                Ok(response) => response,
                Err(e) => return categorize_error(e),
            };

            let status = response.status();

            if status.as_u16() < 400 {
                return CheckOutcome::valid(format!("OK ({})", status.as_u16()));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                match backoff.next_delay() {
                    Some(delay) => {
                        sleep(delay).await;
                        continue;
                    }
                    None => return CheckOutcome::invalid("Rate limited after retries"),
                }
            }

            return CheckOutcome::invalid(format!("HTTP {}", status.as_u16()));
        }
    }

    /// HEAD first; some servers answer 405 to HEAD, those get one GET.
    async fn send_probe(&self, url: &str) -> reqwest::Result<Response> {
        let response = self.client.head(url).send().await?;

        if response.status() == StatusCode::METHOD_NOT_ALLOWED {
            return self.client.get(url).send().await;
        }

        Ok(response)
    }
}

/// Map transport-level failures onto outcome messages.
fn categorize_error(error: reqwest::Error) -> CheckOutcome {
    if error.is_timeout() {
        CheckOutcome::invalid("Timeout")
    } else if error.is_connect() {
        CheckOutcome::invalid("Connection error")
    } else {
        CheckOutcome::invalid(format!("Request error: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    /// Serves one scripted status line per connection, then shuts down.
    /// Returns the base URL and a counter of requests actually received.
    fn scripted_server(statuses: Vec<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for status in statuses {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                counter.fetch_add(1, Ordering::SeqCst);

                // Drain the request head before answering
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);

                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (format!("http://{addr}"), hits)
    }

    #[test]
    fn test_backoff_delays_are_exponential() {
        let mut backoff = Backoff::new(4);
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(1)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(2)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(4)));
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_backoff_budget_counts_total_attempts() {
        // Budget of 2 = initial try plus one retry, then give up
        let mut backoff = Backoff::new(RETRY_BUDGET);
        assert!(backoff.next_delay().is_some());
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_backoff_exhausted_stays_exhausted() {
        let mut backoff = Backoff::new(1);
        assert_eq!(backoff.next_delay(), None);
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_whitelist_matches_github_issue_pages() {
        let checker = UrlChecker::new().unwrap();
        assert!(checker.is_whitelisted("https://github.com/rust-lang/rust/issues"));
        assert!(checker.is_whitelisted("https://github.com/rust-lang/rust/issues/1234"));
        assert!(checker.is_whitelisted("https://github.com/orgs/rust-lang/discussions"));
        assert!(checker.is_whitelisted("https://github.com/orgs/rust-lang/repositories"));
    }

    #[test]
    fn test_whitelist_ignores_ordinary_urls() {
        let checker = UrlChecker::new().unwrap();
        assert!(!checker.is_whitelisted("https://github.com/rust-lang/rust"));
        assert!(!checker.is_whitelisted("https://example.com/issues"));
    }

    #[tokio::test]
    async fn test_malformed_url_is_invalid_without_a_request() {
        let mut checker = UrlChecker::new().unwrap();
        let started = std::time::Instant::now();
        let outcome = checker.check("https://exa mple.com").await;
        assert!(!outcome.ok);
        assert!(outcome.message.starts_with("Invalid URL"));
        // No request went out, so no politeness delay either
        assert!(started.elapsed() < REQUEST_DELAY);
    }

    #[tokio::test]
    async fn test_rate_limited_then_ok_within_budget_is_valid() {
        let (base, hits) = scripted_server(vec!["429 Too Many Requests", "200 OK"]);
        let mut checker = UrlChecker::new().unwrap();

        let outcome = checker.check(&format!("{base}/page")).await;

        assert!(outcome.ok);
        assert_eq!(outcome.message, "OK (200)");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rate_limited_past_budget_is_invalid() {
        let (base, hits) = scripted_server(vec![
            "429 Too Many Requests",
            "429 Too Many Requests",
        ]);
        let mut checker = UrlChecker::new().unwrap();

        let outcome = checker.check(&format!("{base}/page")).await;

        assert!(!outcome.ok);
        assert_eq!(outcome.message, "Rate limited after retries");
        assert_eq!(hits.load(Ordering::SeqCst), RETRY_BUDGET as usize);
    }

    #[tokio::test]
    async fn test_distinct_url_is_probed_once_and_outcome_reused() {
        // One scripted response only; a second request would see a dead
        // listener and come back as a connection error instead
        let (base, hits) = scripted_server(vec!["404 Not Found"]);
        let mut checker = UrlChecker::new().unwrap();
        let url = format!("{base}/missing");

        let first = checker.check(&url).await;
        let second = checker.check(&url).await;

        assert!(!first.ok);
        assert_eq!(first.message, "HTTP 404");
        assert_eq!(second.message, "HTTP 404");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_politeness_delay_separates_distinct_probes() {
        let (base, _hits) = scripted_server(vec!["200 OK", "200 OK"]);
        let mut checker = UrlChecker::new().unwrap();

        let started = std::time::Instant::now();
        assert!(checker.check(&format!("{base}/a")).await.ok);
        let after_first = started.elapsed();
        assert!(checker.check(&format!("{base}/b")).await.ok);

        // The delay runs before the second probe, not after the first
        assert!(after_first < REQUEST_DELAY);
        assert!(started.elapsed() >= REQUEST_DELAY);
    }
}
