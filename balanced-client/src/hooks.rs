//! Callbacks run before every request.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;

use crate::client::HttpClient;
use crate::error::Error;
use crate::request::RequestOptions;

/// Inspects or rewrites a request just before it is sent.
///
/// Hooks run synchronously on the calling task. Returning an error aborts
/// the request and hands that error to the caller unchanged.
pub trait BeforeRequest: Send + Sync {
    fn before_request(
        &self,
        client: &HttpClient,
        method: &Method,
        url: &str,
        options: &mut RequestOptions,
    ) -> Result<(), Error>;
}

impl<F> BeforeRequest for F
where
    F: Fn(&HttpClient, &Method, &str, &mut RequestOptions) -> Result<(), Error> + Send + Sync,
{
    fn before_request(
        &self,
        client: &HttpClient,
        method: &Method,
        url: &str,
        options: &mut RequestOptions,
    ) -> Result<(), Error> {
        self(client, method, url, options)
    }
}

/// Ordered list of [`BeforeRequest`] hooks.
///
/// Hooks run in the order they were pushed.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn BeforeRequest>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<H: BeforeRequest + 'static>(&mut self, hook: H) {
        self.hooks.push(Arc::new(hook));
    }

    /// Removes the most recently pushed hook.
    pub fn pop(&mut self) -> Option<Arc<dyn BeforeRequest>> {
        self.hooks.pop()
    }

    pub fn clear(&mut self) {
        self.hooks.clear();
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every hook in order, stopping at the first error.
    pub fn run(
        &self,
        client: &HttpClient,
        method: &Method,
        url: &str,
        options: &mut RequestOptions,
    ) -> Result<(), Error> {
        for hook in &self.hooks {
            hook.before_request(client, method, url, options)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("len", &self.hooks.len())
            .finish()
    }
}
