use super::PrometheusClient;

/// Persists the query cache exactly once, either when [`CacheFlush::flush`] is
/// called or when the guard is dropped on an early exit.
#[derive(Debug)]
pub struct CacheFlush<'a> {
    client: Option<&'a PrometheusClient>,
    flushed: bool,
}

impl<'a> CacheFlush<'a> {
    /// Guard the given client; with no client the guard does nothing.
    #[must_use]
    pub const fn new(client: Option<&'a PrometheusClient>) -> Self {
        Self { client, flushed: false }
    }

    /// Persist the cache now.
    pub fn flush(mut self) {
        self.flush_once();
    }

    fn flush_once(&mut self) {
        if self.flushed {
            return;
        }

        self.flushed = true;
        if let Some(client) = self.client {
            client.dump_cache();
        }
    }
}

impl Drop for CacheFlush<'_> {
    fn drop(&mut self) {
        self.flush_once();
    }
}
