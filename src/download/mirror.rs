//! Failover host selection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;
use url::Url;

use crate::config::MirrorStrategy;
use crate::error::Result;
use crate::manifest::MirrorSet;

/// Chooses the mirror used for the next attempt of a page download.
pub trait HostSelector: Send + Sync {
    fn pick<'a>(&self, mirrors: &'a MirrorSet) -> &'a Url;
}

/// Uniformly random choice.
#[derive(Debug, Default)]
pub struct RandomSelector;

impl HostSelector for RandomSelector {
    fn pick<'a>(&self, mirrors: &'a MirrorSet) -> &'a Url {
        let hosts = mirrors.hosts();
        &hosts[rand::thread_rng().gen_range(0..hosts.len())]
    }
}

/// Cycles through mirrors in order, shared across all pages.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl HostSelector for RoundRobinSelector {
    fn pick<'a>(&self, mirrors: &'a MirrorSet) -> &'a Url {
        let hosts = mirrors.hosts();
        &hosts[self.next.fetch_add(1, Ordering::Relaxed) % hosts.len()]
    }
}

/// Build the selector for a configured strategy.
pub fn selector_for(strategy: MirrorStrategy) -> Arc<dyn HostSelector> {
    match strategy {
        MirrorStrategy::Random => Arc::new(RandomSelector),
        MirrorStrategy::RoundRobin => Arc::new(RoundRobinSelector::default()),
    }
}

/// Replace only the host of `url` with the mirror's host.
pub fn rehost(url: &Url, mirror: &Url) -> Result<Url> {
    let mut rewritten = url.clone();
    rewritten.set_host(mirror.host_str())?;
    Ok(rewritten)
}
