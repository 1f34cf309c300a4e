use rand::Rng;
use std::fmt;

use crate::error::{GenError, Result};

/// Tag name every devops host is stored under.
pub const HOST_TAG: &str = "hostname";

/// k distinct host indices drawn from a fleet of N, in draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSet {
    indices: Vec<usize>,
}

/// Display adapter rendering a host index as `host_<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostName(pub usize);

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host_{}", self.0)
    }
}

/// Draw `count` distinct hosts uniformly from `[0, fleet)`.
///
/// Every `count`-subset is equally likely. Cost is O(count) for small samples
/// and never materializes more than one permutation of the fleet.
pub fn sample_hosts<R: Rng>(rng: &mut R, fleet: usize, count: usize) -> Result<HostSet> {
    if count == 0 || count > fleet {
        return Err(GenError::InvalidSampleSize { fleet, count });
    }

    let indices = rand::seq::index::sample(rng, fleet, count).into_vec();
    Ok(HostSet { indices })
}

/// Draw one host uniformly from `[0, fleet)`, independently of earlier draws.
pub fn random_host<R: Rng>(rng: &mut R, fleet: usize) -> Result<HostName> {
    if fleet == 0 {
        return Err(GenError::InvalidSampleSize { fleet, count: 1 });
    }
    Ok(HostName(rng.gen_range(0..fleet)))
}

impl HostSet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn names(&self) -> impl Iterator<Item = HostName> + '_ {
        self.indices.iter().map(|&i| HostName(i))
    }
}
