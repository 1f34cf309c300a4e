use super::QueryCarrier;

/// Unbounded freelist of carriers owned by a single worker.
///
/// The pool never looks at carrier contents. Skipping `release` only costs an
/// extra allocation on the next `acquire`.
#[derive(Debug, Default)]
pub struct QueryPool {
    free: Vec<QueryCarrier>,
    allocated: u64,
}

impl QueryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a cleared carrier, allocating when the freelist is empty.
    pub fn acquire(&mut self) -> QueryCarrier {
        match self.free.pop() {
            Some(mut carrier) => {
                carrier.reset();
                carrier
            }
            None => {
                self.allocated += 1;
                QueryCarrier::new()
            }
        }
    }

    pub fn release(&mut self, carrier: QueryCarrier) {
        self.free.push(carrier);
    }

    /// Carriers currently waiting in the freelist
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Carriers this pool has ever allocated
    pub fn allocated(&self) -> u64 {
        self.allocated
    }
}
