use super::HandleId;

/// Cursor over a snapshot of related handles. Owned by the runtime: freed on
/// exhaustion or by an explicit free, whichever comes first.
#[derive(Debug)]
pub struct IteratorObj {
    items: Vec<HandleId>,
    next: usize,
}

impl IteratorObj {
    pub fn new(items: Vec<HandleId>) -> Self {
        Self { items, next: 0 }
    }
}

impl Iterator for IteratorObj {
    type Item = HandleId;

    fn next(&mut self) -> Option<HandleId> {
        let item = self.items.get(self.next).copied()?;
        self.next += 1;
        Some(item)
    }
}
