/// Recycles arena slot numbers for objects the runtime allocates and frees
/// itself (iterators). Released slots are handed out again LIFO.
#[derive(Debug, Default)]
pub struct IDPool {
    released: Vec<u32>,
    next: u32,
}

impl IDPool {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn alloc_id(&mut self) -> u32 {
        match self.released.pop() {
            Some(id) => id,
            None => {
                let id = self.next;
                let Some(next) = id.checked_add(1) else {
                    panic!("IDPool is empty! allocated => {}", id);
                };
                self.next = next;
                id
            }
        }
    }

    #[inline(always)]
    pub fn release_id(&mut self, id: u32) {
        assert!(
            id < self.next,
            "The released id is out of range! id => {}, allocated => {}",
            id,
            self.next
        );
        debug_assert!(!self.released.contains(&id), "id {} is already released", id);
        self.released.push(id);
    }

    /// Number of ids currently handed out.
    pub fn in_use(&self) -> usize {
        self.next as usize - self.released.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_release_reuse() {
        let mut pool = IDPool::new();
        let a = pool.alloc_id();
        let b = pool.alloc_id();
        assert_ne!(a, b);
        assert_eq!(pool.in_use(), 2);

        pool.release_id(a);
        assert_eq!(pool.in_use(), 1);
        assert_eq!(pool.alloc_id(), a);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_release_unknown_id() {
        let mut pool = IDPool::new();
        pool.release_id(3);
    }
}
