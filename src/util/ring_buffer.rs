/// Fixed-capacity ring buffer. Oldest entry is overwritten when full.
///
/// Storage is allocated once; `push` never reallocates.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Vec<Option<T>>,
    head: usize,
    len:  usize,
    cap:  usize,
}

impl<T: Clone> RingBuffer<T> {
    /// A capacity of 0 is treated as 1.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { data: vec![None; cap], head: 0, len: 0, cap }
    }

    pub fn push(&mut self, val: T) {
        self.data[self.head] = Some(val);
        self.head = (self.head + 1) % self.cap;
        if self.len < self.cap {
            self.len += 1;
        }
    }

    /// Returns up to `n` most-recent values, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<T> {
        let n = n.min(self.len);
        (0..n)
            .rev()
            .filter_map(|i| {
                let idx = (self.head + self.cap - 1 - i) % self.cap;
                self.data[idx].clone()
            })
            .collect()
    }

    /// Copy of the whole contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> { self.last_n(self.len) }

    pub fn latest(&self) -> Option<&T> {
        if self.len == 0 { return None; }
        self.data[(self.head + self.cap - 1) % self.cap].as_ref()
    }

    pub fn len(&self) -> usize { self.len }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool { self.len == 0 }
}
