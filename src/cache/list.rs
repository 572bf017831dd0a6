//! Index-linked recency list
//!
//! Nodes live in a `Vec<Option<Node>>` arena and link to each other by slot
//! index. Freed slots go on a free list and are reused, so a `Handle` stays
//! valid until its node is removed. Front is most-recently-used, back is
//! least-recently-used.

/// Stable reference to a slot in the arena
pub type Handle = usize;

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<Handle>,
    next: Option<Handle>,
}

pub struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<Handle>,
    tail: Option<Handle>,
    free: Vec<Handle>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    /// Pre-size the arena so a full cache never reallocates
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn alloc_slot(&mut self, node: Node<K, V>) -> Handle {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Insert a new entry as most-recently-used and return its handle
    pub fn push_front(&mut self, key: K, value: V) -> Handle {
        let idx = self.alloc_slot(Node {
            key,
            value,
            prev: None,
            next: self.head,
        });

        match self.head {
            Some(old_head) => {
                if let Some(node) = self.nodes[old_head].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    /// Detach a live node from its neighbours without freeing the slot
    fn unlink(&mut self, idx: Handle) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(pn) = self.nodes[p].as_mut() {
                    pn.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(nn) = self.nodes[n].as_mut() {
                    nn.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Splice an existing node to the front. O(1).
    pub fn move_to_front(&mut self, idx: Handle) {
        if self.head == Some(idx) || self.nodes.get(idx).map_or(true, Option::is_none) {
            return;
        }

        self.unlink(idx);

        let old_head = self.head;
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        // The old head must point back at the new one or backward walks break.
        if let Some(h) = old_head {
            if let Some(hn) = self.nodes[h].as_mut() {
                hn.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Remove a node by handle, freeing its slot
    pub fn remove(&mut self, idx: Handle) -> Option<(K, V)> {
        if self.nodes.get(idx).map_or(true, Option::is_none) {
            return None;
        }
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some((node.key, node.value))
    }

    /// Remove and return the least-recently-used entry
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        self.remove(tail)
    }

    pub fn key(&self, idx: Handle) -> Option<&K> {
        self.nodes.get(idx)?.as_ref().map(|node| &node.key)
    }

    pub fn value(&self, idx: Handle) -> Option<&V> {
        self.nodes.get(idx)?.as_ref().map(|node| &node.value)
    }

    /// Replace the value at `idx` in place, returning the old one
    pub fn replace_value(&mut self, idx: Handle, value: V) -> Option<V> {
        self.nodes
            .get_mut(idx)?
            .as_mut()
            .map(|node| std::mem::replace(&mut node.value, value))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Walk front to back (most- to least-recently-used)
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Handles in front-to-back order, following `next` links
    pub fn handles_forward(&self) -> Vec<Handle> {
        let mut out = Vec::with_capacity(self.len);
        let mut cur = self.head;
        // Bounded by slot count so a corrupted cycle cannot spin forever.
        while let Some(idx) = cur {
            if out.len() > self.nodes.len() {
                break;
            }
            out.push(idx);
            cur = self.nodes[idx].as_ref().and_then(|node| node.next);
        }
        out
    }

    /// Handles in back-to-front order, following `prev` links
    pub fn handles_backward(&self) -> Vec<Handle> {
        let mut out = Vec::with_capacity(self.len);
        let mut cur = self.tail;
        while let Some(idx) = cur {
            if out.len() > self.nodes.len() {
                break;
            }
            out.push(idx);
            cur = self.nodes[idx].as_ref().and_then(|node| node.prev);
        }
        out
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let idx = self.cursor?;
        let node = list.nodes[idx].as_ref()?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}
