//! Region allocator for tree nodes.
//!
//! Nodes live in blocks of fixed byte size. A block that fills up is retired
//! behind a fresh one; [`Arena::reset`] moves every block to a free chain
//! with its storage intact, so a long-lived arena stops touching the global
//! allocator once it has warmed up. Nodes are addressed by 32-bit ids, and
//! array elements use a smaller layout than object members, so the two kinds
//! are pooled separately. The composite value's own tag says which pool its
//! children are in.

use std::mem;

use crate::value::Value;

/// Bytes of node storage per block.
pub const BLOCK_SIZE: usize = 8192;

/// Index of a node within its pool. Which pool is decided by the tag of the
/// composite value holding the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Array element: value and forward link only.
#[derive(Debug, Clone, Copy)]
pub struct ArrayNode {
    pub value: Value,
    pub next: Option<NodeId>,
}

/// Object member: adds the key, stored as a buffer offset of the first
/// content byte (NUL-delimited like every parsed string).
#[derive(Debug, Clone, Copy)]
pub struct ObjectNode {
    pub value: Value,
    pub next: Option<NodeId>,
    pub name: usize,
}

#[derive(Debug)]
struct Pool<T> {
    /// Blocks holding live nodes; the last one is the bump target.
    in_use: Vec<Vec<T>>,
    /// Emptied blocks kept around for reuse.
    free: Vec<Vec<T>>,
    per_block: usize,
}

impl<T> Pool<T> {
    fn new() -> Self {
        Pool {
            in_use: Vec::new(),
            free: Vec::new(),
            per_block: (BLOCK_SIZE / mem::size_of::<T>()).max(1),
        }
    }

    fn alloc(&mut self, node: T) -> Option<NodeId> {
        let head_full = self
            .in_use
            .last()
            .map_or(true, |block| block.len() == self.per_block);
        if head_full {
            let block = self
                .free
                .pop()
                .unwrap_or_else(|| Vec::with_capacity(self.per_block));
            self.in_use.push(block);
        }
        let block_index = self.in_use.len() - 1;
        let id = block_index * self.per_block + self.in_use[block_index].len();
        if id > u32::MAX as usize {
            return None;
        }
        self.in_use[block_index].push(node);
        Some(NodeId(id as u32))
    }

    /// O(1): every block but the last is exactly full.
    #[inline]
    fn get(&self, id: NodeId) -> &T {
        let raw = id.index();
        &self.in_use[raw / self.per_block][raw % self.per_block]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut T {
        let raw = id.index();
        &mut self.in_use[raw / self.per_block][raw % self.per_block]
    }

    fn reset(&mut self) {
        for mut block in self.in_use.drain(..) {
            block.clear();
            self.free.push(block);
        }
    }

    fn len(&self) -> usize {
        match self.in_use.last() {
            Some(head) => (self.in_use.len() - 1) * self.per_block + head.len(),
            None => 0,
        }
    }
}

/// Node storage behind one or more parses. Reset between parses to recycle
/// the block chains without releasing them.
#[derive(Debug)]
pub struct Arena {
    arrays: Pool<ArrayNode>,
    objects: Pool<ObjectNode>,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            arrays: Pool::new(),
            objects: Pool::new(),
        }
    }

    /// Allocate an array node with a null value and no link. `None` means
    /// the id space is exhausted; the parser reports it as out of memory.
    pub fn alloc_array_node(&mut self) -> Option<NodeId> {
        self.arrays.alloc(ArrayNode {
            value: Value::NULL,
            next: None,
        })
    }

    pub fn alloc_object_node(&mut self) -> Option<NodeId> {
        self.objects.alloc(ObjectNode {
            value: Value::NULL,
            next: None,
            name: 0,
        })
    }

    #[inline]
    pub fn array_node(&self, id: NodeId) -> &ArrayNode {
        self.arrays.get(id)
    }

    #[inline]
    pub fn array_node_mut(&mut self, id: NodeId) -> &mut ArrayNode {
        self.arrays.get_mut(id)
    }

    #[inline]
    pub fn object_node(&self, id: NodeId) -> &ObjectNode {
        self.objects.get(id)
    }

    #[inline]
    pub fn object_node_mut(&mut self, id: NodeId) -> &mut ObjectNode {
        self.objects.get_mut(id)
    }

    /// Recycle all node storage. Ids handed out before the reset are dead.
    pub fn reset(&mut self) {
        self.arrays.reset();
        self.objects.reset();
    }

    pub fn array_node_count(&self) -> usize {
        self.arrays.len()
    }

    pub fn object_node_count(&self) -> usize {
        self.objects.len()
    }

    /// Blocks currently holding nodes, across both pools.
    pub fn blocks_in_use(&self) -> usize {
        self.arrays.in_use.len() + self.objects.in_use.len()
    }

    /// Recycled blocks waiting for the next parse.
    pub fn blocks_free(&self) -> usize {
        self.arrays.free.len() + self.objects.free.len()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena::new()
    }
}
