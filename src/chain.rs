//! Node arena and chain construction.
//!
//! Successors are array indices into one owned allocation rather than raw
//! pointers; `Option<NonZeroUsize>` keeps the record at pointer width while
//! giving the terminal a real representation. Zeroed memory decodes as
//! all-terminal nodes, so the arena is in a valid state before linking.

use log::debug;
use std::alloc::{self, Layout};
use std::num::NonZeroUsize;
use std::ops::Deref;
use std::ptr::NonNull;
use std::slice;

use crate::Error;

/// Large-page mapping granularity on the target platforms (2 MiB).
pub const HUGEPAGE_SIZE: usize = 2 * 1024 * 1024;

/// One chain element, padded out to a full cache line so consecutive hops
/// never share a line and a prefetcher gains nothing from a neighbor.
#[repr(C, align(64))]
pub struct Node {
    pub(crate) next: Option<NonZeroUsize>,
    _pad: [u8; 56],
}

impl Node {
    /// Index of the successor node, or `None` at the chain terminal.
    pub fn next(&self) -> Option<NonZeroUsize> {
        self.next
    }
}

/// How the node arena's backing memory is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocPolicy {
    /// Plain zeroed allocation at the node's natural (cache line) alignment.
    #[default]
    Normal,
    /// Zeroed allocation aligned and sized to the huge page granularity,
    /// with the kernel advised to back it with huge pages.
    HugePages,
}

/// Contiguous, fixed-length buffer of [`Node`]s, allocated once per run.
pub struct NodeArena {
    ptr: NonNull<Node>,
    len: usize,
    layout: Option<Layout>,
}

impl NodeArena {
    /// Allocate `len` zero-initialized nodes. Fails with
    /// [`Error::Allocation`] when the system refuses the request; there is
    /// no retry path, callers are expected to abort.
    pub fn new(len: usize, policy: AllocPolicy) -> Result<Self, Error> {
        if len == 0 {
            return Ok(NodeArena {
                ptr: NonNull::dangling(),
                len: 0,
                layout: None,
            });
        }

        let bytes = len * size_of::<Node>();
        let (size, align) = match policy {
            AllocPolicy::Normal => (bytes, align_of::<Node>()),
            // The kernel only promotes a mapping when it spans whole huge
            // pages, so round the request up; the slack would be dead space
            // inside a huge page either way.
            AllocPolicy::HugePages => (bytes.next_multiple_of(HUGEPAGE_SIZE), HUGEPAGE_SIZE),
        };
        let layout =
            Layout::from_size_align(size, align).map_err(|_| Error::Allocation("linked list"))?;

        let raw = unsafe { alloc::alloc_zeroed(layout) }.cast::<Node>();
        let Some(ptr) = NonNull::new(raw) else {
            return Err(Error::Allocation("linked list"));
        };

        if policy == AllocPolicy::HugePages {
            advise_huge_pages(raw.cast(), size);
        }

        debug!(
            "arena of {} nodes allocated ({}, {:?})",
            len,
            crate::format_size(size as f32),
            policy
        );

        Ok(NodeArena {
            ptr,
            len,
            layout: Some(layout),
        })
    }

    /// Wire each node's successor from the permutation table. The index that
    /// holds value 0 marks where the cycle is broken: `NonZeroUsize::new`
    /// maps it straight to the `None` terminal. Relinking from the same
    /// table reproduces the identical topology.
    ///
    /// A table that doesn't cover the arena would leave trailing nodes as
    /// extra terminals, so the lengths must match. The check runs once,
    /// outside any timed region.
    pub fn link(&mut self, table: &[usize]) {
        assert_eq!(
            table.len(),
            self.len,
            "permutation table must cover the arena"
        );
        for (node, &next) in self.as_mut_slice().iter_mut().zip(table) {
            node.next = NonZeroUsize::new(next);
        }
    }

    /// Total bytes the chain traversal touches.
    pub fn footprint_bytes(&self) -> usize {
        self.len * size_of::<Node>()
    }

    fn as_mut_slice(&mut self) -> &mut [Node] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Deref for NodeArena {
    type Target = [Node];

    fn deref(&self) -> &[Node] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for NodeArena {
    fn drop(&mut self) {
        if let Some(layout) = self.layout {
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

/// Ask the kernel to back the region with huge pages. Advisory only: the
/// traversal is correct either way.
#[cfg(target_os = "linux")]
fn advise_huge_pages(addr: *mut u8, size: usize) {
    unsafe {
        libc::madvise(addr.cast(), size, libc::MADV_HUGEPAGE);
    }
}

#[cfg(not(target_os = "linux"))]
fn advise_huge_pages(_addr: *mut u8, _size: usize) {}

/// Identity index table `[0, 1, .., len-1]`, the permutation's starting
/// point. Allocation is checked so an oversized request reports cleanly
/// instead of aborting inside the allocator.
pub fn identity_table(len: usize) -> Result<Vec<usize>, Error> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation("indices array"))?;
    table.extend(0..len);
    Ok(table)
}
