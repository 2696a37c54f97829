//! Memory regions and memory-space classification.
//!
//! Regions answer "where does this value's storage live". The allocation
//! checker only ever asks three questions of a region: what is its base
//! (stripping casts, element offsets, and field projections), which memory
//! space does that base live in, and is the base a symbolic allocation. The
//! table is an append-only arena; [`RegionId`]s are stable for the lifetime
//! of an analysis.

use std::fmt;

use crate::{Name, SVal, Symbol};

/// Index of a region in a [`RegionTable`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct RegionId(u32);

impl RegionId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        RegionId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Where a base region's storage lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemSpace {
    /// Locals of the current stack frame.
    StackLocals,
    /// Arguments of the current stack frame.
    StackArguments,
    /// File-scope or function-scope `static` storage.
    GlobalStatic,
    /// Non-static global storage.
    GlobalNonStatic,
    /// Heap storage.
    Heap,
    /// Storage the engine cannot place. Conjured allocation results live
    /// here; memory allocated outside the analyzed function may too.
    Unknown,
    /// Code: the text of a function or block.
    FunctionText,
    /// Captured data of a block/closure.
    BlockData,
}

/// A memory region.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// A region conjured for a symbolic value, e.g. an allocation result.
    Symbolic { symbol: Symbol, space: MemSpace },
    /// A named variable.
    Var { name: Name, space: MemSpace },
    /// The text of a named function.
    FunctionText { name: Option<Name> },
    /// The text of a block.
    BlockText,
    /// The captured-variable data of a block/closure.
    BlockData,
    /// Stack memory obtained from `alloca()`.
    Alloca,
    /// An element (index) within a base region.
    Element { base: RegionId },
    /// A cast view of a base region.
    Cast { base: RegionId },
    /// A named field within a base region.
    Field { base: RegionId, name: Name },
}

/// Append-only arena of regions.
#[derive(Default)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    /// Panics if the table exceeds `u32::MAX` regions.
    fn add(&mut self, region: Region) -> RegionId {
        let Ok(raw) = u32::try_from(self.regions.len()) else {
            panic!("region table exceeded capacity: {} regions", self.regions.len());
        };
        self.regions.push(region);
        RegionId(raw)
    }

    /// Conjure a symbolic region for `symbol` in `space`.
    pub fn symbolic(&mut self, symbol: Symbol, space: MemSpace) -> RegionId {
        self.add(Region::Symbolic { symbol, space })
    }

    /// A named variable region in `space`.
    pub fn var(&mut self, name: Name, space: MemSpace) -> RegionId {
        self.add(Region::Var { name, space })
    }

    /// The text region of a function.
    pub fn function_text(&mut self, name: Option<Name>) -> RegionId {
        self.add(Region::FunctionText { name })
    }

    /// The text region of a block.
    pub fn block_text(&mut self) -> RegionId {
        self.add(Region::BlockText)
    }

    /// The captured-data region of a block.
    pub fn block_data(&mut self) -> RegionId {
        self.add(Region::BlockData)
    }

    /// A region produced by `alloca()`.
    pub fn alloca(&mut self) -> RegionId {
        self.add(Region::Alloca)
    }

    /// An element region over `base`.
    pub fn element(&mut self, base: RegionId) -> RegionId {
        self.add(Region::Element { base })
    }

    /// A cast view of `base`.
    pub fn cast(&mut self, base: RegionId) -> RegionId {
        self.add(Region::Cast { base })
    }

    /// A field projection of `base`.
    pub fn field(&mut self, base: RegionId, name: Name) -> RegionId {
        self.add(Region::Field { base, name })
    }

    /// The region data behind an id.
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    /// Strip cast views, leaving element and field projections in place.
    pub fn strip_casts(&self, mut id: RegionId) -> RegionId {
        while let Region::Cast { base } = self.region(id) {
            id = *base;
        }
        id
    }

    /// Resolve to the base region, stripping casts, element offsets, and
    /// field projections.
    pub fn base_region(&self, mut id: RegionId) -> RegionId {
        loop {
            match self.region(id) {
                Region::Cast { base } | Region::Element { base } | Region::Field { base, .. } => {
                    id = *base;
                }
                _ => return id,
            }
        }
    }

    /// The memory space of a region's base.
    pub fn memory_space(&self, id: RegionId) -> MemSpace {
        match self.region(self.base_region(id)) {
            Region::Symbolic { space, .. } | Region::Var { space, .. } => *space,
            Region::FunctionText { .. } | Region::BlockText => MemSpace::FunctionText,
            Region::BlockData => MemSpace::BlockData,
            Region::Alloca => MemSpace::Unknown,
            // base_region never returns a derived region.
            Region::Cast { .. } | Region::Element { .. } | Region::Field { .. } => MemSpace::Unknown,
        }
    }

    /// The symbol of a region whose base is symbolic.
    pub fn base_symbol(&self, id: RegionId) -> Option<Symbol> {
        match self.region(self.base_region(id)) {
            Region::Symbolic { symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    /// The symbol a location value points at through its base region.
    pub fn loc_symbol_in_base(&self, val: &SVal) -> Option<Symbol> {
        val.as_region().and_then(|r| self.base_symbol(r))
    }
}
