//! Base data model for the Ebb analyzer.
//!
//! This crate defines the vocabulary shared by the path-sensitive execution
//! core and the checkers that plug into it:
//!
//! - **Interned names** ([`Name`], [`StringInterner`]) — identity-comparable
//!   tokens for identifiers, used once per reserved allocator name and cached.
//! - **Symbols** ([`Symbol`]) — opaque path-scoped handles denoting one
//!   abstractly-tracked value, conjured at allocation sites.
//! - **Symbolic values** ([`SVal`], [`Loc`]) — the classification of a value
//!   into null, unknown, undefined, concrete integer, concrete address,
//!   label address, or region.
//! - **Regions** ([`Region`], [`RegionTable`], [`MemSpace`]) — where a
//!   value's storage lives, with cast/element stripping and base resolution.
//! - **Declarations** ([`FnDecl`], [`CallExpr`], [`OwnershipAttr`]) — the
//!   call-site surface the checkers classify, including declarative
//!   ownership-transfer attributes.
//!
//! Everything here is plain data: no path state, no diagnostics. Those live
//! in `ebb_exec` and `ebb_diagnostic`.

pub mod attr;
pub mod call;
pub mod interner;
pub mod name;
pub mod region;
pub mod span;
pub mod sval;
pub mod symbol;

pub use attr::{OwnershipAttr, OwnershipKind};
pub use call::{CallExpr, ExprId, FnDecl, FnDeclId, NodeId, ProgPoint};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use region::{MemSpace, Region, RegionId, RegionTable};
pub use span::Span;
pub use sval::{Loc, SVal};
pub use symbol::Symbol;
