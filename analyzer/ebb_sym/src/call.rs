//! Declarations, call expressions, and program points.

use std::fmt;

use smallvec::SmallVec;

use crate::{Name, OwnershipAttr, Span};

/// Index of an expression in the analyzed function.
///
/// The execution core evaluates expressions to values per path; checkers
/// only ever look values up by `ExprId`, never at syntax.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ExprId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Index of a function declaration in the execution core's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct FnDeclId(u32);

impl FnDeclId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FnDeclId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FnDeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn{}", self.0)
    }
}

/// A function declaration as checkers see it: a canonical name plus its
/// ownership attributes, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FnDecl {
    pub name: Name,
    pub attrs: SmallVec<[OwnershipAttr; 2]>,
}

impl FnDecl {
    pub fn new(name: Name) -> Self {
        FnDecl {
            name,
            attrs: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, attr: OwnershipAttr) -> Self {
        self.attrs.push(attr);
        self
    }
}

/// A call expression at an analysis event.
///
/// `decl` is the declaration the callee resolved to; `None` models an
/// indirect call, which no checker can classify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    /// The call expression itself (its result value is bound to this id).
    pub expr: ExprId,
    /// The resolved callee declaration, if any.
    pub decl: Option<FnDeclId>,
    /// Argument expressions in call order.
    pub args: SmallVec<[ExprId; 4]>,
}

impl CallExpr {
    pub fn new(
        expr: ExprId,
        decl: Option<FnDeclId>,
        args: impl IntoIterator<Item = ExprId>,
    ) -> Self {
        CallExpr {
            expr,
            decl,
            args: args.into_iter().collect(),
        }
    }

    /// The argument expression at `index`, if the call has one.
    pub fn arg(&self, index: usize) -> Option<ExprId> {
        self.args.get(index).copied()
    }
}

/// Identity of a node in the exploration graph.
///
/// Nodes are minted by the execution core when a checker commits a
/// transition; diagnostics anchor to them. A sink node has an id like any
/// other — the distinction lives on the node itself.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A program point: the statement or expression an event fired at.
///
/// Lifecycle states and diagnostics anchor here. Equality is by id and
/// span, so two states entered at the same point compare equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgPoint {
    pub id: u32,
    pub span: Span,
}

impl ProgPoint {
    /// Synthesized point for events with no source anchor.
    pub const DUMMY: ProgPoint = ProgPoint {
        id: 0,
        span: Span::DUMMY,
    };

    pub const fn new(id: u32, span: Span) -> Self {
        ProgPoint { id, span }
    }
}

impl fmt::Debug for ProgPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}@{:?}", self.id, self.span)
    }
}
