//! Per-analysis supplies and the per-event checker view.

use ebb_diagnostic::{BugReport, DiagnosticSink};
use ebb_sym::{
    FnDecl, FnDeclId, MemSpace, Name, NodeId, ProgPoint, RegionId, RegionTable, StringInterner,
    Symbol,
};

use crate::state::ProgramState;

/// Whether a path node continues exploration or ends it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A normal successor: exploration continues from here.
    Normal,
    /// A sink: no successors are explored past this node.
    Sink,
}

/// One node of the exploration graph, as produced by a checker event.
#[derive(Clone, Debug)]
pub struct PathNode {
    pub id: NodeId,
    pub point: ProgPoint,
    pub kind: NodeKind,
    pub state: ProgramState,
}

impl PathNode {
    pub fn is_sink(&self) -> bool {
        self.kind == NodeKind::Sink
    }
}

/// Analysis-lifetime supplies: the interner, the region arena, declared
/// functions, and the symbol/node id wells.
///
/// One `ExecContext` serves every path of an analysis; per-path data lives
/// in [`ProgramState`]. Nothing here is lazily initialized and nothing is a
/// hidden static — construction gives a fully formed context.
pub struct ExecContext {
    interner: StringInterner,
    regions: RegionTable,
    fn_decls: Vec<FnDecl>,
    next_symbol: u32,
    next_node: u32,
}

impl ExecContext {
    pub fn new() -> Self {
        ExecContext {
            interner: StringInterner::new(),
            regions: RegionTable::new(),
            fn_decls: Vec::new(),
            next_symbol: 0,
            next_node: 0,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Intern a name through the context's interner.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut RegionTable {
        &mut self.regions
    }

    /// Register a function declaration.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` declarations are registered.
    pub fn declare_fn(&mut self, decl: FnDecl) -> FnDeclId {
        let Ok(raw) = u32::try_from(self.fn_decls.len()) else {
            panic!("declaration arena exceeded capacity");
        };
        self.fn_decls.push(decl);
        FnDeclId::from_raw(raw)
    }

    pub fn fn_decl(&self, id: FnDeclId) -> &FnDecl {
        &self.fn_decls[id.raw() as usize]
    }

    /// Mint a fresh symbol.
    pub fn conjure_symbol(&mut self) -> Symbol {
        let sym = Symbol::from_raw(self.next_symbol);
        self.next_symbol += 1;
        sym
    }

    /// Conjure a fresh symbol together with its symbolic region.
    ///
    /// Conjured allocation results live in [`MemSpace::Unknown`]: memory
    /// returned by an allocator the current function did not define cannot
    /// be placed more precisely.
    pub fn conjure_region(&mut self) -> (Symbol, RegionId) {
        let sym = self.conjure_symbol();
        let region = self.regions.symbolic(sym, MemSpace::Unknown);
        (sym, region)
    }

    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId::from_raw(self.next_node);
        self.next_node += 1;
        id
    }
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The view a checker works through during one analysis event.
///
/// Carries the incoming state, the current program point, and the outlets:
/// successor nodes and the diagnostic sink. A checker reads the state,
/// computes successor states, and commits them via [`add_transition`],
/// [`generate_node`], or [`generate_sink`]; it never mutates the incoming
/// state in place.
///
/// [`add_transition`]: CheckerContext::add_transition
/// [`generate_node`]: CheckerContext::generate_node
/// [`generate_sink`]: CheckerContext::generate_sink
pub struct CheckerContext<'a> {
    ecx: &'a mut ExecContext,
    sink: &'a mut dyn DiagnosticSink,
    state: ProgramState,
    point: ProgPoint,
    nodes: Vec<PathNode>,
}

impl<'a> CheckerContext<'a> {
    pub fn new(
        ecx: &'a mut ExecContext,
        sink: &'a mut dyn DiagnosticSink,
        state: ProgramState,
        point: ProgPoint,
    ) -> Self {
        CheckerContext {
            ecx,
            sink,
            state,
            point,
            nodes: Vec::new(),
        }
    }

    /// The state this event fired with.
    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    /// The program point this event fired at.
    pub fn point(&self) -> ProgPoint {
        self.point
    }

    pub fn interner(&self) -> &StringInterner {
        self.ecx.interner()
    }

    pub fn regions(&self) -> &RegionTable {
        self.ecx.regions()
    }

    pub fn fn_decl(&self, id: FnDeclId) -> &FnDecl {
        self.ecx.fn_decl(id)
    }

    /// Conjure a fresh symbol and symbolic region for a call result.
    pub fn conjure_region(&mut self) -> (Symbol, RegionId) {
        self.ecx.conjure_region()
    }

    /// Commit a normal successor carrying `state`.
    ///
    /// Returns `None` when the engine judges the branch infeasible; this
    /// rendition always succeeds.
    pub fn add_transition(&mut self, state: ProgramState) -> Option<NodeId> {
        self.commit(state, NodeKind::Normal)
    }

    /// Generate an interior node for anchoring a report. Exploration
    /// continues through it.
    pub fn generate_node(&mut self, state: ProgramState) -> Option<NodeId> {
        self.commit(state, NodeKind::Normal)
    }

    /// Generate a sink: the path ends here.
    pub fn generate_sink(&mut self, state: ProgramState) -> Option<NodeId> {
        self.commit(state, NodeKind::Sink)
    }

    fn commit(&mut self, state: ProgramState, kind: NodeKind) -> Option<NodeId> {
        let id = self.ecx.next_node_id();
        self.nodes.push(PathNode {
            id,
            point: self.point,
            kind,
            state,
        });
        Some(id)
    }

    /// Hand a report to the diagnostic sink.
    pub fn report(&mut self, report: BugReport) {
        self.sink.report(report);
    }

    /// The nodes committed so far during this event.
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Consume the context, yielding the committed nodes.
    pub fn into_nodes(self) -> Vec<PathNode> {
        self.nodes
    }

    /// The states of non-sink successors, in commit order.
    ///
    /// The driver continues exploration from exactly these.
    pub fn successor_states(&self) -> Vec<ProgramState> {
        self.nodes
            .iter()
            .filter(|n| !n.is_sink())
            .map(|n| n.state.clone())
            .collect()
    }
}
