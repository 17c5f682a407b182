//! Object-list network
//!
//! The network is a flat list of objects indexed by [`ObjId`]. Object 0 is
//! always the constant-1 node. Every other object is a primary input/output,
//! a latch with its input/output boxes, or a two-input AND node. Inversions
//! live on fanin edges, one bit per edge.
//!
//! A freshly read network is [`NetworkKind::Logic`]: nodes are stored as
//! written, without structural hashing, and need not be in topological
//! order. [`crate::strash`] turns it into a [`NetworkKind::Strash`] network
//! whose AND nodes are hashed and topologically ordered.

use crate::error::{SynthError, SynthResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for a network object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjId(pub u32);

impl ObjId {
    /// The constant-1 node
    pub const CONST1: ObjId = ObjId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fanin edge: driving object plus inversion bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fanin {
    /// The driving object
    pub id: ObjId,
    /// Whether the edge is complemented
    pub complemented: bool,
}

impl Fanin {
    /// Positive reference to an object
    pub fn new(id: ObjId) -> Self {
        Self {
            id,
            complemented: false,
        }
    }

    /// Complemented reference to an object
    pub fn not(id: ObjId) -> Self {
        Self {
            id,
            complemented: true,
        }
    }

    pub fn const1() -> Self {
        Self::new(ObjId::CONST1)
    }

    pub fn const0() -> Self {
        Self::not(ObjId::CONST1)
    }

    /// Invert this reference
    pub fn invert(self) -> Self {
        Self {
            id: self.id,
            complemented: !self.complemented,
        }
    }

    /// Conditionally invert this reference
    pub fn invert_if(self, cond: bool) -> Self {
        if cond {
            self.invert()
        } else {
            self
        }
    }

    pub fn is_const(&self) -> bool {
        self.id == ObjId::CONST1
    }

    /// Constant value if this references the constant node
    pub fn const_value(&self) -> Option<bool> {
        if self.is_const() {
            Some(!self.complemented)
        } else {
            None
        }
    }
}

/// Object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjKind {
    /// Constant-1 node (object 0)
    Const1,
    /// Primary input
    Pi,
    /// Primary output
    Po,
    /// Latch input box (combinational output)
    Bi,
    /// Latch output box (combinational input)
    Bo,
    /// Two-input AND node
    Node,
    /// Sequential element between a `Bi` and a `Bo`
    Latch,
}

impl ObjKind {
    /// Combinational output: primary output or latch input
    pub fn is_co(self) -> bool {
        matches!(self, ObjKind::Po | ObjKind::Bi)
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjKind::Const1 => "CONST1",
            ObjKind::Pi => "PI",
            ObjKind::Po => "PO",
            ObjKind::Bi => "BI",
            ObjKind::Bo => "BO",
            ObjKind::Node => "NODE",
            ObjKind::Latch => "LATCH",
        }
    }
}

impl fmt::Display for ObjKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A network object
#[derive(Debug, Clone)]
pub struct Obj {
    pub kind: ObjKind,
    pub fanins: Vec<Fanin>,
    /// Name for inputs, outputs and latches
    pub name: Option<String>,
}

impl Obj {
    fn new(kind: ObjKind, fanins: Vec<Fanin>, name: Option<String>) -> Self {
        Self {
            kind,
            fanins,
            name,
        }
    }

    pub fn is_node(&self) -> bool {
        self.kind == ObjKind::Node
    }

    pub fn fanin0(&self) -> Option<Fanin> {
        self.fanins.first().copied()
    }

    /// Number of complemented fanin edges
    pub fn num_complemented(&self) -> usize {
        self.fanins.iter().filter(|f| f.complemented).count()
    }
}

/// The three objects that make up one latch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatchBox {
    pub bi: ObjId,
    pub latch: ObjId,
    pub bo: ObjId,
    /// Initial value, `None` when unknown
    pub init: Option<bool>,
}

/// Whether AND nodes have been structurally hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkKind {
    /// Read from a file, nodes stored as written
    Logic,
    /// Structurally hashed and topologically ordered
    Strash,
}

/// Object-list network
#[derive(Debug, Clone)]
pub struct Network {
    /// Design name
    pub name: String,
    kind: NetworkKind,
    objs: Vec<Obj>,
    pis: Vec<ObjId>,
    pos: Vec<ObjId>,
    latches: Vec<LatchBox>,
    /// Structural hash for AND nodes, only used on strashed networks
    strash_map: HashMap<(Fanin, Fanin), ObjId>,
}

impl Network {
    /// Create an empty network holding only the constant node
    pub fn new(name: impl Into<String>, kind: NetworkKind) -> Self {
        Self {
            name: name.into(),
            kind,
            objs: vec![Obj::new(ObjKind::Const1, Vec::new(), None)],
            pis: Vec::new(),
            pos: Vec::new(),
            latches: Vec::new(),
            strash_map: HashMap::new(),
        }
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    pub fn is_strashed(&self) -> bool {
        self.kind == NetworkKind::Strash
    }

    /// Total object count, including the constant node
    pub fn num_objects(&self) -> usize {
        self.objs.len()
    }

    pub fn num_pis(&self) -> usize {
        self.pis.len()
    }

    pub fn num_pos(&self) -> usize {
        self.pos.len()
    }

    pub fn num_latches(&self) -> usize {
        self.latches.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.objs.iter().filter(|o| o.is_node()).count()
    }

    pub fn is_sequential(&self) -> bool {
        !self.latches.is_empty()
    }

    pub fn obj(&self, id: ObjId) -> Option<&Obj> {
        self.objs.get(id.index())
    }

    pub fn pis(&self) -> &[ObjId] {
        &self.pis
    }

    pub fn pos(&self) -> &[ObjId] {
        &self.pos
    }

    pub fn latches(&self) -> &[LatchBox] {
        &self.latches
    }

    /// Iterate over all objects in id order
    pub fn iter_objects(&self) -> impl Iterator<Item = (ObjId, &Obj)> {
        self.objs
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjId(i as u32), o))
    }

    /// Iterate over AND nodes in id order
    pub fn iter_nodes(&self) -> impl Iterator<Item = (ObjId, &Obj)> + '_ {
        self.iter_objects().filter(|(_, o)| o.is_node())
    }

    /// Combinational outputs: primary outputs, then latch inputs
    pub fn cos(&self) -> impl Iterator<Item = ObjId> + '_ {
        self.pos
            .iter()
            .copied()
            .chain(self.latches.iter().map(|l| l.bi))
    }

    /// Combinational inputs: primary inputs, then latch outputs
    pub fn cis(&self) -> impl Iterator<Item = ObjId> + '_ {
        self.pis
            .iter()
            .copied()
            .chain(self.latches.iter().map(|l| l.bo))
    }

    fn push(&mut self, obj: Obj) -> ObjId {
        let id = ObjId(self.objs.len() as u32);
        self.objs.push(obj);
        id
    }

    /// Add a primary input
    pub fn add_pi(&mut self, name: impl Into<String>) -> ObjId {
        let id = self.push(Obj::new(ObjKind::Pi, Vec::new(), Some(name.into())));
        self.pis.push(id);
        id
    }

    /// Add a primary output; the driver may be filled in later with [`Network::set_fanins`]
    pub fn add_po(&mut self, name: impl Into<String>, driver: Option<Fanin>) -> ObjId {
        let fanins = driver.into_iter().collect();
        let id = self.push(Obj::new(ObjKind::Po, fanins, Some(name.into())));
        self.pos.push(id);
        id
    }

    /// Add a latch as `Bi -> Latch -> Bo`; the `Bi` driver is set later
    pub fn add_latch(&mut self, name: impl Into<String>, init: Option<bool>) -> LatchBox {
        let name = name.into();
        let bi = self.push(Obj::new(ObjKind::Bi, Vec::new(), Some(format!("{name}_in"))));
        let latch = self.push(Obj::new(
            ObjKind::Latch,
            vec![Fanin::new(bi)],
            Some(name.clone()),
        ));
        let bo = self.push(Obj::new(
            ObjKind::Bo,
            vec![Fanin::new(latch)],
            Some(name),
        ));
        let lbox = LatchBox {
            bi,
            latch,
            bo,
            init,
        };
        self.latches.push(lbox);
        lbox
    }

    /// Add an AND node without hashing or simplification
    pub fn add_node_raw(&mut self, fanins: Vec<Fanin>) -> ObjId {
        self.push(Obj::new(ObjKind::Node, fanins, None))
    }

    /// Add an AND node with structural hashing and trivial simplification
    pub fn add_and(&mut self, mut left: Fanin, mut right: Fanin) -> Fanin {
        if left.id > right.id {
            std::mem::swap(&mut left, &mut right);
        }

        // a & 0 = 0, a & 1 = a
        match left.const_value() {
            Some(false) => return Fanin::const0(),
            Some(true) => return right,
            None => {}
        }
        // a & a = a
        if left == right {
            return left;
        }
        // a & !a = 0
        if left.id == right.id {
            return Fanin::const0();
        }

        let key = (left, right);
        if let Some(&existing) = self.strash_map.get(&key) {
            return Fanin::new(existing);
        }
        let id = self.add_node_raw(vec![left, right]);
        self.strash_map.insert(key, id);
        Fanin::new(id)
    }

    /// OR through De Morgan: `a | b = !(!a & !b)`
    pub fn add_or(&mut self, left: Fanin, right: Fanin) -> Fanin {
        self.add_and(left.invert(), right.invert()).invert()
    }

    /// Replace the fanins of an object
    pub fn set_fanins(&mut self, id: ObjId, fanins: Vec<Fanin>) -> SynthResult<()> {
        let obj = self
            .objs
            .get_mut(id.index())
            .ok_or(SynthError::DanglingReference(id.index()))?;
        obj.fanins = fanins;
        Ok(())
    }

    /// Check that every fanin references an existing object and that
    /// nodes, outputs and latch boxes have the expected fanin counts
    pub fn check_structure(&self) -> SynthResult<()> {
        for (id, obj) in self.iter_objects() {
            for f in &obj.fanins {
                if f.id.index() >= self.objs.len() {
                    return Err(SynthError::DanglingReference(f.id.index()));
                }
            }
            let expected = match obj.kind {
                ObjKind::Const1 | ObjKind::Pi => 0,
                ObjKind::Node => 2,
                ObjKind::Po | ObjKind::Bi | ObjKind::Bo | ObjKind::Latch => 1,
            };
            if obj.fanins.len() != expected {
                return Err(SynthError::BadFaninCount {
                    kind: obj.kind.to_string(),
                    id: id.index(),
                    count: obj.fanins.len(),
                });
            }
        }
        Ok(())
    }

    /// AND nodes in the transitive fanin of `roots`, fanins before fanouts.
    ///
    /// Traversal stops at combinational inputs and the constant node. With
    /// `include_dangling`, nodes outside every cone are appended in id order.
    pub fn topological_nodes(
        &self,
        roots: &[ObjId],
        include_dangling: bool,
    ) -> SynthResult<Vec<ObjId>> {
        const UNSEEN: u8 = 0;
        const OPEN: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNSEEN; self.objs.len()];
        let mut order = Vec::new();

        let mut starts: Vec<ObjId> = roots.to_vec();
        if include_dangling {
            starts.extend(self.iter_nodes().map(|(id, _)| id));
        }

        for start in starts {
            let mut stack: Vec<(ObjId, bool)> = vec![(start, false)];
            while let Some((id, expanded)) = stack.pop() {
                let obj = self
                    .obj(id)
                    .ok_or(SynthError::DanglingReference(id.index()))?;
                if !obj.is_node() {
                    // Walk through outputs to their drivers, stop at inputs
                    if obj.kind.is_co() {
                        stack.extend(obj.fanins.iter().map(|f| (f.id, false)));
                    }
                    continue;
                }
                if expanded {
                    state[id.index()] = DONE;
                    order.push(id);
                    continue;
                }
                match state[id.index()] {
                    DONE => continue,
                    OPEN => return Err(SynthError::CombinationalCycle(id.index())),
                    _ => {}
                }
                state[id.index()] = OPEN;
                stack.push((id, true));
                for f in obj.fanins.iter().rev() {
                    match state.get(f.id.index()) {
                        None => return Err(SynthError::DanglingReference(f.id.index())),
                        Some(&OPEN) => {
                            return Err(SynthError::CombinationalCycle(f.id.index()))
                        }
                        Some(&DONE) => {}
                        Some(_) => stack.push((f.id, false)),
                    }
                }
            }
        }

        Ok(order)
    }

    /// Fanout lists; node fanouts come before output fanouts
    pub fn fanouts(&self) -> Vec<Vec<ObjId>> {
        let mut fanouts = vec![Vec::new(); self.objs.len()];
        for (id, obj) in self.iter_nodes() {
            for f in &obj.fanins {
                fanouts[f.id.index()].push(id);
            }
        }
        for (id, obj) in self.iter_objects().filter(|(_, o)| !o.is_node()) {
            for f in &obj.fanins {
                fanouts[f.id.index()].push(id);
            }
        }
        fanouts
    }

    /// Logic level of every object; inputs and constants sit at level 0
    pub fn levels(&self) -> SynthResult<Vec<u32>> {
        let roots: Vec<ObjId> = self.cos().collect();
        let order = self.topological_nodes(&roots, true)?;
        let mut levels = vec![0u32; self.objs.len()];
        for id in order {
            let obj = &self.objs[id.index()];
            let level = obj
                .fanins
                .iter()
                .map(|f| levels[f.id.index()])
                .max()
                .unwrap_or(0);
            levels[id.index()] = level + 1;
        }
        Ok(levels)
    }

    /// Maximum logic level over all combinational outputs
    pub fn depth(&self) -> SynthResult<u32> {
        let levels = self.levels()?;
        Ok(self
            .cos()
            .filter_map(|co| self.obj(co).and_then(|o| o.fanin0()))
            .map(|f| levels[f.id.index()])
            .max()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and2() -> (Network, ObjId, ObjId, Fanin) {
        let mut ntk = Network::new("and2", NetworkKind::Strash);
        let a = ntk.add_pi("a");
        let b = ntk.add_pi("b");
        let y = ntk.add_and(Fanin::new(a), Fanin::not(b));
        ntk.add_po("y", Some(y));
        (ntk, a, b, y)
    }

    #[test]
    fn test_network_creation() {
        let ntk = Network::new("test", NetworkKind::Logic);
        assert_eq!(ntk.num_objects(), 1);
        assert_eq!(ntk.obj(ObjId::CONST1).unwrap().kind, ObjKind::Const1);
        assert!(!ntk.is_strashed());
    }

    #[test]
    fn test_add_and_hashing() {
        let mut ntk = Network::new("test", NetworkKind::Strash);
        let a = ntk.add_pi("a");
        let b = ntk.add_pi("b");

        let x = ntk.add_and(Fanin::new(a), Fanin::new(b));
        let y = ntk.add_and(Fanin::new(b), Fanin::new(a));
        assert_eq!(x, y);
        assert_eq!(ntk.num_nodes(), 1);
    }

    #[test]
    fn test_add_and_trivial_cases() {
        let mut ntk = Network::new("test", NetworkKind::Strash);
        let a = Fanin::new(ntk.add_pi("a"));

        assert_eq!(ntk.add_and(a, Fanin::const0()), Fanin::const0());
        assert_eq!(ntk.add_and(a, Fanin::const1()), a);
        assert_eq!(ntk.add_and(a, a), a);
        assert_eq!(ntk.add_and(a, a.invert()), Fanin::const0());
        assert_eq!(ntk.num_nodes(), 0);
    }

    #[test]
    fn test_latch_boxes() {
        let mut ntk = Network::new("seq", NetworkKind::Logic);
        let d = ntk.add_pi("d");
        let l = ntk.add_latch("q", Some(false));
        ntk.set_fanins(l.bi, vec![Fanin::new(d)]).unwrap();
        ntk.add_po("q", Some(Fanin::new(l.bo)));

        assert!(ntk.is_sequential());
        assert_eq!(ntk.obj(l.bi).unwrap().kind, ObjKind::Bi);
        assert_eq!(ntk.obj(l.bo).unwrap().fanin0(), Some(Fanin::new(l.latch)));
        assert_eq!(ntk.cis().count(), 2);
        assert_eq!(ntk.cos().count(), 2);
        assert!(ntk.check_structure().is_ok());
    }

    #[test]
    fn test_check_structure_rejects_missing_driver() {
        let mut ntk = Network::new("bad", NetworkKind::Logic);
        ntk.add_po("y", None);
        assert!(matches!(
            ntk.check_structure(),
            Err(SynthError::BadFaninCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_topological_nodes_detects_cycle() {
        let mut ntk = Network::new("loop", NetworkKind::Logic);
        let a = ntk.add_pi("a");
        let n1 = ntk.add_node_raw(Vec::new());
        let n2 = ntk.add_node_raw(vec![Fanin::new(a), Fanin::new(n1)]);
        ntk.set_fanins(n1, vec![Fanin::new(a), Fanin::new(n2)])
            .unwrap();
        let po = ntk.add_po("y", Some(Fanin::new(n2)));

        let result = ntk.topological_nodes(&[po], false);
        assert!(matches!(result, Err(SynthError::CombinationalCycle(_))));
    }

    #[test]
    fn test_levels_and_depth() {
        let mut ntk = Network::new("chain", NetworkKind::Strash);
        let a = Fanin::new(ntk.add_pi("a"));
        let b = Fanin::new(ntk.add_pi("b"));
        let c = Fanin::new(ntk.add_pi("c"));
        let ab = ntk.add_and(a, b);
        let abc = ntk.add_and(ab, c);
        ntk.add_po("y", Some(abc));

        assert_eq!(ntk.depth().unwrap(), 2);
    }

    #[test]
    fn test_fanouts_nodes_first() {
        let (mut ntk, _a, _b, y) = and2();
        let c = ntk.add_pi("c");
        let z = ntk.add_and(y, Fanin::new(c));
        ntk.add_po("z", Some(z));

        let fanouts = ntk.fanouts();
        // y feeds the PO (lower id) and node z; z must come first
        assert_eq!(fanouts[y.id.index()][0], z.id);
        assert_eq!(fanouts[y.id.index()].len(), 2);
    }
}
