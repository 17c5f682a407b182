//! Structural hashing
//!
//! Rebuilds a network with structural hashing enabled, merging structurally
//! identical AND nodes and folding constants. The rebuilt network lists the
//! constant node, primary inputs, primary outputs and latch boxes first,
//! followed by AND nodes in topological order.
//!
//! Rebuilding also validates the structure: undriven outputs, dangling
//! references and combinational cycles are rejected, which makes `strash`
//! the structural check run after every read.

use crate::error::{SynthError, SynthResult};
use crate::network::{Fanin, Network, NetworkKind, ObjId};
use indexmap::IndexMap;
use tracing::debug;

/// Options for [`rebuild`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildOptions {
    /// Hash AND nodes and fold constants
    pub hash: bool,
    /// Keep AND nodes outside every output cone
    pub keep_dangling: bool,
}

impl Default for RebuildOptions {
    fn default() -> Self {
        Self {
            hash: true,
            keep_dangling: false,
        }
    }
}

/// Structurally hash a network, dropping dangling nodes
pub fn strash(ntk: &Network) -> SynthResult<Network> {
    rebuild(ntk, RebuildOptions::default())
}

/// Remove dangling AND nodes, keeping the network kind
pub fn cleanup(ntk: &Network) -> SynthResult<Network> {
    rebuild(
        ntk,
        RebuildOptions {
            hash: ntk.is_strashed(),
            keep_dangling: false,
        },
    )
}

/// Rebuild a network into a fresh object list
pub fn rebuild(ntk: &Network, options: RebuildOptions) -> SynthResult<Network> {
    ntk.check_structure()?;

    let kind = if options.hash {
        NetworkKind::Strash
    } else {
        ntk.kind()
    };
    let mut new = Network::new(ntk.name.clone(), kind);
    let mut map: IndexMap<ObjId, Fanin> = IndexMap::new();
    map.insert(ObjId::CONST1, Fanin::const1());

    for &pi in ntk.pis() {
        let name = ntk.obj(pi).and_then(|o| o.name.clone()).unwrap_or_default();
        map.insert(pi, Fanin::new(new.add_pi(name)));
    }

    // Outputs are created before the logic they read; drivers are set at the end
    let mut new_pos = Vec::with_capacity(ntk.num_pos());
    for &po in ntk.pos() {
        let name = ntk.obj(po).and_then(|o| o.name.clone()).unwrap_or_default();
        new_pos.push((po, new.add_po(name, None)));
    }

    let mut new_latches = Vec::with_capacity(ntk.num_latches());
    for lbox in ntk.latches() {
        let name = ntk
            .obj(lbox.latch)
            .and_then(|o| o.name.clone())
            .unwrap_or_default();
        let fresh = new.add_latch(name, lbox.init);
        map.insert(lbox.bo, Fanin::new(fresh.bo));
        new_latches.push((lbox.bi, fresh.bi));
    }

    let roots: Vec<ObjId> = ntk.cos().collect();
    let order = ntk.topological_nodes(&roots, options.keep_dangling)?;

    for id in order {
        let obj = ntk
            .obj(id)
            .ok_or(SynthError::DanglingReference(id.index()))?;
        let left = translate(&map, obj.fanins[0])?;
        let right = translate(&map, obj.fanins[1])?;
        let lit = if options.hash {
            new.add_and(left, right)
        } else {
            Fanin::new(new.add_node_raw(vec![left, right]))
        };
        map.insert(id, lit);
    }

    for (old, fresh) in new_pos.into_iter().chain(new_latches) {
        let driver = ntk
            .obj(old)
            .and_then(|o| o.fanin0())
            .ok_or(SynthError::DanglingReference(old.index()))?;
        new.set_fanins(fresh, vec![translate(&map, driver)?])?;
    }

    debug!(
        "rebuild '{}': {} -> {} nodes (hash={}, keep_dangling={})",
        ntk.name,
        ntk.num_nodes(),
        new.num_nodes(),
        options.hash,
        options.keep_dangling
    );

    Ok(new)
}

fn translate(map: &IndexMap<ObjId, Fanin>, f: Fanin) -> SynthResult<Fanin> {
    map.get(&f.id)
        .map(|lit| lit.invert_if(f.complemented))
        .ok_or(SynthError::DanglingReference(f.id.index()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ObjKind;

    /// Logic network with a duplicated AND and a dangling one
    fn redundant_logic() -> Network {
        let mut ntk = Network::new("redundant", NetworkKind::Logic);
        let a = ntk.add_pi("a");
        let b = ntk.add_pi("b");
        let n1 = ntk.add_node_raw(vec![Fanin::new(a), Fanin::new(b)]);
        let n2 = ntk.add_node_raw(vec![Fanin::new(b), Fanin::new(a)]);
        let _dangling = ntk.add_node_raw(vec![Fanin::not(a), Fanin::new(b)]);
        let n3 = ntk.add_node_raw(vec![Fanin::new(n1), Fanin::not(n2)]);
        ntk.add_po("y", Some(Fanin::new(n1)));
        ntk.add_po("z", Some(Fanin::new(n3)));
        ntk
    }

    #[test]
    fn test_strash_merges_and_folds() {
        let ntk = redundant_logic();
        assert_eq!(ntk.num_nodes(), 4);

        let hashed = strash(&ntk).unwrap();
        assert!(hashed.is_strashed());
        // n1 == n2, so n3 = n1 & !n1 = 0 and the dangling node is dropped
        assert_eq!(hashed.num_nodes(), 1);
        let z = hashed.obj(hashed.pos()[1]).unwrap();
        assert_eq!(z.fanin0(), Some(Fanin::const0()));
    }

    #[test]
    fn test_strash_keep_dangling() {
        let ntk = redundant_logic();
        let hashed = rebuild(
            &ntk,
            RebuildOptions {
                hash: true,
                keep_dangling: true,
            },
        )
        .unwrap();
        assert_eq!(hashed.num_nodes(), 2);
    }

    #[test]
    fn test_strash_object_order() {
        let hashed = strash(&redundant_logic()).unwrap();
        let kinds: Vec<ObjKind> = hashed.iter_objects().map(|(_, o)| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ObjKind::Const1,
                ObjKind::Pi,
                ObjKind::Pi,
                ObjKind::Po,
                ObjKind::Po,
                ObjKind::Node,
            ]
        );
    }

    #[test]
    fn test_cleanup_keeps_logic_kind() {
        let ntk = redundant_logic();
        let cleaned = cleanup(&ntk).unwrap();
        assert!(!cleaned.is_strashed());
        assert_eq!(cleaned.num_nodes(), 3);
    }

    #[test]
    fn test_strash_sequential() {
        let mut ntk = Network::new("toggle", NetworkKind::Logic);
        let en = ntk.add_pi("en");
        let q = ntk.add_latch("q", Some(false));
        let x = ntk.add_node_raw(vec![Fanin::new(en), Fanin::not(q.bo)]);
        ntk.set_fanins(q.bi, vec![Fanin::new(x)]).unwrap();
        ntk.add_po("q", Some(Fanin::new(q.bo)));

        let hashed = strash(&ntk).unwrap();
        assert_eq!(hashed.num_latches(), 1);
        assert_eq!(hashed.num_nodes(), 1);
        let lbox = hashed.latches()[0];
        let driver = hashed.obj(lbox.bi).unwrap().fanin0().unwrap();
        assert!(hashed.obj(driver.id).unwrap().is_node());
    }

    #[test]
    fn test_strash_rejects_undriven_output() {
        let mut ntk = Network::new("bad", NetworkKind::Logic);
        ntk.add_pi("a");
        ntk.add_po("y", None);
        assert!(matches!(
            strash(&ntk),
            Err(SynthError::BadFaninCount { .. })
        ));
    }
}
