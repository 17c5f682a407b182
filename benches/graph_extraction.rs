//! Graph extraction benchmarks

use cgraph_ml::CircuitGraph;
use cgraph_synth::{graph_data, strash, Fanin, InverterEncoding, Network, NetworkKind, NodeTyping};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Ripple-carry adder over `width` bits, built as a logic network
fn ripple_adder(width: usize) -> Network {
    let mut ntk = Network::new(format!("add{width}"), NetworkKind::Logic);
    let a: Vec<Fanin> = (0..width).map(|i| Fanin::new(ntk.add_pi(format!("a{i}")))).collect();
    let b: Vec<Fanin> = (0..width).map(|i| Fanin::new(ntk.add_pi(format!("b{i}")))).collect();

    let mut carry = Fanin::const0();
    for i in 0..width {
        let axb = xor(&mut ntk, a[i], b[i]);
        let sum = xor(&mut ntk, axb, carry);
        ntk.add_po(format!("s{i}"), Some(sum));
        let g = ntk.add_and(a[i], b[i]);
        let p = ntk.add_and(axb, carry);
        carry = ntk.add_or(g, p);
    }
    ntk.add_po("cout", Some(carry));
    ntk
}

fn xor(ntk: &mut Network, x: Fanin, y: Fanin) -> Fanin {
    let l = ntk.add_and(x, y.invert());
    let r = ntk.add_and(x.invert(), y);
    ntk.add_or(l, r)
}

fn benchmark_strash(c: &mut Criterion) {
    let mut group = c.benchmark_group("strash");

    for width in [32, 256, 2048] {
        let ntk = ripple_adder(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &ntk, |b, ntk| {
            b.iter(|| black_box(strash(ntk).map(|n| n.num_nodes())))
        });
    }
    group.finish();
}

fn benchmark_graph_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_data");

    for width in [32, 256, 2048] {
        let ntk = match strash(&ripple_adder(width)) {
            Ok(ntk) => ntk,
            Err(e) => panic!("strash failed: {e}"),
        };
        for inverter in InverterEncoding::ALL {
            let id = BenchmarkId::new(format!("i{}", inverter), width);
            group.bench_with_input(id, &ntk, |b, ntk| {
                b.iter(|| {
                    let data = graph_data(ntk, NodeTyping::Combinational, inverter);
                    black_box(data.map(|d| d.num_edges()))
                })
            });
        }
    }
    group.finish();
}

fn benchmark_tensor_graph(c: &mut Criterion) {
    let ntk = match strash(&ripple_adder(2048)) {
        Ok(ntk) => ntk,
        Err(e) => panic!("strash failed: {e}"),
    };
    let data = match graph_data(&ntk, NodeTyping::CiCo, InverterEncoding::EdgeWeight) {
        Ok(data) => data,
        Err(e) => panic!("graph_data failed: {e}"),
    };

    c.bench_function("tensor_graph_2048", |b| {
        b.iter(|| {
            let g = CircuitGraph::from_graph_data(ntk.num_objects(), &data, true);
            black_box(g.map(|g| g.num_edges()))
        })
    });
}

criterion_group!(
    benches,
    benchmark_strash,
    benchmark_graph_data,
    benchmark_tensor_graph
);
criterion_main!(benches);
