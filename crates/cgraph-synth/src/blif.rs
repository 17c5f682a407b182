//! BLIF reader
//!
//! Supports the combinational and latch subset of BLIF: `.model`, `.inputs`,
//! `.outputs`, `.names` with single-output covers, `.latch` and `.end`.
//! Each cover is decomposed into AND nodes (one per cube) joined by an OR;
//! an off-set cover (output column `0`) is complemented. Nodes are created
//! without hashing, so the result is a [`NetworkKind::Logic`] network.

use crate::error::{SynthError, SynthResult};
use crate::network::{Fanin, Network, NetworkKind, ObjId};
use std::collections::{HashMap, HashSet};

/// One `.names` block
#[derive(Debug, Clone)]
struct Cover {
    line: usize,
    inputs: Vec<String>,
    output: String,
    cubes: Vec<String>,
    /// Value of the output column; on-set when true
    onset: bool,
}

#[derive(Debug, Clone)]
struct LatchDecl {
    input: String,
    output: String,
    init: Option<bool>,
}

#[derive(Debug, Default)]
struct Model {
    name: Option<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    covers: Vec<Cover>,
    latches: Vec<LatchDecl>,
}

/// Logical lines with comments stripped and `\` continuations joined
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    let mut start = 0;
    for (idx, raw) in text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or("").trim_end();
        if pending.is_empty() {
            start = idx + 1;
        }
        if let Some(stripped) = content.strip_suffix('\\') {
            pending.push_str(stripped);
            pending.push(' ');
            continue;
        }
        pending.push_str(content);
        let line = std::mem::take(&mut pending);
        if !line.trim().is_empty() {
            lines.push((start, line.trim().to_string()));
        }
    }
    if !pending.trim().is_empty() {
        lines.push((start, pending.trim().to_string()));
    }
    lines
}

fn parse_model(text: &str) -> SynthResult<Model> {
    let mut model = Model::default();
    let mut current: Option<Cover> = None;

    for (line, content) in logical_lines(text) {
        let mut tokens = content.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };

        if !first.starts_with('.') {
            let cover = current
                .as_mut()
                .ok_or_else(|| SynthError::parse(line, "cube outside of .names"))?;
            let (cube, value) = if cover.inputs.is_empty() {
                ("", first)
            } else {
                let value = tokens
                    .next()
                    .ok_or_else(|| SynthError::parse(line, "cube without output value"))?;
                (first, value)
            };
            if cube.len() != cover.inputs.len()
                || !cube.chars().all(|c| matches!(c, '0' | '1' | '-'))
            {
                return Err(SynthError::parse(line, format!("malformed cube '{cube}'")));
            }
            let onset = match value {
                "1" => true,
                "0" => false,
                other => {
                    return Err(SynthError::parse(
                        line,
                        format!("output value must be 0 or 1, found '{other}'"),
                    ))
                }
            };
            if !cover.cubes.is_empty() && cover.onset != onset {
                return Err(SynthError::parse(line, "mixed on-set and off-set cubes"));
            }
            cover.onset = onset;
            cover.cubes.push(cube.to_string());
            continue;
        }

        if let Some(done) = current.take() {
            model.covers.push(done);
        }

        let args: Vec<String> = tokens.map(str::to_string).collect();
        match first {
            ".model" => model.name = args.first().cloned(),
            ".inputs" => model.inputs.extend(args),
            ".outputs" => model.outputs.extend(args),
            ".names" => {
                let Some((output, inputs)) = args.split_last() else {
                    return Err(SynthError::parse(line, ".names needs an output"));
                };
                current = Some(Cover {
                    line,
                    inputs: inputs.to_vec(),
                    output: output.clone(),
                    cubes: Vec::new(),
                    onset: true,
                });
            }
            ".latch" => {
                if args.len() < 2 {
                    return Err(SynthError::parse(line, ".latch needs input and output"));
                }
                // Optional [type control] before the initial value
                let init = match args.len() {
                    3 => args.get(2),
                    5 => args.get(4),
                    _ => None,
                };
                let init = match init.map(String::as_str) {
                    Some("1") => Some(true),
                    Some("2") | Some("3") => None,
                    _ => Some(false),
                };
                model.latches.push(LatchDecl {
                    input: args[0].clone(),
                    output: args[1].clone(),
                    init,
                });
            }
            ".end" => break,
            other => {
                return Err(SynthError::parse(
                    line,
                    format!("unsupported directive '{other}'"),
                ))
            }
        }
    }

    if let Some(done) = current.take() {
        model.covers.push(done);
    }
    Ok(model)
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Ready(Fanin),
    Cover(usize),
}

struct Builder<'m> {
    model: &'m Model,
    ntk: Network,
    signals: HashMap<&'m str, Source>,
}

impl<'m> Builder<'m> {
    fn and_all(&mut self, lits: &[Fanin]) -> Fanin {
        let mut iter = lits.iter().copied();
        let Some(mut acc) = iter.next() else {
            return Fanin::const1();
        };
        for lit in iter {
            acc = Fanin::new(self.ntk.add_node_raw(vec![acc, lit]));
        }
        acc
    }

    fn or_all(&mut self, lits: &[Fanin]) -> Fanin {
        if lits.is_empty() {
            return Fanin::const0();
        }
        let inverted: Vec<Fanin> = lits.iter().map(|l| l.invert()).collect();
        self.and_all(&inverted).invert()
    }

    fn build_cover(&mut self, cover: &Cover, fanins: &[Fanin]) -> Fanin {
        let mut terms = Vec::with_capacity(cover.cubes.len());
        for cube in &cover.cubes {
            let lits: Vec<Fanin> = cube
                .chars()
                .zip(fanins)
                .filter_map(|(c, &f)| match c {
                    '1' => Some(f),
                    '0' => Some(f.invert()),
                    _ => None,
                })
                .collect();
            terms.push(self.and_all(&lits));
        }
        let sum = self.or_all(&terms);
        sum.invert_if(!cover.onset)
    }

    /// Resolve a signal, building the covers it depends on first
    fn resolve(&mut self, name: &'m str) -> SynthResult<Fanin> {
        let mut stack: Vec<(&'m str, bool)> = vec![(name, false)];
        let mut open: HashSet<&'m str> = HashSet::new();

        while let Some((sig, expanded)) = stack.pop() {
            let source = *self
                .signals
                .get(sig)
                .ok_or_else(|| SynthError::parse(0, format!("undriven signal '{sig}'")))?;
            let index = match source {
                Source::Ready(_) => continue,
                Source::Cover(index) => index,
            };
            let model = self.model;
            let cover = &model.covers[index];

            if expanded {
                let fanins = cover
                    .inputs
                    .iter()
                    .map(|i| match self.signals.get(i.as_str()) {
                        Some(Source::Ready(f)) => Ok(*f),
                        _ => Err(SynthError::parse(cover.line, format!("unresolved '{i}'"))),
                    })
                    .collect::<SynthResult<Vec<_>>>()?;
                let lit = self.build_cover(cover, &fanins);
                self.signals.insert(sig, Source::Ready(lit));
                open.remove(sig);
                continue;
            }

            if !open.insert(sig) {
                return Err(SynthError::parse(
                    cover.line,
                    format!("combinational cycle through '{sig}'"),
                ));
            }
            stack.push((sig, true));
            for input in cover.inputs.iter().rev() {
                if let Some(Source::Cover(_)) = self.signals.get(input.as_str()) {
                    if open.contains(input.as_str()) {
                        return Err(SynthError::parse(
                            cover.line,
                            format!("combinational cycle through '{input}'"),
                        ));
                    }
                    stack.push((input.as_str(), false));
                }
            }
        }

        match self.signals.get(name) {
            Some(Source::Ready(f)) => Ok(*f),
            _ => Err(SynthError::parse(0, format!("unresolved '{name}'"))),
        }
    }
}

/// Parse BLIF text into a logic network
pub fn read_blif(text: &str, default_name: &str) -> SynthResult<Network> {
    let model = parse_model(text)?;
    let name = model.name.clone().unwrap_or_else(|| default_name.to_string());

    let mut builder = Builder {
        model: &model,
        ntk: Network::new(name, NetworkKind::Logic),
        signals: HashMap::new(),
    };

    for input in &model.inputs {
        let id = builder.ntk.add_pi(input.clone());
        builder.signals.insert(input, Source::Ready(Fanin::new(id)));
    }

    let mut latch_inputs = Vec::with_capacity(model.latches.len());
    for decl in &model.latches {
        let lbox = builder.ntk.add_latch(decl.output.clone(), decl.init);
        if builder
            .signals
            .insert(&decl.output, Source::Ready(Fanin::new(lbox.bo)))
            .is_some()
        {
            return Err(SynthError::parse(
                0,
                format!("signal '{}' driven twice", decl.output),
            ));
        }
        latch_inputs.push((lbox.bi, decl.input.as_str()));
    }

    let mut outputs: Vec<(ObjId, &str)> = Vec::with_capacity(model.outputs.len());
    for output in &model.outputs {
        outputs.push((builder.ntk.add_po(output.clone(), None), output.as_str()));
    }

    for (index, cover) in model.covers.iter().enumerate() {
        if builder
            .signals
            .insert(&cover.output, Source::Cover(index))
            .is_some()
        {
            return Err(SynthError::parse(
                cover.line,
                format!("signal '{}' driven twice", cover.output),
            ));
        }
    }

    for (co, signal) in outputs.into_iter().chain(latch_inputs) {
        let driver = builder.resolve(signal)?;
        builder.ntk.set_fanins(co, vec![driver])?;
    }

    Ok(builder.ntk)
}
