//! AIGER reader
//!
//! Reads both the ASCII (`aag`) and binary (`aig`) variants of the AIGER
//! format. Literals are `2 * var + neg`; variable 0 is constant false. Each
//! latch becomes a `Bi -> Latch -> Bo` triple whose `Bo` stands for the latch
//! variable. The result is a [`NetworkKind::Logic`] network: AND definitions
//! are stored as written and hashed later by `strash`.

use crate::error::{SynthError, SynthResult};
use crate::network::{Fanin, Network, NetworkKind, ObjId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct Header {
    binary: bool,
    max_var: u32,
    inputs: u32,
    latches: u32,
    outputs: u32,
    ands: u32,
}

#[derive(Debug, Default)]
struct Parsed {
    inputs: Vec<u32>,
    /// (current, next, init); init `None` means uninitialized
    latches: Vec<(u32, u32, Option<bool>)>,
    outputs: Vec<u32>,
    ands: Vec<(u32, u32, u32)>,
    input_names: HashMap<usize, String>,
    latch_names: HashMap<usize, String>,
    output_names: HashMap<usize, String>,
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn next_line(&mut self) -> Option<SynthResult<&'a str>> {
        if self.at_end() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let len = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        self.pos += (len + 1).min(rest.len());
        self.line += 1;
        let line = self.line;
        Some(
            std::str::from_utf8(&rest[..len])
                .map(|s| s.trim_end_matches('\r'))
                .map_err(|_| SynthError::parse(line, "invalid UTF-8")),
        )
    }

    fn expect_line(&mut self, what: &str) -> SynthResult<&'a str> {
        match self.next_line() {
            Some(line) => line,
            None => Err(SynthError::parse(self.line + 1, format!("missing {what}"))),
        }
    }

    /// Variable-length 7-bit unsigned integer of the binary AND section
    fn read_varint(&mut self) -> SynthResult<u32> {
        let mut value: u32 = 0;
        let mut shift = 0;
        loop {
            let byte = *self
                .data
                .get(self.pos)
                .ok_or_else(|| SynthError::parse(self.line, "truncated binary AND section"))?;
            self.pos += 1;
            if shift > 28 {
                return Err(SynthError::parse(self.line, "delta overflow"));
            }
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}

fn parse_numbers(text: &str, line: usize) -> SynthResult<Vec<u32>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse::<u32>()
                .map_err(|_| SynthError::parse(line, format!("expected number, found '{tok}'")))
        })
        .collect()
}

fn parse_header(text: &str, line: usize) -> SynthResult<Header> {
    let mut parts = text.split_whitespace();
    let binary = match parts.next() {
        Some("aag") => false,
        Some("aig") => true,
        other => {
            return Err(SynthError::parse(
                line,
                format!("expected 'aag' or 'aig', found {:?}", other.unwrap_or("")),
            ))
        }
    };
    let nums = parse_numbers(&parts.collect::<Vec<_>>().join(" "), line)?;
    if nums.len() < 5 {
        return Err(SynthError::parse(line, "header needs M I L O A"));
    }
    // AIGER 1.9 extends the header with B C J F
    if nums.len() > 9 {
        return Err(SynthError::parse(line, "header has more than M I L O A B C J F"));
    }
    if nums[5..].iter().any(|&n| n != 0) {
        return Err(SynthError::parse(
            line,
            "bad state, constraint, justice and fairness sections are not supported",
        ));
    }
    let header = Header {
        binary,
        max_var: nums[0],
        inputs: nums[1],
        latches: nums[2],
        outputs: nums[3],
        ands: nums[4],
    };
    let defined = u64::from(header.inputs) + u64::from(header.latches) + u64::from(header.ands);
    if defined > u64::from(header.max_var) {
        return Err(SynthError::parse(line, "M is smaller than I + L + A"));
    }
    Ok(header)
}

fn parse(data: &[u8]) -> SynthResult<(Header, Parsed)> {
    let mut cur = Cursor::new(data);
    let header_line = cur.expect_line("header")?;
    let header = parse_header(header_line, cur.line)?;

    // Every declared input, latch and AND takes at least one byte of the file
    let declared = u64::from(header.inputs) + u64::from(header.latches) + u64::from(header.ands);
    let remaining = (data.len() - cur.pos) as u64;
    if declared > remaining {
        return Err(SynthError::parse(
            cur.line,
            format!("header declares {declared} objects but only {remaining} bytes follow"),
        ));
    }
    let mut parsed = Parsed::default();

    for i in 0..header.inputs {
        if header.binary {
            parsed.inputs.push(2 * (i + 1));
        } else {
            let text = cur.expect_line("input")?;
            let nums = parse_numbers(text, cur.line)?;
            match nums.as_slice() {
                [lit] => parsed.inputs.push(*lit),
                _ => return Err(SynthError::parse(cur.line, "input line needs one literal")),
            }
        }
    }

    for l in 0..header.latches {
        let text = cur.expect_line("latch")?;
        let nums = parse_numbers(text, cur.line)?;
        let (current, rest) = if header.binary {
            (2 * (header.inputs + l + 1), nums.as_slice())
        } else {
            match nums.split_first() {
                Some((c, rest)) => (*c, rest),
                None => return Err(SynthError::parse(cur.line, "empty latch line")),
            }
        };
        let (next, init) = match rest {
            [next] => (*next, Some(false)),
            [next, 0] => (*next, Some(false)),
            [next, 1] => (*next, Some(true)),
            [next, init] if *init == current => (*next, None),
            _ => return Err(SynthError::parse(cur.line, "malformed latch line")),
        };
        parsed.latches.push((current, next, init));
    }

    for _ in 0..header.outputs {
        let text = cur.expect_line("output")?;
        let nums = parse_numbers(text, cur.line)?;
        match nums.as_slice() {
            [lit] => parsed.outputs.push(*lit),
            _ => return Err(SynthError::parse(cur.line, "output line needs one literal")),
        }
    }

    for a in 0..header.ands {
        if header.binary {
            let lhs = 2 * (header.inputs + header.latches + a + 1);
            let delta0 = cur.read_varint()?;
            let delta1 = cur.read_varint()?;
            let rhs0 = lhs
                .checked_sub(delta0)
                .ok_or_else(|| SynthError::parse(cur.line, "invalid AND delta"))?;
            let rhs1 = rhs0
                .checked_sub(delta1)
                .ok_or_else(|| SynthError::parse(cur.line, "invalid AND delta"))?;
            parsed.ands.push((lhs, rhs0, rhs1));
        } else {
            let text = cur.expect_line("AND gate")?;
            let nums = parse_numbers(text, cur.line)?;
            match nums.as_slice() {
                [lhs, rhs0, rhs1] => parsed.ands.push((*lhs, *rhs0, *rhs1)),
                _ => return Err(SynthError::parse(cur.line, "AND line needs three literals")),
            }
        }
    }

    // Symbol table, terminated by the comment section
    while let Some(text) = cur.next_line() {
        let text = text?;
        if text.starts_with('c') {
            break;
        }
        if text.is_empty() {
            continue;
        }
        let (key, name) = text.split_once(' ').unwrap_or((text, ""));
        let (table, index) = if let Some(idx) = key.strip_prefix('i') {
            (&mut parsed.input_names, idx)
        } else if let Some(idx) = key.strip_prefix('l') {
            (&mut parsed.latch_names, idx)
        } else if let Some(idx) = key.strip_prefix('o') {
            (&mut parsed.output_names, idx)
        } else {
            continue;
        };
        let index: usize = index
            .parse()
            .map_err(|_| SynthError::parse(cur.line, format!("bad symbol '{key}'")))?;
        table.insert(index, name.to_string());
    }

    Ok((header, parsed))
}

/// Parse AIGER bytes into a logic network
pub fn read_aiger(data: &[u8], name: &str) -> SynthResult<Network> {
    let (header, parsed) = parse(data)?;
    let mut ntk = Network::new(name, NetworkKind::Logic);
    let mut vars: HashMap<u32, ObjId> = HashMap::new();

    let define = |vars: &mut HashMap<u32, ObjId>, lit: u32, id: ObjId| -> SynthResult<()> {
        if lit & 1 == 1 || lit == 0 || lit / 2 > header.max_var {
            return Err(SynthError::parse(0, format!("invalid definition literal {lit}")));
        }
        if vars.insert(lit / 2, id).is_some() {
            return Err(SynthError::parse(0, format!("variable {} defined twice", lit / 2)));
        }
        Ok(())
    };

    for (i, &lit) in parsed.inputs.iter().enumerate() {
        let pi_name = parsed
            .input_names
            .get(&i)
            .cloned()
            .unwrap_or_else(|| format!("i{i}"));
        let id = ntk.add_pi(pi_name);
        define(&mut vars, lit, id)?;
    }

    let mut latch_boxes = Vec::with_capacity(parsed.latches.len());
    for (l, &(current, _, init)) in parsed.latches.iter().enumerate() {
        let latch_name = parsed
            .latch_names
            .get(&l)
            .cloned()
            .unwrap_or_else(|| format!("l{l}"));
        let lbox = ntk.add_latch(latch_name, init);
        define(&mut vars, current, lbox.bo)?;
        latch_boxes.push(lbox);
    }

    let mut po_ids = Vec::with_capacity(parsed.outputs.len());
    for o in 0..parsed.outputs.len() {
        let po_name = parsed
            .output_names
            .get(&o)
            .cloned()
            .unwrap_or_else(|| format!("o{o}"));
        po_ids.push(ntk.add_po(po_name, None));
    }

    let mut and_ids = Vec::with_capacity(parsed.ands.len());
    for &(lhs, _, _) in &parsed.ands {
        let id = ntk.add_node_raw(Vec::new());
        define(&mut vars, lhs, id)?;
        and_ids.push(id);
    }

    let resolve = |lit: u32| -> SynthResult<Fanin> {
        if lit / 2 == 0 {
            return Ok(if lit & 1 == 1 {
                Fanin::const1()
            } else {
                Fanin::const0()
            });
        }
        let id = vars
            .get(&(lit / 2))
            .ok_or_else(|| SynthError::parse(0, format!("undefined literal {lit}")))?;
        Ok(Fanin {
            id: *id,
            complemented: lit & 1 == 1,
        })
    };

    for (&id, &(_, rhs0, rhs1)) in and_ids.iter().zip(&parsed.ands) {
        ntk.set_fanins(id, vec![resolve(rhs0)?, resolve(rhs1)?])?;
    }
    for (&id, &lit) in po_ids.iter().zip(&parsed.outputs) {
        ntk.set_fanins(id, vec![resolve(lit)?])?;
    }
    for (lbox, &(_, next, _)) in latch_boxes.iter().zip(&parsed.latches) {
        ntk.set_fanins(lbox.bi, vec![resolve(next)?])?;
    }

    Ok(ntk)
}
