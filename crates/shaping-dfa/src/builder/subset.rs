//! Subset construction over position sets.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;

use super::positions::{Leaf, PositionSet, Positions};
use crate::ast::Symbol;
use crate::automaton::{FAIL_STATE, INITIAL_STATE, StateId};
use crate::errors::CompileError;

/// Flat tables produced by subset construction.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    /// Row-major `[state][symbol]` next-state table.
    pub transitions: Vec<StateId>,
    pub accepting: Vec<bool>,
    pub tags: Vec<BTreeSet<String>>,
}

/// Build the deterministic automaton whose states are sets of `positions`.
///
/// State 0 is the fail state and is never expanded. State 1 holds the root's
/// `firstpos`. States are expanded in index order and new states are appended
/// in ascending symbol order, so numbering depends only on the tree shape.
pub(crate) fn construct(
    positions: &Positions,
    alphabet_size: usize,
) -> Result<Tables, CompileError> {
    let initial = positions.root_firstpos().clone();
    let mut index: HashMap<PositionSet, StateId> = HashMap::new();
    index.insert(initial.clone(), INITIAL_STATE);
    let mut states = vec![PositionSet::new(), initial];
    let mut transitions = vec![FAIL_STATE; alphabet_size.saturating_mul(states.len())];

    let mut current = INITIAL_STATE as usize;
    while let Some(state) = states.get(current) {
        let moves = moves_from(positions, state);
        for (symbol, target) in moves {
            let next = if let Some(&existing) = index.get(&target) {
                existing
            } else {
                let id = StateId::try_from(states.len())
                    .map_err(|_| CompileError::StateLimit)?;
                log::trace!("state {id} = {target:?}");
                index.insert(target.clone(), id);
                states.push(target);
                let grown = transitions.len().saturating_add(alphabet_size);
                transitions.resize(grown, FAIL_STATE);
                id
            };
            let slot = current
                .checked_mul(alphabet_size)
                .and_then(|row| row.checked_add(symbol as usize))
                .and_then(|cell| transitions.get_mut(cell));
            if let Some(slot) = slot {
                *slot = next;
            }
        }
        current += 1;
    }

    let accepting = states
        .iter()
        .map(|state| {
            state
                .iter()
                .any(|&p| matches!(positions.leaf(p), Some(Leaf::EndMarker)))
        })
        .collect();
    let tags = states
        .iter()
        .map(|state| {
            state
                .iter()
                .filter_map(|&p| match positions.leaf(p) {
                    Some(Leaf::Tag(name)) => Some(name.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect();

    Ok(Tables {
        transitions,
        accepting,
        tags,
    })
}

/// For each symbol, the union of `followpos` over the literal positions of
/// `state` that match it. Symbols with an empty union are omitted.
fn moves_from(positions: &Positions, state: &PositionSet) -> BTreeMap<Symbol, PositionSet> {
    let mut moves: BTreeMap<Symbol, PositionSet> = BTreeMap::new();
    for &position in state {
        if let (Some(Leaf::Literal(symbol)), Some(follow)) =
            (positions.leaf(position), positions.followpos(position))
        {
            moves
                .entry(*symbol)
                .or_default()
                .extend(follow.iter().copied());
        }
    }
    moves.retain(|_, target| !target.is_empty());
    moves
}
