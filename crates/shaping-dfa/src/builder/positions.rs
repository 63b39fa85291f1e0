//! Leaf positions and the `followpos` relation.
//!
//! Every leaf occurrence of a resolved tree is allocated a fresh
//! [`PositionId`] in an arena. A single post-order walk computes
//! `nullable`/`firstpos`/`lastpos` per subtree and accumulates `followpos`
//! for each position as it goes; the tree is finite and acyclic, so no
//! fixed-point iteration is needed.

use std::collections::BTreeSet;

use crate::ast::{Expr, Symbol};
use crate::errors::{AlphabetRangeError, CompileError};

/// Index of a leaf occurrence in the position arena.
pub(crate) type PositionId = u32;

/// An ordered set of positions. Doubles as the identity of an automaton state.
pub(crate) type PositionSet = BTreeSet<PositionId>;

/// A leaf occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Leaf {
    Literal(Symbol),
    Tag(String),
    EndMarker,
}

/// Attributes of one subtree.
#[derive(Debug, Default)]
struct Attrs {
    nullable: bool,
    firstpos: PositionSet,
    lastpos: PositionSet,
}

/// The leaf arena of a resolved tree together with its `followpos` relation.
#[derive(Debug, Default)]
pub(crate) struct Positions {
    leaves: Vec<Leaf>,
    followpos: Vec<PositionSet>,
    root_firstpos: PositionSet,
}

impl Positions {
    /// Allocate positions for `root` and compute `followpos`.
    ///
    /// `root` must be free of variables and every literal must be below
    /// `alphabet_size`.
    pub(crate) fn build(root: &Expr, alphabet_size: usize) -> Result<Self, CompileError> {
        let mut positions = Self::default();
        let attrs = positions.walk(root, alphabet_size)?;
        positions.root_firstpos = attrs.firstpos;
        Ok(positions)
    }

    /// `firstpos` of the whole tree, the positions of the initial state.
    pub(crate) fn root_firstpos(&self) -> &PositionSet {
        &self.root_firstpos
    }

    pub(crate) fn leaf(&self, position: PositionId) -> Option<&Leaf> {
        self.leaves.get(position as usize)
    }

    pub(crate) fn followpos(&self, position: PositionId) -> Option<&PositionSet> {
        self.followpos.get(position as usize)
    }

    pub(crate) fn len(&self) -> usize {
        self.leaves.len()
    }

    fn alloc(&mut self, leaf: Leaf) -> Result<Attrs, CompileError> {
        let id = PositionId::try_from(self.leaves.len())
            .map_err(|_| CompileError::PositionLimit)?;
        let nullable = matches!(leaf, Leaf::Tag(_));
        self.leaves.push(leaf);
        self.followpos.push(PositionSet::new());
        let set = PositionSet::from([id]);
        Ok(Attrs {
            nullable,
            firstpos: set.clone(),
            lastpos: set,
        })
    }

    fn add_follow(&mut self, from: &PositionSet, to: &PositionSet) {
        for &position in from {
            if let Some(follow) = self.followpos.get_mut(position as usize) {
                follow.extend(to.iter().copied());
            }
        }
    }

    fn walk(&mut self, expr: &Expr, alphabet_size: usize) -> Result<Attrs, CompileError> {
        match expr {
            Expr::Literal(value) => {
                if *value as usize >= alphabet_size {
                    return Err(AlphabetRangeError::new(*value, alphabet_size, None).into());
                }
                self.alloc(Leaf::Literal(*value))
            }
            Expr::Tag(name) => self.alloc(Leaf::Tag(name.clone())),
            Expr::EndMarker => self.alloc(Leaf::EndMarker),
            Expr::Variable(name) => Err(CompileError::UndefinedReference { name: name.clone() }),
            Expr::Alternation(a, b) => {
                let a = self.walk(a, alphabet_size)?;
                let b = self.walk(b, alphabet_size)?;
                Ok(Attrs {
                    nullable: a.nullable || b.nullable,
                    firstpos: a.firstpos.union(&b.firstpos).copied().collect(),
                    lastpos: a.lastpos.union(&b.lastpos).copied().collect(),
                })
            }
            Expr::Concatenation(a, b) => {
                let a = self.walk(a, alphabet_size)?;
                let b = self.walk(b, alphabet_size)?;
                self.add_follow(&a.lastpos, &b.firstpos);
                let mut firstpos = a.firstpos;
                if a.nullable {
                    firstpos.extend(b.firstpos.iter().copied());
                }
                let mut lastpos = b.lastpos;
                if b.nullable {
                    lastpos.extend(a.lastpos.iter().copied());
                }
                Ok(Attrs {
                    nullable: a.nullable && b.nullable,
                    firstpos,
                    lastpos,
                })
            }
            Expr::Repeat(inner, op) => {
                let inner = self.walk(inner, alphabet_size)?;
                if op.loops() {
                    self.add_follow(&inner.lastpos, &inner.firstpos);
                }
                Ok(Attrs {
                    nullable: op.is_nullable(),
                    ..inner
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RepeatOp;

    fn build(expr: &Expr, alphabet_size: usize) -> Positions {
        Positions::build(expr, alphabet_size)
            .unwrap_or_else(|err| panic!("positions should build: {err}"))
    }

    fn follow(positions: &Positions, id: PositionId) -> Vec<PositionId> {
        positions
            .followpos(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    #[test]
    fn allocates_one_position_per_occurrence() {
        // (1 2)* 1 #, with the two `1`s kept apart.
        let expr = Expr::concat(
            Expr::concat(
                Expr::repeat(
                    Expr::concat(Expr::literal(1), Expr::literal(2)),
                    RepeatOp::ZeroOrMore,
                ),
                Expr::literal(1),
            ),
            Expr::EndMarker,
        );
        let positions = build(&expr, 3);
        assert_eq!(positions.len(), 4);
        assert_eq!(positions.leaf(0), Some(&Leaf::Literal(1)));
        assert_eq!(positions.leaf(2), Some(&Leaf::Literal(1)));
        assert_eq!(positions.root_firstpos(), &PositionSet::from([0, 2]));
        assert_eq!(follow(&positions, 0), vec![1]);
        assert_eq!(follow(&positions, 1), vec![0, 2]);
        assert_eq!(follow(&positions, 2), vec![3]);
        assert_eq!(follow(&positions, 3), Vec::<PositionId>::new());
    }

    #[test]
    fn nullable_tags_extend_lastpos() {
        // 1 <t> #: both the literal and the tag are followed by the marker.
        let expr = Expr::concat(Expr::tagged("t", Expr::literal(1)), Expr::EndMarker);
        let positions = build(&expr, 2);
        assert_eq!(follow(&positions, 0), vec![1, 2]);
        assert_eq!(follow(&positions, 1), vec![2]);
        assert_eq!(positions.leaf(1), Some(&Leaf::Tag("t".into())));
    }

    #[test]
    fn optional_does_not_loop() {
        let expr = Expr::concat(
            Expr::repeat(Expr::literal(0), RepeatOp::Optional),
            Expr::EndMarker,
        );
        let positions = build(&expr, 1);
        assert_eq!(positions.root_firstpos(), &PositionSet::from([0, 1]));
        assert_eq!(follow(&positions, 0), vec![1]);
    }

    #[test]
    fn rejects_literals_outside_the_alphabet() {
        let Err(err) = Positions::build(&Expr::literal(2), 2) else {
            panic!("literal should be out of range");
        };
        assert_eq!(
            err,
            CompileError::AlphabetRange(AlphabetRangeError::new(2, 2, None))
        );
    }

    #[test]
    fn rejects_unresolved_variables() {
        let Err(err) = Positions::build(&Expr::variable("C"), 2) else {
            panic!("variable should be rejected");
        };
        assert_eq!(err, CompileError::UndefinedReference { name: "C".into() });
    }
}
