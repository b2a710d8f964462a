//! # Subtree Matcher
//!
//! Finds every node whose subtree has the same type topology as a pattern,
//! with siblings treated as unordered, and reports for each match the
//! field-name correspondences (pattern name → matched name) of every sibling
//! permutation that works.
//!
//! ## Isomorphism
//!
//! Two subtrees match when their roots have equal type and child count and
//! some bijection between the child lists pairs every child with a matching
//! child. Leaves of equal type always match.
//!
//! ## Algorithm
//!
//! 1. Candidates: every node (preorder) whose type equals the pattern root's.
//! 2. Per node pair: reject on type or child-count mismatch, then on a
//!    differing sorted multiset of child types. Otherwise try every
//!    [`IndexPermutations`] ordering of the pattern's children, pairing
//!    `candidate_children[i]` with `pattern_children[perm[i]]`.
//! 3. A permutation succeeds when every pair matches. Its mappings are the
//!    cross product of the pairs' compatible deeper mappings, each extended
//!    by the pair names themselves.
//! 4. At the pattern root, the root pair is added, mappings smaller than the
//!    largest are dropped, and duplicates are removed keeping first-found order.
//!
//! The search is exponential in sibling fan-out. Nothing here bounds it;
//! callers check trees and patterns against `MatchLimits` first.

use std::collections::BTreeMap;

use dmt_core::DataType;

use crate::node::{NodeId, NodeRef};
use crate::permute::IndexPermutations;
use crate::tree::Tree;

/// Pattern node name → matched node name.
pub type FieldMapping = BTreeMap<String, String>;

/// One matched node with its deduplicated, maximal correspondence maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeMatch {
    pub node: NodeId,
    pub mappings: Vec<FieldMapping>,
}

/// All matches of one pattern, in preorder of the matched nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtreeMatches {
    matches: Vec<SubtreeMatch>,
}

impl SubtreeMatches {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubtreeMatch> {
        self.matches.iter()
    }

    /// Matched node ids.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.matches.iter().map(|m| m.node).collect()
    }

    /// Mappings per matched node, aligned with [`nodes`](Self::nodes).
    pub fn mappings(&self) -> Vec<&[FieldMapping]> {
        self.matches.iter().map(|m| m.mappings.as_slice()).collect()
    }

    /// Split into the aligned `(nodes, mappings)` lists.
    pub fn into_parts(self) -> (Vec<NodeId>, Vec<Vec<FieldMapping>>) {
        self.matches
            .into_iter()
            .map(|m| (m.node, m.mappings))
            .unzip()
    }
}

impl IntoIterator for SubtreeMatches {
    type Item = SubtreeMatch;
    type IntoIter = std::vec::IntoIter<SubtreeMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a> IntoIterator for &'a SubtreeMatches {
    type Item = &'a SubtreeMatch;
    type IntoIter = std::slice::Iter<'a, SubtreeMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

impl Tree {
    /// Every node of this tree whose subtree matches `pattern` up to sibling order.
    ///
    /// `pattern` may belong to any tree, this one included.
    pub fn find_subtree(&self, pattern: NodeRef<'_>) -> SubtreeMatches {
        let mut matches = Vec::new();
        let mut candidates = 0usize;

        for candidate in self.iter().filter(|n| n.data_type() == pattern.data_type()) {
            candidates += 1;
            let Some(found) = match_pair(candidate, pattern) else {
                tracing::trace!(
                    candidate = candidate.name(),
                    pattern = pattern.name(),
                    "candidate rejected"
                );
                continue;
            };

            let mut complete: Vec<FieldMapping> = found
                .into_iter()
                .map(|mut m| {
                    m.insert(pattern.name().to_string(), candidate.name().to_string());
                    m
                })
                .collect();
            let largest = complete.iter().map(BTreeMap::len).max().unwrap_or(0);
            complete.retain(|m| m.len() == largest);

            let mut mappings: Vec<FieldMapping> = Vec::with_capacity(complete.len());
            for mapping in complete {
                if !mappings.contains(&mapping) {
                    mappings.push(mapping);
                }
            }
            matches.push(SubtreeMatch {
                node: candidate.id(),
                mappings,
            });
        }

        tracing::debug!(
            pattern = pattern.name(),
            candidates,
            matches = matches.len(),
            "subtree search finished"
        );
        SubtreeMatches { matches }
    }
}

/// Match `candidate` against `pattern`. `Some` holds the deeper mappings of
/// every successful permutation (without the pair itself); a matching leaf
/// pair yields one empty mapping.
fn match_pair(candidate: NodeRef<'_>, pattern: NodeRef<'_>) -> Option<Vec<FieldMapping>> {
    if candidate.data_type() != pattern.data_type()
        || candidate.child_count() != pattern.child_count()
    {
        return None;
    }
    if pattern.is_leaf() {
        return Some(vec![FieldMapping::new()]);
    }

    let candidate_children: Vec<NodeRef<'_>> = candidate.children().collect();
    let pattern_children: Vec<NodeRef<'_>> = pattern.children().collect();
    if child_types(&candidate_children) != child_types(&pattern_children) {
        return None;
    }

    // pairs[i][j]: candidate child i against pattern child j.
    let pairs: Vec<Vec<Option<Vec<FieldMapping>>>> = candidate_children
        .iter()
        .map(|&c| {
            pattern_children
                .iter()
                .map(|&p| match_pair(c, p))
                .collect()
        })
        .collect();

    let mut found = Vec::new();
    'permutations: for perm in IndexPermutations::new(pattern_children.len()) {
        let mut accumulated = vec![FieldMapping::new()];
        for (i, &j) in perm.iter().enumerate() {
            let Some(deeper) = &pairs[i][j] else {
                continue 'permutations;
            };
            accumulated = merge(
                &accumulated,
                deeper,
                pattern_children[j].name(),
                candidate_children[i].name(),
            );
            if accumulated.is_empty() {
                continue 'permutations;
            }
        }
        found.extend(accumulated);
    }

    (!found.is_empty()).then_some(found)
}

fn child_types(children: &[NodeRef<'_>]) -> Vec<DataType> {
    let mut types: Vec<DataType> = children.iter().map(NodeRef::data_type).collect();
    types.sort_unstable();
    types
}

/// Cross product of `accumulated` and `deeper`, keeping only combinations
/// that agree on shared keys, each extended by `pattern_name → candidate_name`.
fn merge(
    accumulated: &[FieldMapping],
    deeper: &[FieldMapping],
    pattern_name: &str,
    candidate_name: &str,
) -> Vec<FieldMapping> {
    let mut merged = Vec::with_capacity(accumulated.len() * deeper.len());
    for base in accumulated {
        for extra in deeper {
            let agrees = extra
                .iter()
                .all(|(k, v)| base.get(k).map_or(true, |existing| existing == v));
            if !agrees || base.get(pattern_name).is_some_and(|v| v != candidate_name) {
                continue;
            }
            let mut combined = base.clone();
            combined.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
            combined.insert(pattern_name.to_string(), candidate_name.to_string());
            merged.push(combined);
        }
    }
    merged
}
