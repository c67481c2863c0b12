//! In-memory representation of a parsed game-record collection.
//!
//! ## Core Types
//!
//! - [`Collection`]: the ordered forest of top-level game trees of one document
//! - [`GameTreeRef`]: a borrowed handle for walking a tree up and down
//! - [`Sequence`], [`Node`], [`Property`]: the mainline of a tree and its content
//! - [`PropIdent`], [`PropValue`]: property keys and decoded values
//!
//! Game trees live in an arena owned by the [`Collection`]. A tree refers to
//! its children and its parent through [`TreeId`] handles, so the parent link
//! never owns anything and can only be used to navigate upward.
//!
//! ## Examples
//!
//! ```rust
//! use sgf_tree::from_str;
//!
//! let collection = from_str("(;FF[4](;B[aa])(;B[bb]))").unwrap();
//! let root = collection.get(0).unwrap();
//!
//! assert_eq!(root.sequence().len(), 1);
//! assert_eq!(root.children().count(), 2);
//!
//! let second = root.child(1).unwrap();
//! let mv = second.sequence().first().get("B").unwrap();
//! assert_eq!(mv.value(), "bb");
//! assert_eq!(second.parent().map(|p| p.id()), Some(root.id()));
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Handle of a game tree inside its [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(usize);

impl TreeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The ordered forest produced by one parse run.
///
/// Trees are stored in pre-order, so [`Collection::all_trees`] walks the whole
/// document in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    arena: Vec<GameTree>,
    roots: Vec<TreeId>,
}

impl Collection {
    /// Number of top-level game trees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The `index`-th top-level game tree.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<GameTreeRef<'_>> {
        self.roots.get(index).map(|&id| self.handle(id))
    }

    /// Looks up any tree, top-level or nested, by its handle.
    #[must_use]
    pub fn tree(&self, id: TreeId) -> Option<GameTreeRef<'_>> {
        (id.0 < self.arena.len()).then(|| self.handle(id))
    }

    /// Top-level game trees in document order.
    pub fn game_trees(&self) -> impl Iterator<Item = GameTreeRef<'_>> + '_ {
        self.roots.iter().map(move |&id| self.handle(id))
    }

    /// Every game tree of the document, variations included, in source order.
    pub fn all_trees(&self) -> impl Iterator<Item = GameTreeRef<'_>> + '_ {
        (0..self.arena.len()).map(move |i| self.handle(TreeId(i)))
    }

    fn handle(&self, id: TreeId) -> GameTreeRef<'_> {
        GameTreeRef {
            collection: self,
            id,
        }
    }

    pub(crate) fn from_parts(arena: Vec<GameTree>, roots: Vec<TreeId>) -> Self {
        Collection { arena, roots }
    }
}

/// A game tree: the mainline [`Sequence`] plus its variations.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GameTree {
    sequence: Sequence,
    children: Vec<TreeId>,
    parent: Option<TreeId>,
}

/// Arena used while a collection is being built.
///
/// Trees are reserved once their sequence is known; children are attached
/// after they are complete, and only then is their parent link stamped.
#[derive(Debug, Default)]
pub(crate) struct TreeArena {
    trees: Vec<GameTree>,
}

impl TreeArena {
    pub(crate) fn reserve(&mut self, sequence: Sequence) -> TreeId {
        let id = TreeId(self.trees.len());
        self.trees.push(GameTree {
            sequence,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    pub(crate) fn attach(&mut self, parent: TreeId, child: TreeId) {
        self.trees[parent.0].children.push(child);
        self.trees[child.0].parent = Some(parent);
    }

    pub(crate) fn len(&self) -> usize {
        self.trees.len()
    }

    /// Drops every tree reserved at or after `mark`.
    pub(crate) fn rollback(&mut self, mark: usize) {
        self.trees.truncate(mark);
    }

    pub(crate) fn finish(self, roots: Vec<TreeId>) -> Collection {
        Collection::from_parts(self.trees, roots)
    }
}

/// Borrowed view of one game tree and its surroundings.
#[derive(Clone, Copy)]
pub struct GameTreeRef<'a> {
    collection: &'a Collection,
    id: TreeId,
}

impl<'a> GameTreeRef<'a> {
    fn tree(&self) -> &'a GameTree {
        &self.collection.arena[self.id.0]
    }

    #[must_use]
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// The mainline of this variation.
    #[must_use]
    pub fn sequence(&self) -> &'a Sequence {
        &self.tree().sequence
    }

    /// Variations branching after the mainline, in source order.
    pub fn children(&self) -> impl Iterator<Item = GameTreeRef<'a>> + 'a {
        let collection = self.collection;
        self.tree()
            .children
            .iter()
            .map(move |&id| collection.handle(id))
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Option<GameTreeRef<'a>> {
        self.tree()
            .children
            .get(index)
            .map(|&id| self.collection.handle(id))
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.tree().children.len()
    }

    /// The enclosing game tree, `None` for a top-level tree.
    #[must_use]
    pub fn parent(&self) -> Option<GameTreeRef<'a>> {
        self.tree().parent.map(|id| self.collection.handle(id))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.tree().parent.is_none()
    }

    /// Number of ancestors; 0 for a top-level tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), |t| t.parent()).count()
    }
}

impl fmt::Debug for GameTreeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameTreeRef")
            .field("id", &self.id)
            .field("sequence", self.sequence())
            .field("children", &self.tree().children)
            .finish()
    }
}

impl Serialize for GameTreeRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct Children<'a>(GameTreeRef<'a>);

        impl Serialize for Children<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut seq = serializer.serialize_seq(Some(self.0.child_count()))?;
                for child in self.0.children() {
                    seq.serialize_element(&child)?;
                }
                seq.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("sequence", self.sequence())?;
        map.serialize_entry("children", &Children(*self))?;
        map.end()
    }
}

impl Serialize for Collection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for tree in self.game_trees() {
            seq.serialize_element(&tree)?;
        }
        seq.end()
    }
}

/// The nodes of one variation, without branching. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sequence {
    nodes: Vec<Node>,
}

impl Sequence {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        debug_assert!(!nodes.is_empty());
        Sequence { nodes }
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a parsed sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// One position of the game with its properties, possibly none.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Node {
    properties: Vec<Property>,
}

impl Node {
    pub(crate) fn new(properties: Vec<Property>) -> Self {
        Node { properties }
    }

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// First property with the given identifier.
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.ident == *ident)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }
}

/// An identifier with its values, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    ident: PropIdent,
    values: Vec<PropValue>,
}

impl Property {
    pub(crate) fn new(ident: PropIdent, values: Vec<PropValue>) -> Self {
        debug_assert!(!values.is_empty());
        Property { ident, values }
    }

    #[must_use]
    pub fn ident(&self) -> &PropIdent {
        &self.ident
    }

    #[must_use]
    pub fn values(&self) -> &[PropValue] {
        &self.values
    }

    /// The first value. Every parsed property has one.
    #[must_use]
    pub fn value(&self) -> &PropValue {
        &self.values[0]
    }
}

/// One or two uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PropIdent(String);

impl PropIdent {
    /// Validates `raw` after trimming surrounding whitespace.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        let ident = raw.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'));
        let valid = (1..=2).contains(&ident.len()) && ident.bytes().all(|b| b.is_ascii_uppercase());
        valid.then(|| PropIdent(ident.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PropIdent {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PropIdent {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Decoded text of a property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct PropValue(String);

impl PropValue {
    pub(crate) fn new(text: String) -> Self {
        PropValue(text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PropValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PropValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(ident: &str, values: &[&str]) -> Property {
        Property::new(
            PropIdent::parse(ident).unwrap(),
            values.iter().map(|v| PropValue::new(v.to_string())).collect(),
        )
    }

    fn leaf(arena: &mut TreeArena) -> TreeId {
        arena.reserve(Sequence::new(vec![Node::default()]))
    }

    #[test]
    fn test_prop_ident_validation() {
        assert_eq!(PropIdent::parse("FF").unwrap().as_str(), "FF");
        assert_eq!(PropIdent::parse(" B\t\n").unwrap().as_str(), "B");
        assert!(PropIdent::parse("").is_none());
        assert!(PropIdent::parse("  ").is_none());
        assert!(PropIdent::parse("FFF").is_none());
        assert!(PropIdent::parse("aF").is_none());
        assert!(PropIdent::parse("F F").is_none());
        assert!(PropIdent::parse("\u{c4}").is_none());
    }

    #[test]
    fn test_property_equality_is_by_ordered_values() {
        assert_eq!(prop("AB", &["ac", "bc"]), prop("AB", &["ac", "bc"]));
        assert_ne!(prop("AB", &["bc", "ac"]), prop("AB", &["ac", "bc"]));
        assert_ne!(prop("AB", &["ac", "bc"]), prop("AB", &["ac"]));
        assert_ne!(prop("AB", &["ac"]), prop("AW", &["ac"]));
    }

    #[test]
    fn test_node_lookup() {
        let node = Node::new(vec![prop("B", &["aa"]), prop("C", &["nice"])]);
        assert_eq!(node.get("C").unwrap().value(), "nice");
        assert!(node.get("W").is_none());
        assert_eq!(node.len(), 2);
    }

    #[test]
    fn test_arena_links_parent_and_children() {
        let mut arena = TreeArena::default();
        let root = leaf(&mut arena);
        let a = leaf(&mut arena);
        arena.attach(root, a);
        let b = leaf(&mut arena);
        arena.attach(root, b);
        let grandchild = leaf(&mut arena);
        arena.attach(b, grandchild);

        let collection = arena.finish(vec![root]);
        let root_ref = collection.get(0).unwrap();
        assert!(root_ref.is_root());
        assert_eq!(root_ref.child_count(), 2);

        let deep = collection.tree(grandchild).unwrap();
        assert_eq!(deep.depth(), 2);
        assert_eq!(deep.parent().unwrap().id(), b);
        assert_eq!(deep.parent().unwrap().parent().unwrap().id(), root);
        assert_eq!(collection.all_trees().count(), 4);
    }

    #[test]
    fn test_arena_rollback_discards_partial_trees() {
        let mut arena = TreeArena::default();
        let kept = leaf(&mut arena);
        let mark = arena.len();
        let dropped = leaf(&mut arena);
        let inner = leaf(&mut arena);
        arena.attach(dropped, inner);
        arena.rollback(mark);

        let collection = arena.finish(vec![kept]);
        assert_eq!(collection.all_trees().count(), 1);
        assert!(collection.tree(dropped).is_none());
    }

    #[test]
    fn test_serialize_nested_form() {
        let mut arena = TreeArena::default();
        let root = arena.reserve(Sequence::new(vec![Node::new(vec![prop("FF", &["4"])])]));
        let child = arena.reserve(Sequence::new(vec![Node::new(vec![prop("B", &["aa"])])]));
        arena.attach(root, child);
        let collection = arena.finish(vec![root]);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "sequence": [[{"ident": "FF", "values": ["4"]}]],
                "children": [{
                    "sequence": [[{"ident": "B", "values": ["aa"]}]],
                    "children": []
                }]
            }])
        );
    }
}
