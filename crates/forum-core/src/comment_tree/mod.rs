//! Comment tree builder
//!
//! Turns the flat, unordered comment list of a post into a nested reply tree and
//! overlays the viewer's own reactions. Pure and synchronous: everything it needs
//! has been fetched by the caller.
//!
//! Comments are sorted by `(created_at, id)`, indexed into an arena, and attached to
//! their parent by index. A reply whose parent has not been seen yet gets a
//! placeholder slot for that parent; the placeholder is filled in place if the parent
//! shows up later in the list. Placeholders that are never filled are not rendered,
//! and neither is anything that hangs only from them.

use std::collections::HashMap;

use crate::entities::Comment;
use crate::value_objects::ReactionType;

/// The viewer's reactions keyed by comment id
pub type ViewerReactions = HashMap<String, ReactionType>;

/// A comment with its ordered replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    /// Oldest first
    pub replies: Vec<CommentNode>,
    /// The viewer's reaction on this comment, if a viewer was given and has one
    pub viewer_reaction: Option<ReactionType>,
}

impl CommentNode {
    pub fn id(&self) -> &str {
        &self.comment.id
    }

    /// Number of nodes in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.replies.iter());
        }
        total
    }
}

/// Count every node in a forest
pub fn count_nodes(roots: &[CommentNode]) -> usize {
    roots.iter().map(CommentNode::subtree_len).sum()
}

struct Slot {
    /// `None` while this slot is a placeholder for a parent not yet seen
    comment: Option<Comment>,
    replies: Vec<usize>,
}

impl Slot {
    fn placeholder() -> Self {
        Self {
            comment: None,
            replies: Vec::new(),
        }
    }
}

/// Build the reply tree for one post's comments.
///
/// Returns one node per top-level comment, oldest first. Output is identical for
/// any permutation of the same input.
pub fn build_comment_tree(
    mut comments: Vec<Comment>,
    viewer: Option<&ViewerReactions>,
) -> Vec<CommentNode> {
    comments.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut arena: Vec<Slot> = Vec::with_capacity(comments.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(comments.len());
    let mut roots: Vec<usize> = Vec::new();

    for comment in comments {
        let parent_id = comment.parent().map(str::to_owned);

        let idx = match index.get(&comment.id) {
            // placeholder created by an earlier reply: fill it in place
            Some(&idx) if arena[idx].comment.is_none() => {
                arena[idx].comment = Some(comment);
                idx
            }
            // duplicate id: first occurrence wins
            Some(_) => continue,
            None => {
                let idx = arena.len();
                index.insert(comment.id.clone(), idx);
                arena.push(Slot {
                    comment: Some(comment),
                    replies: Vec::new(),
                });
                idx
            }
        };

        match parent_id {
            None => roots.push(idx),
            Some(parent_id) => {
                let parent_idx = *index.entry(parent_id).or_insert_with(|| {
                    arena.push(Slot::placeholder());
                    arena.len() - 1
                });
                arena[parent_idx].replies.push(idx);
            }
        }
    }

    render(arena, &roots, viewer)
}

/// Materialize the arena into nested nodes without recursing on depth.
fn render(mut arena: Vec<Slot>, roots: &[usize], viewer: Option<&ViewerReactions>) -> Vec<CommentNode> {
    // pre-order walk from the roots; every child lands after its parent
    let mut visited = vec![false; arena.len()];
    let mut order = Vec::with_capacity(arena.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();

    while let Some(idx) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        order.push(idx);
        for &child in arena[idx].replies.iter().rev() {
            if arena[child].comment.is_some() && !visited[child] {
                stack.push(child);
            }
        }
    }

    // build bottom-up by walking the pre-order backwards
    let mut built: Vec<Option<CommentNode>> = std::iter::repeat_with(|| None).take(arena.len()).collect();
    for &idx in order.iter().rev() {
        let slot = &mut arena[idx];
        let Some(comment) = slot.comment.take() else {
            continue;
        };
        let replies = slot
            .replies
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        let viewer_reaction = viewer.and_then(|v| v.get(&comment.id).copied());
        built[idx] = Some(CommentNode {
            comment,
            replies,
            viewer_reaction,
        });
    }

    roots.iter().filter_map(|&idx| built[idx].take()).collect()
}
