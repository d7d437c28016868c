//! Tree construction and post-order flattening.
//!
//! ```text
//! root (synthetic)
//! ├── A            flatten: [A1, A2, A, B]
//! │   ├── A1
//! │   └── A2
//! └── B
//! ```
//!
//! The synthetic root is owned by the renderer and never appears in the
//! flattened sequence. Flatten order decides focus indices.

use std::rc::Rc;

use super::Renderer;
use crate::component::ComponentRef;

/// What `render()` accepts: a static tree or a producer called on every render.
#[derive(Clone)]
pub enum Content {
    Tree(Vec<ComponentRef>),
    Producer(Rc<dyn Fn() -> Vec<ComponentRef>>),
}

impl Content {
    pub fn producer(f: impl Fn() -> Vec<ComponentRef> + 'static) -> Self {
        Content::Producer(Rc::new(f))
    }

    /// Top-level nodes for this render.
    pub(crate) fn resolve(&self) -> Vec<ComponentRef> {
        match self {
            Content::Tree(nodes) => nodes.clone(),
            Content::Producer(f) => f(),
        }
    }
}

impl From<ComponentRef> for Content {
    fn from(node: ComponentRef) -> Self {
        Content::Tree(vec![node])
    }
}

impl From<Vec<ComponentRef>> for Content {
    fn from(nodes: Vec<ComponentRef>) -> Self {
        Content::Tree(nodes)
    }
}

pub(crate) struct TreeNode {
    pub component: ComponentRef,
    pub children: Vec<TreeNode>,
}

/// Initialize `component` and its subtree.
///
/// Children are resolved and initialized first, then the node's own hook runs
/// with the resolved children.
pub(crate) fn build(
    renderer: &Renderer,
    component: ComponentRef,
    parent: Option<&ComponentRef>,
) -> TreeNode {
    let children: Vec<TreeNode> = component
        .children()
        .unwrap_or_default()
        .into_iter()
        .map(|child| build(renderer, child, Some(&component)))
        .collect();

    let resolved: Vec<ComponentRef> =
        children.iter().map(|node| node.component.clone()).collect();
    component.on_renderer_initialization(renderer, parent, &resolved);

    TreeNode { component, children }
}

/// Post-order linearization: every node's children come before the node.
pub(crate) fn flatten(nodes: &[TreeNode]) -> Vec<ComponentRef> {
    let mut out = Vec::new();
    flatten_into(nodes, &mut out);
    out
}

fn flatten_into(nodes: &[TreeNode], out: &mut Vec<ComponentRef>) {
    for node in nodes {
        flatten_into(&node.children, out);
        out.push(node.component.clone());
    }
}
