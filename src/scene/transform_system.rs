//! 变换系统 (Transform System)
//!
//! 负责场景图的矩阵层级更新，与 Scene 解耦以避免借用冲突。
//! 只需要借用 nodes SlotMap 和根节点列表。
//!
//! 铰链每次旋转后只刷新被移动节点的子树（`update_subtree`），
//! 每帧开始时由 `update_hierarchy_iterative` 刷新整个场景。

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// 更新整个场景层级的世界矩阵
///
/// 使用显式栈替代递归调用，避免深层级场景的栈溢出风险。
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // 工作栈：(节点句柄, 父世界矩阵, 父是否变化)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    drain_stack(nodes, &mut stack);
}

/// 从指定节点开始向下更新子树（强制重算该节点的世界矩阵）
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) {
    let Some(node) = nodes.get(root_handle) else {
        return;
    };

    let parent_world = node
        .parent
        .and_then(|parent_handle| nodes.get(parent_handle))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack = vec![(root_handle, parent_world, true)];
    drain_stack(nodes, &mut stack);
}

fn drain_stack(nodes: &mut SlotMap<NodeHandle, Node>, stack: &mut Vec<(NodeHandle, Affine3A, bool)>) {
    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        // 1. 更新局部矩阵
        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        // 2. 更新世界矩阵
        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        // 3. 子节点逆序入栈以保持处理顺序
        let current_world = node.transform.world_matrix;
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}
