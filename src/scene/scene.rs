use glam::{Affine3A, Quat, Vec3};
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::bounds::BoundingBox;
use crate::scene::node::Node;
use crate::scene::transform_system;

/// 场景图结构
///
/// Scene 独占所有节点；外部（包括铰链）只持有 `NodeHandle`，
/// 节点被移除后句柄自动失效，查询返回 `None`。
///
/// 坐标变换查询（`local_to_world` / `world_to_local` 等）读取缓存的世界矩阵，
/// 修改 TRS 后需要调用 `update_matrix` 或 `update_matrix_world`。
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
        }
    }

    /// 开始构建一个节点
    pub fn build_node(&mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// 创建一个命名节点（放在根节点）
    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    /// 添加一个节点到场景 (默认放在根节点)
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// 移除节点 (递归移除所有子节点)
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let children = if let Some(node) = self.nodes.get(handle) {
            node.children.clone()
        } else {
            return;
        };

        for child in children {
            self.remove_node(child);
        }

        let parent_opt = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(parent_handle) = parent_opt {
            if let Some(parent) = self.nodes.get_mut(parent_handle)
                && let Some(pos) = parent.children.iter().position(|&x| x == handle)
            {
                parent.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(pos);
        }

        self.nodes.remove(handle);
    }

    /// 核心逻辑：建立父子关系 (Attach)
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach node under its own descendant!");
            return;
        }

        // 1. Detach from old
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        // 2. Attach to new
        self.nodes[parent].children.push(child);

        // 3. Update child
        let c = &mut self.nodes[child];
        c.parent = Some(parent);
        c.transform.mark_dirty();
    }

    /// `ancestor` 是否位于 `node` 的父链上（不含自身）
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.parent(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.parent(handle);
        }
        false
    }

    /// 获取只读引用
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    /// 获取可变引用 (用于修改 TRS)
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    #[must_use]
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle)?.parent
    }

    /// 局部位置（父坐标系）
    #[must_use]
    pub fn position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(handle).map(|n| n.transform.position)
    }

    #[must_use]
    pub fn rotation(&self, handle: NodeHandle) -> Option<Quat> {
        self.nodes.get(handle).map(|n| n.transform.rotation)
    }

    /// 设置局部几何包围盒
    pub fn set_bounds(&mut self, handle: NodeHandle, bounds: BoundingBox) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.bounds = Some(bounds);
        }
    }

    // ========================================================================
    // 坐标变换
    // ========================================================================

    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        self.nodes.get(handle).map(|n| n.transform.world_matrix)
    }

    /// 父节点的世界矩阵；根节点返回单位矩阵
    #[must_use]
    pub fn parent_world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let node = self.nodes.get(handle)?;
        Some(
            node.parent
                .and_then(|p| self.nodes.get(p))
                .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix),
        )
    }

    /// 局部坐标 -> 世界坐标
    #[must_use]
    pub fn local_to_world(&self, handle: NodeHandle, point: Vec3) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| m.transform_point3(point))
    }

    /// 世界坐标 -> 局部坐标
    #[must_use]
    pub fn world_to_local(&self, handle: NodeHandle, point: Vec3) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| m.inverse().transform_point3(point))
    }

    /// 世界矩阵版本号，用于检测节点（或其祖先）的朝向变化
    #[must_use]
    pub fn world_revision(&self, handle: NodeHandle) -> Option<u64> {
        self.nodes.get(handle).map(|n| n.transform.world_revision())
    }

    // ========================================================================
    // 包围盒
    // ========================================================================

    /// 计算节点及其子树的世界空间包围盒；没有任何几何时返回 `None`
    #[must_use]
    pub fn compute_bounding_box(&self, handle: NodeHandle) -> Option<BoundingBox> {
        let mut combined: Option<BoundingBox> = None;
        let mut stack = vec![handle];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if let Some(local) = &node.bounds {
                let world = local.transform(&node.transform.world_matrix);
                combined = Some(match combined {
                    Some(existing) => existing.union(&world),
                    None => world,
                });
            }
            stack.extend(node.children.iter().copied());
        }

        combined
    }

    /// 世界空间包围盒中心；没有几何时退化为节点原点
    #[must_use]
    pub fn bounding_center(&self, handle: NodeHandle) -> Option<Vec3> {
        let origin = Vec3::from(self.world_matrix(handle)?.translation);
        Some(self.compute_bounding_box(handle).map_or(origin, |b| b.center()))
    }

    // ========================================================================
    // 变换修改
    // ========================================================================

    /// 绕局部坐标轴旋转
    pub fn rotate_on_axis(&mut self, handle: NodeHandle, axis: Vec3, angle: f32) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.rotate_on_axis(axis, angle);
        }
    }

    pub fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.position = position;
        }
    }

    /// 刷新节点的局部矩阵以及其子树的世界矩阵
    pub fn update_matrix(&mut self, handle: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, handle);
    }

    /// 更新整个场景的世界矩阵
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    // ========================================================================
    // 名称查询
    // ========================================================================

    /// 深度优先查找名称匹配的后代节点（不含自身）
    #[must_use]
    pub fn get_child_by_name(&self, handle: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(handle)?;
        let mut stack: Vec<NodeHandle> = node.children.iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.name == name {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// 名称解析：先匹配 `root` 自身，再查找后代
    #[must_use]
    pub fn resolve(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        if self.name(root)? == name {
            Some(root)
        } else {
            self.get_child_by_name(root, name)
        }
    }

    /// 两个节点最近的公共祖先（不含节点自身）
    #[must_use]
    pub fn common_parent(&self, a: NodeHandle, b: NodeHandle) -> Option<NodeHandle> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(a);
        while let Some(handle) = current {
            ancestors.push(handle);
            current = self.parent(handle);
        }

        let mut current = self.parent(b);
        while let Some(handle) = current {
            if ancestors.contains(&handle) {
                return Some(handle);
            }
            current = self.parent(handle);
        }
        None
    }
}

pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            node: Node::new(name),
            parent: None,
        }
    }

    // === 链式配置方法 ===

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.node.transform.position = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.node.transform.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.node.transform.scale = Vec3::splat(s);
        self
    }

    /// 局部几何包围盒
    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.node.bounds = Some(bounds);
        self
    }

    /// 设置父节点
    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    // === 终结方法 ===

    /// 完成构建，将 Node 插入 Scene，返回句柄
    pub fn build(self) -> NodeHandle {
        let handle = self.scene.nodes.insert(self.node);

        self.scene.root_nodes.push(handle);
        if let Some(parent) = self.parent {
            self.scene.attach(handle, parent);
        }

        handle
    }
}
