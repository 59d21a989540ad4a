use glam::{Affine3A, EulerRot, Quat, Vec3};

/// Transform 组件
///
/// 封装了节点的位置、旋转、缩放（TRS）以及矩阵缓存和脏检查逻辑。
/// 世界矩阵每次真正发生变化时递增 `world_revision`，
/// 铰链通过比较版本号得知被观察节点的朝向是否改变。
#[derive(Debug, Clone)]
pub struct Transform {
    // === Public 属性 ===
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    // === 矩阵缓存 (Internal) ===
    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,
    world_revision: u64,

    // === 脏检查状态 (Private) ===
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            world_revision: 0,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// 检查并更新局部矩阵
    /// 返回值: bool (是否发生了变化)
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// 绕局部坐标轴旋转（对象空间，右乘）
    ///
    /// `axis` 不要求已归一化；零向量时不做任何事。
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    /// Helper：设置欧拉角旋转
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// 获取当前的欧拉角 (XYZ 顺序)
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// 获取局部矩阵 (Affine3A)
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// 获取世界矩阵 (Affine3A)
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    /// 世界矩阵版本号
    #[inline]
    #[must_use]
    pub fn world_revision(&self) -> u64 {
        self.world_revision
    }

    /// 供变换系统更新完矩阵后写入；矩阵未变化时版本号保持不变
    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        if mat != self.world_matrix {
            self.world_matrix = mat;
            self.world_revision = self.world_revision.wrapping_add(1);
        }
    }

    /// 手动标记脏（例如用于强制刷新）
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
