use serde::{Deserialize, Serialize};

use super::{NodeTag, TraitNodeKind};

/// 张量引用：布局内核只关心形状（以及可选的数据类型说明）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorRef {
    pub shape: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
}

impl TensorRef {
    pub fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            dtype: None,
        }
    }

    pub fn with_dtype(mut self, dtype: &str) -> Self {
        self.dtype = Some(dtype.to_string());
        self
    }

    /// 元素个数（标量的形状为空，元素个数为1）
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// 张量叶子节点（权重、偏置、激活值等）
#[derive(Debug, Clone, PartialEq)]
pub struct VariableNode {
    tensor: TensorRef,
    // 是否被识别为可学习的权重/偏置
    learnable: bool,
}

impl VariableNode {
    pub fn new(tensor: TensorRef, learnable: bool) -> Self {
        Self { tensor, learnable }
    }

    pub const fn tensor(&self) -> &TensorRef {
        &self.tensor
    }

    pub const fn is_learnable(&self) -> bool {
        self.learnable
    }
}

impl TraitNodeKind for VariableNode {
    fn tag(&self) -> NodeTag {
        NodeTag::Variable
    }

    fn parameter_count(&self) -> usize {
        if self.learnable { self.tensor.numel() } else { 0 }
    }
}
