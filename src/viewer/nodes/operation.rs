use serde::{Deserialize, Serialize};

use super::{NodeTag, RenderHint, TensorRef, TraitNodeKind};

/// 算子目录：每种算子在公共的`OperationNode`之上带有各自的额外字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum OperationKind {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓二元算术↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Add { lhs: TensorRef, rhs: TensorRef },
    Sub { lhs: TensorRef, rhs: TensorRef },
    Mul { lhs: TensorRef, rhs: TensorRef },
    Div { lhs: TensorRef, rhs: TensorRef },
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑二元算术↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    MatMul { lhs: TensorRef, rhs: TensorRef },
    /// 批量矩阵乘
    Bmm { lhs: TensorRef, rhs: TensorRef },
    /// 缩放点积注意力
    AttentionProduct {
        query: TensorRef,
        key: TensorRef,
        value: TensorRef,
        #[serde(default)]
        mask: Option<TensorRef>,
    },
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓归约↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Mean { input: TensorRef, dim: i64 },
    Sum { input: TensorRef, dim: i64 },
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑归约↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    Pow { input: TensorRef, exponent: f64 },
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓形状↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    View { input: TensorRef },
    Transpose { input: TensorRef },
    Expand { input: TensorRef },
    Cat { inputs: Vec<TensorRef> },
    Stack { inputs: Vec<TensorRef> },
    GetItem { input: TensorRef, slice: String },
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑形状↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    Exp { input: TensorRef },
}

impl OperationKind {
    pub const fn catalog_name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "Add",
            Self::Sub { .. } => "Sub",
            Self::Mul { .. } => "Mul",
            Self::Div { .. } => "Div",
            Self::MatMul { .. } => "MatMul",
            Self::Bmm { .. } => "Bmm",
            Self::AttentionProduct { .. } => "AttentionProduct",
            Self::Mean { .. } => "Mean",
            Self::Sum { .. } => "Sum",
            Self::Pow { .. } => "Pow",
            Self::View { .. } => "View",
            Self::Transpose { .. } => "Transpose",
            Self::Expand { .. } => "Expand",
            Self::Cat { .. } => "Cat",
            Self::Stack { .. } => "Stack",
            Self::GetItem { .. } => "GetItem",
            Self::Exp { .. } => "Exp",
        }
    }

    /// 按声明顺序返回所有操作数（注意力的mask存在时排在最后）
    pub fn operands(&self) -> Vec<&TensorRef> {
        match self {
            Self::Add { lhs, rhs }
            | Self::Sub { lhs, rhs }
            | Self::Mul { lhs, rhs }
            | Self::Div { lhs, rhs }
            | Self::MatMul { lhs, rhs }
            | Self::Bmm { lhs, rhs } => vec![lhs, rhs],
            Self::AttentionProduct {
                query,
                key,
                value,
                mask,
            } => {
                let mut operands = vec![query, key, value];
                operands.extend(mask.iter());
                operands
            }
            Self::Mean { input, .. }
            | Self::Sum { input, .. }
            | Self::Pow { input, .. }
            | Self::View { input }
            | Self::Transpose { input }
            | Self::Expand { input }
            | Self::GetItem { input, .. }
            | Self::Exp { input } => vec![input],
            Self::Cat { inputs } | Self::Stack { inputs } => inputs.iter().collect(),
        }
    }

    /// 注意力分数矩阵`query @ key^T`的形状
    ///
    /// 非注意力算子，或query/key的阶数不足2、特征维不一致时返回None
    pub fn attention_matrix_shape(&self) -> Option<Vec<usize>> {
        let Self::AttentionProduct { query, key, .. } = self else {
            return None;
        };
        let (q, k) = (&query.shape, &key.shape);
        if q.len() < 2 || k.len() < 2 || q[q.len() - 1] != k[k.len() - 1] {
            return None;
        }
        let mut shape = q[..q.len() - 1].to_vec();
        shape.push(k[k.len() - 2]);
        Some(shape)
    }
}

/// 基本运算节点
#[derive(Debug, Clone, PartialEq)]
pub struct OperationNode {
    // 追踪器给出的函数名（如"aten::matmul"）
    function: String,
    op: OperationKind,
    output: TensorRef,
}

impl OperationNode {
    pub fn new(function: &str, op: OperationKind, output: TensorRef) -> Self {
        Self {
            function: function.to_string(),
            op,
            output,
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub const fn op(&self) -> &OperationKind {
        &self.op
    }

    pub const fn output(&self) -> &TensorRef {
        &self.output
    }
}

impl TraitNodeKind for OperationNode {
    fn tag(&self) -> NodeTag {
        NodeTag::Operation
    }

    fn render_hint(&self) -> RenderHint {
        match self.op {
            OperationKind::AttentionProduct { .. } => RenderHint::AttentionMatrix,
            OperationKind::Transpose { .. } => RenderHint::TransposeIcon,
            _ => RenderHint::Plain,
        }
    }
}
