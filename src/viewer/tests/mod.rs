mod node_model;

use crate::viewer::{LayerRef, Node, NodeGraph, OperationKind, TensorRef};

pub(super) fn tensor(shape: &[usize]) -> TensorRef {
    TensorRef::new(shape)
}

pub(super) fn module(id: &str, layer_type: &str, up_modules: &[&str]) -> Node {
    Node::module(id, id, LayerRef::new(layer_type), vec![], vec![])
        .with_up_modules(up_modules.iter().map(|&m| m.into()).collect())
}

pub(super) fn weight(id: &str, name: &str, shape: &[usize], up_modules: &[&str]) -> Node {
    Node::variable(id, name, tensor(shape), true)
        .with_up_modules(up_modules.iter().map(|&m| m.into()).collect())
}

pub(super) fn add_op(id: &str, up_modules: &[&str]) -> Node {
    let op = OperationKind::Add {
        lhs: tensor(&[1, 4]),
        rhs: tensor(&[1, 4]),
    };
    Node::operation(id, id, "aten::add", op, tensor(&[1, 4]))
        .with_up_modules(up_modules.iter().map(|&m| m.into()).collect())
}

/// 一个小模型：
/// ```text
/// model(Generic)
/// ├── block(Generic)
/// │   ├── fc1(Linear): fc1.weight[4,8], fc1.bias[4], fc1.matmul
/// │   └── norm(LayerNorm): norm.weight[4], norm.add
/// └── head(Linear): head.weight[2,4]
/// x[1,8]（根层级的输入，不可学习）
/// ```
/// 参数量：fc1=36，norm=4，block=40，head=8，model=48
pub(super) fn sample_graph() -> NodeGraph {
    let mut graph = NodeGraph::with_name("sample");
    graph.add_node(module("model", "Sequential", &[])).unwrap();
    graph.add_node(module("block", "Block", &["model"])).unwrap();
    graph
        .add_node(module("fc1", "torch.nn.Linear", &["block", "model"]))
        .unwrap();
    graph
        .add_node(weight("fc1.weight", "weight", &[4, 8], &["fc1", "block", "model"]))
        .unwrap();
    graph
        .add_node(weight("fc1.bias", "bias", &[4], &["fc1", "block", "model"]))
        .unwrap();
    let matmul = OperationKind::MatMul {
        lhs: tensor(&[1, 8]),
        rhs: tensor(&[8, 4]),
    };
    graph
        .add_node(
            Node::operation("fc1.matmul", "matmul", "aten::matmul", matmul, tensor(&[1, 4]))
                .with_up_modules(vec!["fc1".into(), "block".into(), "model".into()]),
        )
        .unwrap();
    graph
        .add_node(module("norm", "LayerNorm", &["block", "model"]))
        .unwrap();
    graph
        .add_node(weight("norm.weight", "weight", &[4], &["norm", "block", "model"]))
        .unwrap();
    graph
        .add_node(add_op("norm.add", &["norm", "block", "model"]))
        .unwrap();
    graph.add_node(module("head", "Linear", &["model"])).unwrap();
    graph
        .add_node(weight("head.weight", "weight", &[2, 4], &["head", "model"]))
        .unwrap();
    graph
        .add_node(Node::variable("x", "x", tensor(&[1, 8]), false))
        .unwrap();
    graph
}
