use super::{module, tensor, weight};
use crate::viewer::{
    Color, LayerKind, LayerRef, Node, NodeId, NodeTag, OperationKind, RenderHint, TraitNodeKind,
    VariableNode,
};
use std::collections::HashSet;

#[test]
fn test_node_identity_is_id_only() {
    let a = Node::variable("n1", "a", tensor(&[2, 2]), true);
    let b = Node::variable("n1", "b", tensor(&[3]), false);
    let c = Node::variable("n2", "a", tensor(&[2, 2]), true);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let mut set = HashSet::new();
    set.insert(a);
    // 同id的不同对象视为同一个实体
    assert!(!set.insert(b));
    assert!(set.insert(c));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_add_parent_and_children_append_without_dedup() {
    let mut node = Node::variable("n", "n", tensor(&[1]), false);
    node.add_parent("p".into());
    node.add_parent("p".into());
    node.add_children("c1".into());
    node.add_children("c2".into());
    assert_eq!(node.parents(), &[NodeId::new("p"), NodeId::new("p")]);
    assert_eq!(node.children(), &[NodeId::new("c1"), NodeId::new("c2")]);
    assert!(node.flying_parents().is_empty());
    assert!(node.flying_children().is_empty());
}

#[test]
fn test_new_node_defaults() {
    let node = Node::variable("n", "n", tensor(&[1]), false);
    assert_eq!(node.depth(), 0);
    assert!(node.upper_module().is_none());
    assert_eq!(node.color(), Color::BLACK);
    assert_eq!(node.pos().width, 0.0);
    assert_eq!(node.tag(), NodeTag::Variable);
}

#[test]
fn test_variable_parameter_count() {
    // 可学习的权重按元素个数计
    let w = VariableNode::new(tensor(&[4, 8]), true);
    assert_eq!(w.parameter_count(), 32);
    // 激活值不计入参数量
    let act = VariableNode::new(tensor(&[4, 8]), false);
    assert_eq!(act.parameter_count(), 0);
    // 标量
    let scalar = VariableNode::new(tensor(&[]), true);
    assert_eq!(scalar.parameter_count(), 1);
    // 算子与模块节点自身没有参数
    let op = Node::operation(
        "o",
        "o",
        "aten::exp",
        OperationKind::Exp { input: tensor(&[3]) },
        tensor(&[3]),
    );
    assert_eq!(op.parameter_count(), 0);
    assert_eq!(module("m", "Linear", &[]).parameter_count(), 0);
}

#[test]
fn test_layer_kind_from_type_name() {
    assert_eq!(LayerKind::from_type_name("Linear"), LayerKind::Linear);
    assert_eq!(LayerKind::from_type_name("torch.nn.Linear"), LayerKind::Linear);
    assert_eq!(LayerKind::from_type_name("nn::LayerNorm"), LayerKind::LayerNorm);
    assert_eq!(LayerKind::from_type_name("Conv2d"), LayerKind::Conv2d);
    assert_eq!(LayerKind::from_type_name("Conv1d"), LayerKind::Conv1d);
    assert_eq!(LayerKind::from_type_name("Embedding"), LayerKind::Embedding);
    assert_eq!(LayerKind::from_type_name("GPT2Block"), LayerKind::Generic);
}

#[test]
fn test_render_hint_dispatch_by_tag() {
    let attention = OperationKind::AttentionProduct {
        query: tensor(&[2, 5, 16]),
        key: tensor(&[2, 7, 16]),
        value: tensor(&[2, 7, 16]),
        mask: None,
    };
    let node = Node::operation("att", "att", "sdpa", attention, tensor(&[2, 5, 16]));
    assert_eq!(node.render_hint(), RenderHint::AttentionMatrix);

    let transpose = OperationKind::Transpose {
        input: tensor(&[3, 4]),
    };
    let node = Node::operation("t", "t", "aten::transpose", transpose, tensor(&[4, 3]));
    assert_eq!(node.render_hint(), RenderHint::TransposeIcon);

    assert_eq!(
        module("fc", "Linear", &[]).render_hint(),
        RenderHint::FullyConnectedIcon
    );
    assert_eq!(module("n", "LayerNorm", &[]).render_hint(), RenderHint::Plain);
    assert_eq!(
        weight("w", "weight", &[2], &[]).render_hint(),
        RenderHint::Plain
    );
}

#[test]
fn test_attention_matrix_shape() {
    let attention = OperationKind::AttentionProduct {
        query: tensor(&[2, 5, 16]),
        key: tensor(&[2, 7, 16]),
        value: tensor(&[2, 7, 16]),
        mask: Some(tensor(&[5, 7])),
    };
    assert_eq!(attention.attention_matrix_shape(), Some(vec![2, 5, 7]));
    assert_eq!(attention.operands().len(), 4);

    // 特征维不一致
    let mismatched = OperationKind::AttentionProduct {
        query: tensor(&[5, 16]),
        key: tensor(&[7, 8]),
        value: tensor(&[7, 8]),
        mask: None,
    };
    assert_eq!(mismatched.attention_matrix_shape(), None);
    assert_eq!(mismatched.operands().len(), 3);

    // 非注意力算子
    let add = OperationKind::Add {
        lhs: tensor(&[2]),
        rhs: tensor(&[2]),
    };
    assert_eq!(add.attention_matrix_shape(), None);
}

#[test]
fn test_operation_catalog_fields() {
    let mean = OperationKind::Mean {
        input: tensor(&[4, 3]),
        dim: -1,
    };
    assert_eq!(mean.catalog_name(), "Mean");
    assert_eq!(mean.operands(), vec![&tensor(&[4, 3])]);

    let pow = OperationKind::Pow {
        input: tensor(&[3]),
        exponent: 2.0,
    };
    assert_eq!(pow.operands().len(), 1);

    let cat = OperationKind::Cat {
        inputs: vec![tensor(&[1, 2]), tensor(&[1, 2]), tensor(&[1, 2])],
    };
    assert_eq!(cat.operands().len(), 3);

    let get_item = OperationKind::GetItem {
        input: tensor(&[4, 4]),
        slice: "[:, 0]".to_string(),
    };
    assert_eq!(get_item.catalog_name(), "GetItem");
}

#[test]
fn test_node_display() {
    let node = Node::module("m1", "encoder", LayerRef::new("Linear"), vec![], vec![]);
    assert_eq!(format!("{}", node), "节点[id=m1, name=encoder, type=Linear]");
    let node = Node::variable("v1", "x", tensor(&[1]), false);
    assert_eq!(format!("{}", node), "节点[id=v1, name=x, type=Variable]");
    // 嵌套节点附带深度（嵌套路径在登记进图前不做校验）
    let node = weight("fc.w", "weight", &[2], &["fc", "block"]);
    assert_eq!(
        format!("{}", node),
        "节点[id=fc.w, name=weight, type=Variable, depth=2]"
    );
}
