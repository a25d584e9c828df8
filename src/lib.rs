//! # nn_viewer
//!
//! 把神经网络的一次执行轨迹建模为带类型的层级节点图（张量、基本算子、模块），
//! 并为每个模块计算嵌套框布局所需的宽高，供渲染端直接读取。
//!

pub mod utils;
pub mod viewer;
