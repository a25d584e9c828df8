/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 布局引擎：按嵌套深度缩小宽度、按参数量占比决定高度
 *                 各层类型可登记自己的尺寸策略，整体替换默认策略
 */

use std::collections::HashMap;

use tracing::info;

use super::{GraphError, LayerKind, LayoutConfig, NodeGraph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// 尺寸策略的输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingInput {
    /// 嵌套深度（外层模块链长度）
    pub depth: usize,
    pub nb_parameters: usize,
    /// 全图所有模块中最大的参数量
    pub max_parameters: usize,
}

impl SizingInput {
    /// 参数量占比；`max_parameters == 0`时按0处理
    pub fn ratio(&self) -> f64 {
        if self.max_parameters == 0 {
            0.0
        } else {
            self.nb_parameters as f64 / self.max_parameters as f64
        }
    }
}

pub type SizingFn = fn(&SizingInput, &LayoutConfig) -> Size;

/// 通用模块的默认策略
pub fn default_size(input: &SizingInput, config: &LayoutConfig) -> Size {
    // 根模块的层级为负，宽度会超过`base_width`
    let level = input.depth as i32 - config.level_offset;
    Size {
        width: config.base_width * config.shrink_factor.powi(level),
        height: input.ratio() * config.max_height,
    }
}

/// 全连接层：不随嵌套缩小，直接按参数量占比放大
pub fn linear_size(input: &SizingInput, config: &LayoutConfig) -> Size {
    let scale = 1.0 + input.ratio();
    Size {
        width: config.linear_width * scale,
        height: config.linear_height * scale,
    }
}

/// 只为模块节点定尺寸，变量和算子节点由渲染端自行决定
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    overrides: HashMap<LayerKind, SizingFn>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let mut overrides: HashMap<LayerKind, SizingFn> = HashMap::new();
        overrides.insert(LayerKind::Linear, linear_size);
        Self { config, overrides }
    }

    /// 为某种层类型登记（或替换）尺寸策略
    pub fn with_override(mut self, kind: LayerKind, sizing: SizingFn) -> Self {
        self.overrides.insert(kind, sizing);
        self
    }

    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// 按层类型查策略表，没有专门策略时回落到默认策略
    pub fn sizing_fn(&self, kind: LayerKind) -> SizingFn {
        self.overrides.get(&kind).copied().unwrap_or(default_size)
    }

    /// 计算并写入单个模块的宽高；非模块节点返回`Ok(None)`且不改动
    pub fn compute_size(
        &self,
        graph: &mut NodeGraph,
        id: &NodeId,
        max_parameters: usize,
    ) -> Result<Option<Size>, GraphError> {
        let node = graph.node(id)?;
        let Some(module) = node.as_module() else {
            return Ok(None);
        };
        let nb_parameters = module
            .nb_parameters()
            .ok_or_else(|| GraphError::PrematureFinalize { module: id.clone() })?;
        let input = SizingInput {
            depth: node.depth(),
            nb_parameters,
            max_parameters,
        };
        let size = self.sizing_fn(module.layer_kind())(&input, &self.config);
        let size = Size {
            width: size.width.max(self.config.min_size),
            height: size.height.max(self.config.min_size),
        };

        let pos = graph.node_mut(id)?.pos_mut();
        pos.width = size.width;
        pos.height = size.height;
        Ok(Some(size))
    }

    /// 对整图做一次布局：由外向内依次为所有模块定尺寸，返回处理的模块数
    pub fn layout(&self, graph: &mut NodeGraph) -> Result<usize, GraphError> {
        let max_parameters = graph.max_parameters()?;
        let mut modules: Vec<(usize, NodeId)> = graph
            .nodes()
            .filter(|node| node.is_module())
            .map(|node| (node.depth(), node.id().clone()))
            .collect();
        modules.sort_by_key(|(depth, _)| *depth);

        for (_, id) in &modules {
            self.compute_size(graph, id, max_parameters)?;
        }
        info!(graph = graph.name(), modules = modules.len(), max_parameters, "布局完成");
        Ok(modules.len())
    }
}
