/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 布局参数配置，调整布局时无需改动核心逻辑
 */

use serde::{Deserialize, Serialize};

/// 布局引擎的可调参数；JSON 中缺省的字段取默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// 嵌套层级为0（深度等于`level_offset`）的模块宽度
    pub base_width: f64,
    /// 参数量最大的模块的高度
    pub max_height: f64,
    /// 每深一层的宽度缩放系数
    pub shrink_factor: f64,
    /// 从深度换算层级时减去的偏移量：最外面的这几层共享基础宽度
    pub level_offset: i32,
    /// 宽、高的下限，保证可见、可点击
    pub min_size: f64,
    /// 全连接层的基础宽度
    pub linear_width: f64,
    /// 全连接层的基础高度
    pub linear_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_width: 250.0,
            max_height: 500.0,
            shrink_factor: 0.8,
            level_offset: 2,
            min_size: 25.0,
            linear_width: 50.0,
            linear_height: 70.0,
        }
    }
}

impl LayoutConfig {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
