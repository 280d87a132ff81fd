//! # 网关配置
//!
//! 地址映射、分区大小和就绪等待参数。所有字段都有与默认部署
//! 一致的缺省值，配置文件只需覆盖关心的键。

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 四个地址分区的大小
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionSizes {
    pub coils: u16,
    pub discrete_inputs: u16,
    pub holding_registers: u16,
    pub input_registers: u16,
}

impl Default for PartitionSizes {
    fn default() -> Self {
        Self {
            coils: 64,
            discrete_inputs: 64,
            holding_registers: 128,
            input_registers: 128,
        }
    }
}

/// 线圈 / 寄存器索引到夹爪语义的映射
///
/// `close_coil` 为 `None` 时 open 线圈是单线圈语义：写 true 开、
/// 写 false 合；配置了独立的 close 线圈后 open 线圈只响应 true。
/// move / flex / stop 线圈各自可选，未配置即禁用。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressMapping {
    pub open_coil: u16,
    pub close_coil: Option<u16>,
    pub move_coil: Option<u16>,
    pub flex_coil: Option<u16>,
    pub stop_coil: Option<u16>,

    /// ready 状态线圈（非忙时为 true）
    pub ready_coil: u16,
    pub open_status_coil: u16,
    pub closed_status_coil: u16,
    pub grip_status_coil: u16,

    pub force_register: u16,
    pub diameter_register: u16,
    pub grip_type_register: u16,
    /// 一次性命令寄存器，`None` 时禁用
    pub command_register: Option<u16>,

    /// 实时宽度输入寄存器
    pub width_register: u16,
}

impl Default for AddressMapping {
    fn default() -> Self {
        Self {
            open_coil: 0,
            close_coil: None,
            move_coil: None,
            flex_coil: None,
            stop_coil: None,
            ready_coil: 2,
            open_status_coil: 3,
            closed_status_coil: 4,
            grip_status_coil: 5,
            force_register: 0,
            diameter_register: 1,
            grip_type_register: 2,
            command_register: Some(3),
            width_register: 0,
        }
    }
}

/// 触发命令前等待设备就绪的参数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadyTiming {
    /// 等待上限（毫秒）；超时只告警，不取消命令
    pub timeout_ms: u64,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
}

impl Default for ReadyTiming {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl ReadyTiming {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 网关总配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub partitions: PartitionSizes,
    pub mapping: AddressMapping,
    pub ready: ReadyTiming,
}

impl GatewayConfig {
    /// 从 TOML 文件加载配置，缺失的键取缺省值
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
