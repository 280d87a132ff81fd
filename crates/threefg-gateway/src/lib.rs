//! # ThreeFG15 寄存器网关
//!
//! 把一个 [`GripperBus`](threefg_bus::GripperBus) 后端（真实夹爪或仿真引擎）
//! 映射成一块扁平的线圈 / 保持寄存器 / 离散输入 / 输入寄存器地址空间，
//! 供远程协议客户端并发读写：
//!
//! - 线圈写入触发 open / close / move / flex / stop 动作
//! - 保持寄存器写入即时下发力 / 直径 / 夹持类型，命令寄存器是一次性触发器
//! - 状态线圈和宽度输入寄存器每次读取都取实时值
//!
//! 地址映射在构造时固定，此后不可更改。

pub mod config;
pub mod gateway;

pub use config::{AddressMapping, GatewayConfig, PartitionSizes, ReadyTiming};
pub use gateway::RegisterGateway;

use thiserror::Error;

/// 地址空间访问错误
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 访问越过了分区边界
    #[error("{partition} access out of range: address={address}, count={count}, size={size}")]
    AddressOutOfRange {
        partition: &'static str,
        address: u16,
        count: u16,
        size: u16,
    },
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
