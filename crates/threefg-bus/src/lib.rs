//! # ThreeFG Bus Adapter Layer
//!
//! 夹爪总线抽象层，提供统一的寄存器读写接口抽象。
//!
//! 任何后端（真实 Modbus 设备、仿真引擎、测试替身）只需实现
//! [`GripperBus`] 的五个原语，即可通过 [`GripperCommands`]
//! 获得完全一致的高层操作实现。

use thiserror::Error;

pub use threefg_protocol::ProtocolError;

pub mod commands;
pub mod modbus;

pub use commands::GripperCommands;
pub use modbus::{ModbusEndpoint, ModbusGripper, RegisterTransport};

/// 总线层统一错误类型
#[derive(Error, Debug)]
pub enum BusError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] BusDeviceError),
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("Operation timeout")]
    Timeout,
    #[error("Not connected")]
    NotConnected,
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusDeviceErrorKind {
    Unknown,
    NotFound,
    NoDevice,
    AccessDenied,
    Busy,
    WriteRejected,
    ReadRejected,
    InvalidResponse,
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct BusDeviceError {
    pub kind: BusDeviceErrorKind,
    pub message: String,
}

impl BusDeviceError {
    pub fn new(kind: BusDeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            BusDeviceErrorKind::NoDevice
                | BusDeviceErrorKind::AccessDenied
                | BusDeviceErrorKind::NotFound
        )
    }
}

impl From<String> for BusDeviceError {
    fn from(message: String) -> Self {
        Self::new(BusDeviceErrorKind::Unknown, message)
    }
}

impl From<&str> for BusDeviceError {
    fn from(message: &str) -> Self {
        Self::new(BusDeviceErrorKind::Unknown, message)
    }
}

/// 夹爪后端必须提供的最小能力契约
///
/// # 设计目的
///
/// `GripperBus` 是高层命令和具体后端之间的中间抽象：
/// - **层次解耦**：高层操作不依赖底层实现（真实设备 / 仿真引擎）
/// - **寄存器语义**：本层只处理已解码的寄存器读写，线路层帧的
///   编解码属于外部传输层，不在此抽象内
///
/// # 约定
///
/// - `write_registers` 在可观察行为上等价于按地址顺序逐个
///   `write_register`，除此之外没有原子性保证
/// - `read_registers` / `write_register` 在设备或传输层拒绝时返回
///   [`BusError`]，由调用方决定如何处理
pub trait GripperBus {
    /// 建立连接
    ///
    /// 幂等；连接被拒绝时返回 false，而不是错误。
    fn open_connection(&mut self) -> bool;

    /// 释放连接资源
    ///
    /// 未连接时调用也是安全的。
    fn close_connection(&mut self);

    /// 写入单个寄存器
    fn write_register(&mut self, reg: u16, value: u16) -> Result<(), BusError>;

    /// 从 `start_reg` 开始写入连续的寄存器块
    fn write_registers(&mut self, start_reg: u16, values: &[u16]) -> Result<(), BusError>;

    /// 从 `reg` 开始读取 `count` 个寄存器
    fn read_registers(&mut self, reg: u16, count: u16) -> Result<Vec<u16>, BusError>;

    /// 读取单个寄存器
    fn read_register(&mut self, reg: u16) -> Result<u16, BusError> {
        let regs = self.read_registers(reg, 1)?;
        regs.first().copied().ok_or_else(|| {
            BusError::Device(BusDeviceError::new(
                BusDeviceErrorKind::InvalidResponse,
                format!("empty response reading register {reg}"),
            ))
        })
    }
}
