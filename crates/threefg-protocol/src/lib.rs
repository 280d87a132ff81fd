//! # ThreeFG Protocol
//!
//! ThreeFG15 夹爪的寄存器协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `registers`: 寄存器地址常量定义
//! - `status`: 状态位域解析
//! - `control`: 控制命令和夹持类型定义
//!
//! ## 寄存器模型
//!
//! 夹爪通过 16 位保持寄存器控制：地址 0-3 为写入区（目标力、目标直径、
//! 夹持类型、控制命令），地址 256 起为只读遥测区（状态位域、当前直径、
//! 当前力），地址 513/514 为设备几何参数（最小/最大直径）。
//! 本模块不构造也不解析线路层 Modbus 帧，只定义寄存器语义。

pub mod control;
pub mod registers;
pub mod status;

// 重新导出常用类型
pub use control::*;
pub use registers::*;
pub use status::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u16 },

    #[error("Unknown register address: {address}")]
    UnknownRegister { address: u16 },
}

/// 遥测寄存器的固定缩放因子
///
/// 直径寄存器单位为 0.1 mm，力寄存器单位为 0.1 %。
/// 读取后除以 10 得到 mm / % 的浮点值。
pub const TELEMETRY_SCALE: f64 = 10.0;

/// 将 0.1 mm 单位的寄存器值转换为 mm
pub fn raw_to_mm(raw: u16) -> f64 {
    raw as f64 / TELEMETRY_SCALE
}

/// 将 mm 转换为 0.1 mm 单位的寄存器值（四舍五入）
pub fn mm_to_raw(mm: f64) -> u16 {
    (mm * TELEMETRY_SCALE).round().max(0.0) as u16
}

/// 将 0.1 % 单位的寄存器值转换为 %
pub fn raw_to_percent(raw: u16) -> f64 {
    raw as f64 / TELEMETRY_SCALE
}
