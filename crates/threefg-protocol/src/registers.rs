//! 寄存器地址常量定义
//!
//! 地址来自 OnRobot Connectivity Guide v1.20，全部为 0 基协议地址。

/// 目标力（写入，0–1000 = 最大力的万分比）
pub const REG_TARGET_FORCE: u16 = 0;

/// 目标直径（写入，0.1 mm 单位）
pub const REG_TARGET_DIAMETER: u16 = 1;

/// 夹持类型（写入，0=外夹，1=内撑）
pub const REG_GRIP_TYPE: u16 = 2;

/// 控制命令（写入，见 [`crate::control::ControlCommand`]）
pub const REG_CONTROL: u16 = 3;

/// 状态位域（只读，见 [`crate::status::GripperStatus`]）
pub const REG_STATUS: u16 = 256;

/// 当前原始直径（只读，0.1 mm）
pub const REG_RAW_DIAMETER: u16 = 257;

/// 含指尖偏移的当前直径（只读，0.1 mm）
pub const REG_DIAMETER_OFFSET: u16 = 258;

/// 当前施加的力（只读，0.1 %）
pub const REG_FORCE_APPLIED: u16 = 259;

/// 手指长度（只读，0.1 mm）
pub const REG_FINGER_LENGTH: u16 = 270;

/// 手指安装位置（只读，枚举 1–3）
pub const REG_FINGER_POSITION: u16 = 272;

/// 指尖偏移（只读，0.01 mm）
pub const REG_FINGERTIP_OFFSET: u16 = 273;

/// 最小直径（只读，0.1 mm）
pub const REG_MIN_DIAMETER: u16 = 513;

/// 最大直径（只读，0.1 mm）
pub const REG_MAX_DIAMETER: u16 = 514;
