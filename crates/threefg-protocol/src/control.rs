//! 控制命令和夹持类型定义
//!
//! 两套命令编码互相独立，不可混用：
//!
//! - [`ControlCommand`]: 设备控制寄存器（地址 3）接受的低层命令
//! - [`GatewayCommand`]: 网关可选命令寄存器接受的高层命令
//!
//! 所有枚举都通过校验的 `TryFrom<u16>` 构造，非法值返回
//! [`ProtocolError::InvalidValue`]，从不静默回退到默认值。

use crate::ProtocolError;

/// 夹持类型
///
/// - `External`: 从外侧夹住物体
/// - `Internal`: 向内撑开空腔
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GripType {
    /// 外夹
    #[default]
    External = 0,
    /// 内撑
    Internal = 1,
}

impl GripType {
    /// 转换为寄存器值
    pub fn as_register(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for GripType {
    type Error = ProtocolError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GripType::External),
            1 => Ok(GripType::Internal),
            _ => Err(ProtocolError::InvalidValue {
                field: "GripType".to_string(),
                value,
            }),
        }
    }
}

/// 设备控制命令（控制寄存器，地址 3）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// 夹持（运动到目标直径并保持力）
    Grip = 1,
    /// 移动（不保持力）
    Move = 2,
    /// 立即停止
    Stop = 4,
    /// 柔性夹持
    FlexibleGrip = 5,
}

impl ControlCommand {
    /// 转换为寄存器值
    pub fn as_register(self) -> u16 {
        self as u16
    }

    /// 此命令是否触发一次新的运动
    pub fn starts_movement(self) -> bool {
        matches!(
            self,
            ControlCommand::Grip | ControlCommand::Move | ControlCommand::FlexibleGrip
        )
    }
}

impl TryFrom<u16> for ControlCommand {
    type Error = ProtocolError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ControlCommand::Grip),
            2 => Ok(ControlCommand::Move),
            4 => Ok(ControlCommand::Stop),
            5 => Ok(ControlCommand::FlexibleGrip),
            _ => Err(ProtocolError::InvalidValue {
                field: "ControlCommand".to_string(),
                value,
            }),
        }
    }
}

/// 网关高层命令（可选命令寄存器）
///
/// 编码与 [`ControlCommand`] 不同：这是网关自己的一次性触发寄存器，
/// 写入后由网关执行对应的高层操作并将寄存器清零。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCommand {
    /// 移动到保持寄存器中的目标直径
    Move = 1,
    /// 柔性夹持
    Flex = 2,
    /// 停止
    Stop = 3,
    /// 完全张开
    Open = 4,
    /// 完全闭合
    Close = 5,
}

impl TryFrom<u16> for GatewayCommand {
    type Error = ProtocolError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GatewayCommand::Move),
            2 => Ok(GatewayCommand::Flex),
            3 => Ok(GatewayCommand::Stop),
            4 => Ok(GatewayCommand::Open),
            5 => Ok(GatewayCommand::Close),
            _ => Err(ProtocolError::InvalidValue {
                field: "GatewayCommand".to_string(),
                value,
            }),
        }
    }
}
