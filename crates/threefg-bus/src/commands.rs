//! 高层命令扩展
//!
//! [`GripperCommands`] 只依赖 [`GripperBus`] 的原语，通过 blanket impl
//! 对所有后端一次性实现，没有任何针对具体后端的分支。
//!
//! 错误处理约定：
//! - `set_*` 原语写入失败时把 [`BusError`] 传回调用方
//! - `get_*` 遥测读取失败时返回 `None`（轮询方需要区分
//!   「读不到」和「读到 false/0」）
//! - `open_gripper` 等便捷序列捕获错误、记录日志并中止剩余子步骤，
//!   不向外传播

use crate::{BusError, GripperBus};
use threefg_protocol::{
    ControlCommand, GripType, GripperStatus, REG_CONTROL, REG_DIAMETER_OFFSET, REG_FORCE_APPLIED,
    REG_GRIP_TYPE, REG_MAX_DIAMETER, REG_MIN_DIAMETER, REG_RAW_DIAMETER, REG_STATUS,
    REG_TARGET_DIAMETER, REG_TARGET_FORCE, TELEMETRY_SCALE,
};
use tracing::error;

/// 由 [`GripperBus`] 原语派生的高层操作
///
/// 力值由调用方给定（0–1000 = 0–100%），本层不设缺省。
pub trait GripperCommands: GripperBus {
    /// 设置目标力（0–1000 = 0–100%）
    fn set_target_force(&mut self, force: u16) -> Result<(), BusError> {
        self.write_register(REG_TARGET_FORCE, force)
    }

    /// 设置目标直径（0.1 mm 单位）
    fn set_target_diameter(&mut self, diameter: u16) -> Result<(), BusError> {
        self.write_register(REG_TARGET_DIAMETER, diameter)
    }

    /// 设置夹持类型
    fn set_grip_type(&mut self, grip_type: GripType) -> Result<(), BusError> {
        self.write_register(REG_GRIP_TYPE, grip_type.as_register())
    }

    /// 发送控制命令
    fn set_control(&mut self, command: ControlCommand) -> Result<(), BusError> {
        self.write_register(REG_CONTROL, command.as_register())
    }

    /// 读取状态寄存器并解码
    ///
    /// 读取失败返回 `None`，不视为致命错误。
    fn get_status(&mut self) -> Option<GripperStatus> {
        match self.read_register(REG_STATUS) {
            Ok(value) => Some(GripperStatus::from_register(value)),
            Err(_) => None,
        }
    }

    /// 读取当前原始直径（mm）
    fn get_raw_diameter(&mut self) -> Option<f64> {
        self.read_register(REG_RAW_DIAMETER)
            .ok()
            .map(|raw| raw as f64 / TELEMETRY_SCALE)
    }

    /// 读取含指尖偏移的当前直径（mm）
    fn get_diameter_with_offset(&mut self) -> Option<f64> {
        self.read_register(REG_DIAMETER_OFFSET)
            .ok()
            .map(|raw| raw as f64 / TELEMETRY_SCALE)
    }

    /// 读取当前施加的力（%）
    fn get_force_applied(&mut self) -> Option<f64> {
        self.read_register(REG_FORCE_APPLIED)
            .ok()
            .map(|raw| raw as f64 / TELEMETRY_SCALE)
    }

    /// 以给定力完全张开夹爪
    ///
    /// 读取设备的最大直径寄存器，然后依次写入力、目标直径、
    /// 夹持类型（外夹）并发送 GRIP 命令。直径读取失败时记录日志
    /// 并中止，不发出任何部分写入。
    fn open_gripper(&mut self, force: u16) {
        let result = (|| -> Result<(), BusError> {
            let max_diameter = self.read_register(REG_MAX_DIAMETER)?;
            self.set_target_force(force)?;
            self.set_target_diameter(max_diameter)?;
            self.set_grip_type(GripType::External)?;
            self.set_control(ControlCommand::Grip)
        })();
        if let Err(e) = result {
            error!(error = %e, "open_gripper aborted");
        }
    }

    /// 以给定力完全闭合夹爪
    ///
    /// 与 [`open_gripper`](GripperCommands::open_gripper) 对称，
    /// 目标直径取自最小直径寄存器。
    fn close_gripper(&mut self, force: u16) {
        let result = (|| -> Result<(), BusError> {
            let min_diameter = self.read_register(REG_MIN_DIAMETER)?;
            self.set_target_force(force)?;
            self.set_target_diameter(min_diameter)?;
            self.set_grip_type(GripType::External)?;
            self.set_control(ControlCommand::Grip)
        })();
        if let Err(e) = result {
            error!(error = %e, "close_gripper aborted");
        }
    }

    /// 移动到目标直径
    ///
    /// 依次写入力、直径、夹持类型并发送 GRIP 命令。
    /// 本层不做直径钳位，钳位是后端引擎的职责。
    fn move_gripper(&mut self, diameter: u16, force: u16, grip_type: GripType) {
        let result = (|| -> Result<(), BusError> {
            self.set_target_force(force)?;
            self.set_target_diameter(diameter)?;
            self.set_grip_type(grip_type)?;
            self.set_control(ControlCommand::Grip)
        })();
        if let Err(e) = result {
            error!(error = %e, "move_gripper aborted");
        }
    }

    /// 柔性夹持
    ///
    /// 写入顺序与 [`move_gripper`](GripperCommands::move_gripper) 相同，
    /// 命令改为 FLEXIBLE_GRIP。
    fn flex_grip(&mut self, diameter: u16, force: u16, grip_type: GripType) {
        let result = (|| -> Result<(), BusError> {
            self.set_target_force(force)?;
            self.set_target_diameter(diameter)?;
            self.set_grip_type(grip_type)?;
            self.set_control(ControlCommand::FlexibleGrip)
        })();
        if let Err(e) = result {
            error!(error = %e, "flex_grip aborted");
        }
    }

    /// 是否检测到物体
    ///
    /// `grip_detected OR force_grip_detected`；状态不可读时返回 false。
    fn detect_object(&mut self) -> bool {
        self.get_status()
            .map(|status| status.object_detected())
            .unwrap_or(false)
    }
}

impl<T: GripperBus + ?Sized> GripperCommands for T {}
