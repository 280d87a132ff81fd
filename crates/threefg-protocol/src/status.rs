//! 状态位域解析
//!
//! 状态寄存器（地址 256）为 16 位位域，低 4 位各对应一个独立标志，
//! 高位保留。解码是纯位置性的：不对标志间的一致性做任何校验
//! （`force_grip_detected` 置位而 `grip_detected` 未置位的值也照常解码）。

/// busy 标志位（bit 0）
pub const STATUS_BIT_BUSY: u16 = 1 << 0;

/// grip_detected 标志位（bit 1）
pub const STATUS_BIT_GRIP_DETECTED: u16 = 1 << 1;

/// force_grip_detected 标志位（bit 2）
pub const STATUS_BIT_FORCE_GRIP_DETECTED: u16 = 1 << 2;

/// calibration_ok 标志位（bit 3）
pub const STATUS_BIT_CALIBRATION_OK: u16 = 1 << 3;

/// 夹爪状态标志
///
/// 四个相互独立的布尔标志，打包在状态寄存器的低 4 位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GripperStatus {
    /// 夹爪正在运动
    pub busy: bool,
    /// 检测到物体
    pub grip_detected: bool,
    /// 检测到达到目标力的夹持
    pub force_grip_detected: bool,
    /// 标定有效
    pub calibration_ok: bool,
}

impl GripperStatus {
    /// 从 16 位状态寄存器值解码
    ///
    /// bit 4 及以上被忽略。
    pub fn from_register(value: u16) -> Self {
        Self {
            busy: value & STATUS_BIT_BUSY != 0,
            grip_detected: value & STATUS_BIT_GRIP_DETECTED != 0,
            force_grip_detected: value & STATUS_BIT_FORCE_GRIP_DETECTED != 0,
            calibration_ok: value & STATUS_BIT_CALIBRATION_OK != 0,
        }
    }

    /// 编码为 16 位状态寄存器值
    pub fn to_register(self) -> u16 {
        let mut value = 0;
        if self.busy {
            value |= STATUS_BIT_BUSY;
        }
        if self.grip_detected {
            value |= STATUS_BIT_GRIP_DETECTED;
        }
        if self.force_grip_detected {
            value |= STATUS_BIT_FORCE_GRIP_DETECTED;
        }
        if self.calibration_ok {
            value |= STATUS_BIT_CALIBRATION_OK;
        }
        value
    }

    /// 是否检测到物体（普通夹持或达力夹持）
    pub fn object_detected(self) -> bool {
        self.grip_detected || self.force_grip_detected
    }
}
