//! # ThreeFG Simulator
//!
//! 3FG15 夹爪的确定性仿真引擎（无硬件依赖）
//!
//! 实现 [`threefg_bus::GripperBus`]，与真实设备适配器在同一契约后
//! 可互换：网关和测试代码不需要知道背后是硬件还是仿真。
//!
//! ## 模块
//!
//! - `clock`: 可注入的单调时钟（测试可手动推进时间）
//! - `gripper`: 运动 + 传感状态机

pub mod clock;
pub mod gripper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use gripper::SimulatedGripper;

/// 仿真引擎配置
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// 最小直径（0.1 mm 单位）
    pub min_diameter: u16,
    /// 最大直径（0.1 mm 单位）
    pub max_diameter: u16,
    /// 手指长度（0.1 mm 单位）
    pub finger_length: u16,
    /// 仿真速度倍率（运动时长 = 0.5 s / 倍率）
    pub simulation_speed: f64,
    /// 是否对遥测值叠加测量噪声
    pub enable_noise: bool,
    /// 噪声幅度（±百分比，相对误差）
    pub noise_percent: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            min_diameter: 0,
            max_diameter: 1000,
            finger_length: 500,
            simulation_speed: 1.0,
            enable_noise: true,
            noise_percent: 2.0,
        }
    }
}
