//! 运动 + 传感状态机
//!
//! 状态机只有两个状态：IDLE（不忙）和 MOVING（忙，带起始时刻和时长）。
//! 每次寄存器写入之后、每次寄存器读取之前都会执行一次更新步，
//! 因此读取总能反映已经开始的运动。
//!
//! 更新步本身是 `&mut self` 方法：并发调用方（如网关）通过外层互斥
//! 串行化访问，保证读取不会观察到更新进行到一半的状态。

use crate::clock::{Clock, SystemClock};
use crate::SimConfig;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use threefg_bus::{BusError, GripperBus};
use threefg_protocol::{
    ControlCommand, GripType, GripperStatus, REG_CONTROL, REG_DIAMETER_OFFSET,
    REG_FINGER_LENGTH, REG_FINGER_POSITION, REG_FINGERTIP_OFFSET, REG_FORCE_APPLIED,
    REG_GRIP_TYPE, REG_MAX_DIAMETER, REG_MIN_DIAMETER, REG_RAW_DIAMETER, REG_STATUS,
    REG_TARGET_DIAMETER, REG_TARGET_FORCE,
};
use tracing::{debug, trace};

/// 基准运动时长；实际时长 = 基准 / simulation_speed
const MOVEMENT_BASE_DURATION: Duration = Duration::from_millis(500);

/// 目标力的合法区间上界
const FORCE_MAX: u16 = 1000;

/// 夹持检测的直径阈值（最大直径的比例）
const GRIP_DIAMETER_RATIO: f64 = 0.9;

/// 达力夹持检测的力阈值（目标力的比例，严格大于）
const FORCE_GRIP_RATIO: f64 = 0.8;

/// 3FG15 仿真引擎
///
/// 构造时 `current_diameter = target_diameter = max_diameter`（完全张开），
/// 随每次寄存器写入和更新步变化，直到引擎被 drop。
pub struct SimulatedGripper {
    config: SimConfig,
    clock: Arc<dyn Clock>,

    // 运动状态（由本引擎独占）
    current_diameter: f64,
    target_diameter: u16,
    start_diameter: f64,
    current_force: f64,
    target_force: u16,
    grip_type: GripType,
    busy: bool,
    movement_start: Option<Instant>,
    movement_duration: Duration,

    // 传感状态
    grip_detected: bool,
    force_grip_detected: bool,
    calibration_ok: bool,

    // 控制寄存器的最后写入值（用于回读）
    last_control: u16,
}

impl SimulatedGripper {
    /// 使用系统时钟创建仿真引擎
    pub fn new(config: SimConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// 使用注入的时钟创建仿真引擎
    pub fn with_clock(config: SimConfig, clock: Arc<dyn Clock>) -> Self {
        let max_diameter = config.max_diameter;
        Self {
            config,
            clock,
            current_diameter: max_diameter as f64,
            target_diameter: max_diameter,
            start_diameter: max_diameter as f64,
            current_force: 0.0,
            target_force: 500,
            grip_type: GripType::External,
            busy: false,
            movement_start: None,
            movement_duration: MOVEMENT_BASE_DURATION,
            grip_detected: false,
            force_grip_detected: false,
            calibration_ok: true,
            last_control: 0,
        }
    }

    /// 引擎配置
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// 当前是否在运动中
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// 开始一次新运动
    ///
    /// 已在运动中时重启计时器（不排队）。
    fn start_movement(&mut self) {
        self.busy = true;
        self.movement_start = Some(self.clock.now());
        self.movement_duration = if self.config.simulation_speed > 0.0 {
            MOVEMENT_BASE_DURATION.div_f64(self.config.simulation_speed)
        } else {
            MOVEMENT_BASE_DURATION
        };
        self.start_diameter = self.current_diameter;
        trace!(
            target_diameter = self.target_diameter,
            target_force = self.target_force,
            duration_ms = self.movement_duration.as_millis() as u64,
            "movement started"
        );
    }

    /// 立即停止：直径和力冻结在当前值
    fn stop_movement(&mut self) {
        self.busy = false;
        self.movement_start = None;
        trace!(current_diameter = self.current_diameter, "movement stopped");
    }

    /// 更新步
    ///
    /// 进度经过对称的 ease-in-out 曲线后在起始直径和目标直径之间
    /// 线性插值；力在直径变化期间按 `min(1, 2·progress)` 爬升，
    /// 否则直接取目标值。进度达到 1 时收尾：busy 清零、直径和力
    /// 精确落到目标值，然后运行夹持检测。
    fn update_movement(&mut self) {
        if !self.busy {
            return;
        }
        let Some(start) = self.movement_start else {
            return;
        };

        let elapsed = self.clock.now().duration_since(start);
        let progress = if self.movement_duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.movement_duration.as_secs_f64()).min(1.0)
        };

        // 对称 ease-in-out
        let t = if progress < 0.5 {
            2.0 * progress * progress
        } else {
            1.0 - 2.0 * (1.0 - progress) * (1.0 - progress)
        };

        let diameter_diff = self.target_diameter as f64 - self.start_diameter;
        self.current_diameter = self.start_diameter + diameter_diff * t;

        if diameter_diff.abs() > 0.0 {
            let force_factor = (progress * 2.0).min(1.0);
            self.current_force = self.target_force as f64 * force_factor;
        } else {
            self.current_force = self.target_force as f64;
        }

        if progress >= 1.0 {
            self.busy = false;
            self.movement_start = None;
            self.current_diameter = self.target_diameter as f64;
            self.current_force = self.target_force as f64;
            self.update_grip_detection();
            debug!(
                diameter = self.target_diameter,
                force = self.target_force,
                grip_detected = self.grip_detected,
                "movement complete"
            );
        }
    }

    /// 夹持检测（当前状态的纯函数，仅在运动收尾后运行）
    ///
    /// `grip_detected = current_diameter < 0.9 · max_diameter`；
    /// `force_grip_detected = grip_detected AND current_force > 0.8 · target_force`
    /// （严格大于）。grip_detected 为 false 时两者都为 false。
    fn update_grip_detection(&mut self) {
        if self.current_diameter < self.config.max_diameter as f64 * GRIP_DIAMETER_RATIO {
            self.grip_detected = true;
            self.force_grip_detected =
                self.current_force > self.target_force as f64 * FORCE_GRIP_RATIO;
        } else {
            self.grip_detected = false;
            self.force_grip_detected = false;
        }
    }

    /// 对遥测值叠加测量噪声
    ///
    /// 均匀分布的相对误差，下限为 0；噪声关闭时原样返回。
    fn add_noise(&self, value: u16) -> u16 {
        if !self.config.enable_noise {
            return value;
        }
        let ratio = self.config.noise_percent / 100.0;
        let noise = rand::thread_rng().gen_range(-ratio..=ratio);
        (value as f64 * (1.0 + noise)).max(0.0) as u16
    }

    fn status(&self) -> GripperStatus {
        GripperStatus {
            busy: self.busy,
            grip_detected: self.grip_detected,
            force_grip_detected: self.force_grip_detected,
            calibration_ok: self.calibration_ok,
        }
    }

    /// 单个寄存器的当前读数
    ///
    /// 未定义的地址返回 0。
    fn register_value(&self, reg: u16) -> u16 {
        match reg {
            REG_TARGET_FORCE => self.target_force,
            REG_TARGET_DIAMETER => self.target_diameter,
            REG_GRIP_TYPE => self.grip_type.as_register(),
            REG_CONTROL => self.last_control,
            REG_STATUS => self.status().to_register(),
            REG_RAW_DIAMETER | REG_DIAMETER_OFFSET => {
                self.add_noise(self.current_diameter.round() as u16)
            }
            REG_FORCE_APPLIED => self.add_noise(self.current_force.round() as u16),
            REG_FINGER_LENGTH => self.config.finger_length,
            REG_FINGER_POSITION => 1,
            REG_FINGERTIP_OFFSET => 0,
            REG_MIN_DIAMETER => self.config.min_diameter,
            REG_MAX_DIAMETER => self.config.max_diameter,
            _ => 0,
        }
    }
}

impl GripperBus for SimulatedGripper {
    fn open_connection(&mut self) -> bool {
        // 仿真连接永远成功
        true
    }

    fn close_connection(&mut self) {}

    fn write_register(&mut self, reg: u16, value: u16) -> Result<(), BusError> {
        match reg {
            REG_TARGET_FORCE => {
                self.target_force = value.min(FORCE_MAX);
            }
            REG_TARGET_DIAMETER => {
                self.target_diameter = value
                    .max(self.config.min_diameter)
                    .min(self.config.max_diameter);
            }
            REG_GRIP_TYPE => {
                self.grip_type = GripType::try_from(value).map_err(BusError::Protocol)?;
            }
            REG_CONTROL => {
                self.last_control = value;
                match ControlCommand::try_from(value) {
                    Ok(command) if command.starts_movement() => self.start_movement(),
                    Ok(ControlCommand::Stop) => {
                        // 先推进到当前时刻，冻结的才是真实的当前位置
                        self.update_movement();
                        self.stop_movement();
                    }
                    Ok(_) => {}
                    Err(_) => {
                        debug!(value, "ignoring unknown control command");
                    }
                }
            }
            _ => {
                debug!(reg, value, "write to unmapped register ignored");
            }
        }

        // 写入后立即推进运动，让随后的读取反映进行中的状态
        self.update_movement();
        Ok(())
    }

    fn write_registers(&mut self, start_reg: u16, values: &[u16]) -> Result<(), BusError> {
        for (i, value) in values.iter().enumerate() {
            self.write_register(start_reg + i as u16, *value)?;
        }
        Ok(())
    }

    fn read_registers(&mut self, reg: u16, count: u16) -> Result<Vec<u16>, BusError> {
        // 读取前先推进运动
        self.update_movement();
        Ok((0..count).map(|i| self.register_value(reg + i)).collect())
    }
}
