//! 地址空间复用器
//!
//! 所有分区状态和后端总线都在同一把 [`Mutex`] 后面：
//! 每个触发型写入（读参数 + 下发动作）是一个完整的临界区，
//! 并发客户端不可能拿到一半来自 A、一半来自 B 的参数对；
//! 状态读取同样经过锁，不会观察到更新进行到一半的引擎状态。

use crate::config::{AddressMapping, GatewayConfig, ReadyTiming};
use crate::GatewayError;
use parking_lot::Mutex;
use std::thread;
use std::time::Instant;
use threefg_bus::{GripperBus, GripperCommands};
use threefg_protocol::{ControlCommand, GatewayCommand, GripType, REG_MAX_DIAMETER, REG_MIN_DIAMETER};
use tracing::{debug, error, info, warn};

/// open / closed 状态线圈的宽度容差（0.1 mm 单位，即 0.5 mm）
const WIDTH_TOLERANCE: u16 = 5;

/// 把后端夹爪暴露为地址映射设备的网关
///
/// 地址映射和就绪等待参数在构造时冻结；后端状态由内部互斥锁保护，
/// 可以从多个并发调用上下文安全使用。
pub struct RegisterGateway<B: GripperBus> {
    config: GatewayConfig,
    inner: Mutex<Inner<B>>,
}

struct Inner<B> {
    bus: B,
    connected: bool,
    coils: Vec<bool>,
    discrete_inputs: Vec<bool>,
    holding_registers: Vec<u16>,
    input_registers: Vec<u16>,
    // 连接时学到的直径范围（0.1 mm），用于 open/closed 判定和预夹
    min_diameter: Option<u16>,
    max_diameter: Option<u16>,
}

impl<B: GripperBus> RegisterGateway<B> {
    pub fn new(bus: B, config: GatewayConfig) -> Self {
        let partitions = config.partitions;
        Self {
            inner: Mutex::new(Inner {
                bus,
                connected: false,
                coils: vec![false; partitions.coils as usize],
                discrete_inputs: vec![false; partitions.discrete_inputs as usize],
                holding_registers: vec![0; partitions.holding_registers as usize],
                input_registers: vec![0; partitions.input_registers as usize],
                min_diameter: None,
                max_diameter: None,
            }),
            config,
        }
    }

    /// 地址映射（构造后不可变）
    pub fn mapping(&self) -> &AddressMapping {
        &self.config.mapping
    }

    /// 打开后端连接并学习直径范围
    ///
    /// 范围读取失败只告警，不影响连接结果。
    pub fn connect(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.connected = inner.bus.open_connection();
        if !inner.connected {
            error!("failed to connect to gripper backend");
            return false;
        }

        info!("connected to gripper backend");
        match inner.bus.read_register(REG_MIN_DIAMETER) {
            Ok(value) => inner.min_diameter = Some(value),
            Err(e) => warn!(error = %e, "could not read min diameter"),
        }
        match inner.bus.read_register(REG_MAX_DIAMETER) {
            Ok(value) => inner.max_diameter = Some(value),
            Err(e) => warn!(error = %e, "could not read max diameter"),
        }
        info!(
            min_diameter = ?inner.min_diameter,
            max_diameter = ?inner.max_diameter,
            "gripper range (0.1mm)"
        );
        true
    }

    /// 关闭后端连接；未连接时调用无副作用
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.connected {
            inner.bus.close_connection();
        }
        inner.connected = false;
    }

    /// 读取线圈
    ///
    /// 状态线圈（ready / open / closed / grip）每次读取都从后端取
    /// 实时值，其余线圈返回最后写入的值。
    pub fn read_coils(&self, address: u16, count: u16) -> Result<Vec<bool>, GatewayError> {
        let mut inner = self.inner.lock();
        check_range("coil", address, count, self.config.partitions.coils)?;

        let mut out: Vec<bool> = inner.coils[address as usize..(address + count) as usize].to_vec();
        if inner.connected && self.span_covers_status_coil(address, count) {
            self.fill_status_coils(&mut inner, address, &mut out);
        }
        Ok(out)
    }

    /// 写入线圈并分发命令触发
    pub fn write_coils(&self, address: u16, values: &[bool]) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock();
        check_range(
            "coil",
            address,
            values.len() as u16,
            self.config.partitions.coils,
        )?;

        for (i, value) in values.iter().enumerate() {
            inner.coils[address as usize + i] = *value;
        }
        for (i, value) in values.iter().enumerate() {
            self.dispatch_coil(&mut inner, address + i as u16, *value);
        }
        Ok(())
    }

    /// 读取离散输入（默认映射未使用，保留分区）
    pub fn read_discrete_inputs(&self, address: u16, count: u16) -> Result<Vec<bool>, GatewayError> {
        let inner = self.inner.lock();
        check_range(
            "discrete input",
            address,
            count,
            self.config.partitions.discrete_inputs,
        )?;
        Ok(inner.discrete_inputs[address as usize..(address + count) as usize].to_vec())
    }

    /// 读取保持寄存器（返回最后写入的值；命令寄存器处理后恒为 0）
    pub fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u16>, GatewayError> {
        let inner = self.inner.lock();
        check_range(
            "holding register",
            address,
            count,
            self.config.partitions.holding_registers,
        )?;
        Ok(inner.holding_registers[address as usize..(address + count) as usize].to_vec())
    }

    /// 写入保持寄存器并应用副作用
    ///
    /// 力 / 直径 / 夹持类型写入即时下发到后端；命令寄存器是一次性
    /// 触发器，处理完（无论成败）立即复位为 0。
    pub fn write_holding_registers(&self, address: u16, values: &[u16]) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock();
        check_range(
            "holding register",
            address,
            values.len() as u16,
            self.config.partitions.holding_registers,
        )?;

        for (i, value) in values.iter().enumerate() {
            inner.holding_registers[address as usize + i] = *value;
        }
        if inner.connected {
            let end = address + values.len() as u16;
            self.apply_holding_writes(&mut inner, address..end);
        }
        Ok(())
    }

    /// 读取输入寄存器
    ///
    /// 宽度寄存器每次读取都从后端取新测量值（0.1 mm 单位）。
    pub fn read_input_registers(&self, address: u16, count: u16) -> Result<Vec<u16>, GatewayError> {
        let mut inner = self.inner.lock();
        check_range(
            "input register",
            address,
            count,
            self.config.partitions.input_registers,
        )?;

        let width_index = self.config.mapping.width_register;
        if inner.connected && (address..address + count).contains(&width_index) {
            if let Some(width) = Self::fresh_width(&mut inner) {
                inner.input_registers[width_index as usize] = width;
            }
        }
        Ok(inner.input_registers[address as usize..(address + count) as usize].to_vec())
    }

    // ========================================================================
    // 线圈命令分发
    // ========================================================================

    /// 单个线圈写入的命令分发，按固定优先级检查
    fn dispatch_coil(&self, inner: &mut Inner<B>, index: u16, value: bool) {
        if !inner.connected {
            return;
        }
        let mapping = &self.config.mapping;

        if index == mapping.open_coil {
            let force = hr(inner, mapping.force_register);
            if mapping.close_coil.is_none() {
                // 单线圈语义：true 开，false 合
                self.wait_ready(inner);
                if value {
                    info!(force, "trigger OPEN");
                    inner.bus.open_gripper(force);
                } else {
                    info!(force, "trigger CLOSE");
                    inner.bus.close_gripper(force);
                }
            } else if value {
                // 双线圈语义：open 线圈只响应 true
                self.wait_ready(inner);
                info!(force, "trigger OPEN");
                inner.bus.open_gripper(force);
            }
        } else if mapping.close_coil == Some(index) && value {
            let force = hr(inner, mapping.force_register);
            self.wait_ready(inner);
            info!(force, "trigger CLOSE");
            inner.bus.close_gripper(force);
        } else if mapping.move_coil == Some(index) && value {
            let (force, diameter, grip_type) = self.movement_params(inner);
            self.wait_ready(inner);
            info!(diameter, force, ?grip_type, "trigger MOVE");
            inner.bus.move_gripper(diameter, force, grip_type);
        } else if mapping.flex_coil == Some(index) && value {
            let (force, diameter, grip_type) = self.movement_params(inner);
            self.wait_ready(inner);
            info!(diameter, force, ?grip_type, "trigger FLEXGRIP");
            inner.bus.flex_grip(diameter, force, grip_type);
        } else if mapping.stop_coil == Some(index) && value {
            info!("trigger STOP");
            if let Err(e) = inner.bus.set_control(ControlCommand::Stop) {
                error!(error = %e, "failed to stop gripper");
            }
        }
    }

    // ========================================================================
    // 保持寄存器副作用
    // ========================================================================

    fn apply_holding_writes(&self, inner: &mut Inner<B>, changed: std::ops::Range<u16>) {
        let mapping = &self.config.mapping;

        if changed.contains(&mapping.force_register) {
            let force = hr(inner, mapping.force_register);
            debug!(force, "apply target force");
            if let Err(e) = inner.bus.set_target_force(force) {
                error!(error = %e, "failed to set force");
            }
        }

        if changed.contains(&mapping.diameter_register) || changed.contains(&mapping.grip_type_register)
        {
            let diameter = self.clamp_diameter(inner, hr(inner, mapping.diameter_register));
            let grip_type = decode_grip_type(hr(inner, mapping.grip_type_register));
            debug!(diameter, ?grip_type, "apply target diameter and grip type");
            if let Err(e) = inner
                .bus
                .set_target_diameter(diameter)
                .and_then(|_| inner.bus.set_grip_type(grip_type))
            {
                error!(error = %e, "failed to set diameter/grip type");
            }
        }

        if let Some(command_index) = mapping.command_register {
            if changed.contains(&command_index) {
                self.handle_command_register(inner, command_index);
            }
        }
    }

    /// 一次性命令寄存器：分发后无条件复位为 0
    ///
    /// 复位在分发之后总是执行，某个子动作失败不会让残留的
    /// 操作码在下一次写入时再次触发。
    fn handle_command_register(&self, inner: &mut Inner<B>, command_index: u16) {
        let opcode = hr(inner, command_index);
        match GatewayCommand::try_from(opcode) {
            Ok(command) => self.run_gateway_command(inner, command),
            Err(_) => {
                if opcode != 0 {
                    debug!(opcode, "ignoring unknown command register opcode");
                }
            }
        }
        inner.holding_registers[command_index as usize] = 0;
    }

    fn run_gateway_command(&self, inner: &mut Inner<B>, command: GatewayCommand) {
        let mapping = &self.config.mapping;
        let force = hr(inner, mapping.force_register);
        match command {
            GatewayCommand::Move => {
                let (force, diameter, grip_type) = self.movement_params(inner);
                self.wait_ready(inner);
                info!(diameter, force, ?grip_type, "command MOVE");
                inner.bus.move_gripper(diameter, force, grip_type);
            }
            GatewayCommand::Flex => {
                let (force, diameter, grip_type) = self.movement_params(inner);
                self.wait_ready(inner);
                info!(diameter, force, ?grip_type, "command FLEX");
                inner.bus.flex_grip(diameter, force, grip_type);
            }
            GatewayCommand::Stop => {
                info!("command STOP");
                if let Err(e) = inner.bus.set_control(ControlCommand::Stop) {
                    error!(error = %e, "failed to stop gripper");
                }
            }
            GatewayCommand::Open => {
                self.wait_ready(inner);
                info!(force, "command OPEN");
                inner.bus.open_gripper(force);
            }
            GatewayCommand::Close => {
                self.wait_ready(inner);
                info!(force, "command CLOSE");
                inner.bus.close_gripper(force);
            }
        }
    }

    // ========================================================================
    // 实时状态
    // ========================================================================

    fn span_covers_status_coil(&self, address: u16, count: u16) -> bool {
        let mapping = &self.config.mapping;
        let span = address..address + count;
        span.contains(&mapping.ready_coil)
            || span.contains(&mapping.open_status_coil)
            || span.contains(&mapping.closed_status_coil)
            || span.contains(&mapping.grip_status_coil)
    }

    /// 填充请求区间内的状态线圈
    ///
    /// 状态和宽度各取一次，同一次读取内的几个状态位来自同一快照。
    fn fill_status_coils(&self, inner: &mut Inner<B>, address: u16, out: &mut [bool]) {
        let mapping = &self.config.mapping;

        let status = inner.bus.get_status();
        let busy = status.as_ref().map(|s| s.busy).unwrap_or(true);
        let grip = status
            .as_ref()
            .map(|s| s.grip_detected || s.force_grip_detected)
            .unwrap_or(false);
        let width = Self::fresh_width(inner);

        let open_bit = match (width, inner.max_diameter) {
            (Some(w), Some(max)) => w >= max.saturating_sub(WIDTH_TOLERANCE),
            _ => false,
        };
        let closed_bit = match (width, inner.min_diameter) {
            (Some(w), Some(min)) => w <= min.saturating_add(WIDTH_TOLERANCE),
            _ => false,
        };

        for (i, slot) in out.iter_mut().enumerate() {
            let index = address + i as u16;
            if index == mapping.ready_coil {
                *slot = !busy;
            } else if index == mapping.grip_status_coil {
                *slot = grip;
            } else if index == mapping.open_status_coil {
                *slot = open_bit;
            } else if index == mapping.closed_status_coil {
                *slot = closed_bit;
            }
        }
    }

    /// 当前宽度的新测量值（0.1 mm 单位），读取失败返回 `None`
    fn fresh_width(inner: &mut Inner<B>) -> Option<u16> {
        inner
            .bus
            .get_raw_diameter()
            .map(|mm| (mm * 10.0).round() as u16)
    }

    // ========================================================================
    // 辅助
    // ========================================================================

    /// 读取触发动作所需的力 / 直径 / 夹持类型参数
    ///
    /// 调用方持有锁，参数对一定来自同一次临界区，不会混合
    /// 两个客户端的写入。
    fn movement_params(&self, inner: &Inner<B>) -> (u16, u16, GripType) {
        let mapping = &self.config.mapping;
        let force = hr(inner, mapping.force_register);
        let diameter = self.clamp_diameter(inner, hr(inner, mapping.diameter_register));
        let grip_type = decode_grip_type(hr(inner, mapping.grip_type_register));
        (force, diameter, grip_type)
    }

    /// 网关级预夹：夹到连接时学到的范围内
    ///
    /// 后端自己的范围仍是权威（引擎会再夹一次）；两处范围在配置
    /// 错误时可能不一致，这里不做一致性校验。
    fn clamp_diameter(&self, inner: &Inner<B>, diameter: u16) -> u16 {
        let mut out = diameter;
        if let Some(min) = inner.min_diameter {
            out = out.max(min);
        }
        if let Some(max) = inner.max_diameter {
            out = out.min(max);
        }
        out
    }

    /// 阻塞等待设备非忙
    ///
    /// 超时只告警并返回 false，不取消在途运动，也不中止随后的命令。
    fn wait_ready(&self, inner: &mut Inner<B>) -> bool {
        let timing: &ReadyTiming = &self.config.ready;
        let deadline = Instant::now() + timing.timeout();
        loop {
            let busy = inner.bus.get_status().map(|s| s.busy).unwrap_or(false);
            if !busy {
                return true;
            }
            if Instant::now() >= deadline {
                warn!("timeout waiting for gripper to become ready (busy=false)");
                return false;
            }
            thread::sleep(timing.poll_interval());
        }
    }
}

/// 保持寄存器读取，越界的映射索引按 0 处理
fn hr<B>(inner: &Inner<B>, index: u16) -> u16 {
    inner
        .holding_registers
        .get(index as usize)
        .copied()
        .unwrap_or(0)
}

/// 网关级宽松解码：1 为 INTERNAL，其余一律 EXTERNAL
///
/// 与后端寄存器写入的严格校验不同，远端写进来的任意值在这里
/// 不应该让整个触发失败。
fn decode_grip_type(value: u16) -> GripType {
    if value == GripType::Internal.as_register() {
        GripType::Internal
    } else {
        GripType::External
    }
}

fn check_range(
    partition: &'static str,
    address: u16,
    count: u16,
    size: u16,
) -> Result<(), GatewayError> {
    if address.checked_add(count).is_none_or(|end| end > size) {
        return Err(GatewayError::AddressOutOfRange {
            partition,
            address,
            count,
            size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartitionSizes;
    use std::sync::Arc;
    use std::time::Duration;
    use threefg_sim::{ManualClock, SimConfig, SimulatedGripper};

    fn sim_config() -> SimConfig {
        SimConfig {
            enable_noise: false,
            ..SimConfig::default()
        }
    }

    /// 挂在仿真引擎上的网关，时钟可手动推进
    fn sim_gateway(config: GatewayConfig) -> (RegisterGateway<SimulatedGripper>, ManualClock) {
        let clock = ManualClock::new();
        let gripper = SimulatedGripper::with_clock(sim_config(), Arc::new(clock.clone()));
        let gateway = RegisterGateway::new(gripper, config);
        assert!(gateway.connect());
        (gateway, clock)
    }

    #[test]
    fn test_out_of_range_access_is_error() {
        let (gateway, _clock) = sim_gateway(GatewayConfig::default());

        assert!(matches!(
            gateway.read_coils(64, 1),
            Err(GatewayError::AddressOutOfRange { partition: "coil", .. })
        ));
        assert!(matches!(
            gateway.read_coils(60, 10),
            Err(GatewayError::AddressOutOfRange { .. })
        ));
        assert!(gateway.read_coils(60, 4).is_ok());
        assert!(gateway.write_coils(63, &[true, false]).is_err());
        assert!(gateway.read_holding_registers(128, 1).is_err());
        assert!(gateway.write_holding_registers(127, &[1, 2]).is_err());
        assert!(gateway.read_input_registers(200, 1).is_err());
        assert!(gateway.read_discrete_inputs(64, 1).is_err());
        // u16 溢出也要判越界而不是回绕
        assert!(gateway.read_coils(u16::MAX, 2).is_err());
    }

    #[test]
    fn test_single_coil_close_and_status_readback() {
        let (gateway, clock) = sim_gateway(GatewayConfig::default());
        gateway.write_holding_registers(0, &[700]).unwrap();

        // 单线圈语义：false 触发 CLOSE
        gateway.write_coils(0, &[false]).unwrap();

        // 运动中：ready=false
        let mid = gateway.read_coils(2, 4).unwrap();
        assert!(!mid[0], "ready should be false while moving");

        clock.advance(Duration::from_millis(600));
        let done = gateway.read_coils(2, 4).unwrap();
        assert!(done[0], "ready");
        assert!(!done[1], "open");
        assert!(done[2], "closed");
        assert!(done[3], "grip");

        // 宽度输入寄存器取实时值
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![0]);
    }

    #[test]
    fn test_single_coil_open() {
        let (gateway, clock) = sim_gateway(GatewayConfig::default());
        gateway.write_holding_registers(0, &[500]).unwrap();
        gateway.write_coils(0, &[false]).unwrap();
        clock.advance(Duration::from_millis(600));

        gateway.write_coils(0, &[true]).unwrap();
        clock.advance(Duration::from_millis(600));

        let status = gateway.read_coils(2, 4).unwrap();
        assert!(status[0], "ready");
        assert!(status[1], "open");
        assert!(!status[2], "closed");
        assert!(!status[3], "grip");
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![1000]);
    }

    #[test]
    fn test_dual_coil_open_ignores_false() {
        let config = GatewayConfig {
            mapping: AddressMapping {
                close_coil: Some(1),
                ..AddressMapping::default()
            },
            ..GatewayConfig::default()
        };
        let (gateway, clock) = sim_gateway(config);

        // 双线圈模式下 open 线圈的 false 不再意味着 CLOSE
        gateway.write_coils(0, &[false]).unwrap();
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![1000]);

        gateway.write_coils(1, &[true]).unwrap();
        clock.advance(Duration::from_millis(600));
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![0]);
    }

    #[test]
    fn test_move_coil_uses_holding_registers() {
        let config = GatewayConfig {
            mapping: AddressMapping {
                move_coil: Some(6),
                ..AddressMapping::default()
            },
            ..GatewayConfig::default()
        };
        let (gateway, clock) = sim_gateway(config);

        // force=800, diameter=300, grip_type=INTERNAL
        gateway.write_holding_registers(0, &[800, 300, 1]).unwrap();
        gateway.write_coils(6, &[true]).unwrap();
        clock.advance(Duration::from_millis(600));

        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![300]);
        let status = gateway.read_coils(2, 4).unwrap();
        assert!(status[0], "ready");
        assert!(status[3], "grip detected at 300 < 900");
    }

    #[test]
    fn test_command_register_is_one_shot() {
        let (gateway, clock) = sim_gateway(GatewayConfig::default());
        gateway.write_holding_registers(0, &[600, 400, 0]).unwrap();

        // MOVE 操作码触发动作后立即复位为 0
        gateway.write_holding_registers(3, &[1]).unwrap();
        assert_eq!(gateway.read_holding_registers(3, 1).unwrap(), vec![0]);

        clock.advance(Duration::from_millis(600));
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![400]);
    }

    #[test]
    fn test_unknown_opcode_still_resets() {
        let (gateway, _clock) = sim_gateway(GatewayConfig::default());
        gateway.write_holding_registers(3, &[99]).unwrap();
        assert_eq!(gateway.read_holding_registers(3, 1).unwrap(), vec![0]);
        // 未识别的操作码不触发任何运动
        assert!(gateway.read_coils(2, 1).unwrap()[0], "still ready");
    }

    #[test]
    fn test_stop_opcode_halts_motion() {
        let (gateway, clock) = sim_gateway(GatewayConfig::default());
        gateway.write_holding_registers(0, &[500, 0, 0]).unwrap();
        gateway.write_holding_registers(3, &[1]).unwrap();
        assert!(!gateway.read_coils(2, 1).unwrap()[0], "busy after MOVE");

        clock.advance(Duration::from_millis(100));
        gateway.write_holding_registers(3, &[3]).unwrap();
        assert!(gateway.read_coils(2, 1).unwrap()[0], "ready after STOP");
        // 宽度冻结在中途值
        let width = gateway.read_input_registers(0, 1).unwrap()[0];
        assert!(width > 0 && width < 1000);
    }

    #[test]
    fn test_open_and_close_opcodes() {
        let (gateway, clock) = sim_gateway(GatewayConfig::default());
        gateway.write_holding_registers(0, &[700]).unwrap();

        gateway.write_holding_registers(3, &[5]).unwrap(); // CLOSE
        clock.advance(Duration::from_millis(600));
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![0]);

        gateway.write_holding_registers(3, &[4]).unwrap(); // OPEN
        clock.advance(Duration::from_millis(600));
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![1000]);
    }

    #[test]
    fn test_diameter_write_applies_immediately() {
        let (gateway, clock) = sim_gateway(GatewayConfig::default());
        // 直径寄存器写入即时下发，随后仅写控制操作码即可运动
        gateway.write_holding_registers(1, &[250]).unwrap();
        gateway.write_holding_registers(3, &[1]).unwrap();
        clock.advance(Duration::from_millis(600));
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![250]);
    }

    #[test]
    fn test_gateway_clamps_to_learned_range() {
        let clock = ManualClock::new();
        let sim = SimulatedGripper::with_clock(
            SimConfig {
                min_diameter: 100,
                max_diameter: 800,
                enable_noise: false,
                ..SimConfig::default()
            },
            Arc::new(clock.clone()),
        );
        let gateway = RegisterGateway::new(sim, GatewayConfig::default());
        assert!(gateway.connect());

        // 2000 超出连接时学到的 [100, 800]，预夹到 800
        gateway.write_holding_registers(0, &[500, 2000, 0]).unwrap();
        // 保持寄存器本身存原始值
        assert_eq!(gateway.read_holding_registers(1, 1).unwrap(), vec![2000]);

        gateway.write_holding_registers(3, &[1]).unwrap();
        clock.advance(Duration::from_millis(600));
        assert_eq!(gateway.read_input_registers(0, 1).unwrap(), vec![800]);
    }

    #[test]
    fn test_disconnected_gateway_stores_without_side_effects() {
        let gripper = SimulatedGripper::new(sim_config());
        let gateway = RegisterGateway::new(gripper, GatewayConfig::default());

        // 未连接：写入只落到本地存储，不触发动作
        gateway.write_holding_registers(3, &[1]).unwrap();
        assert_eq!(gateway.read_holding_registers(3, 1).unwrap(), vec![1]);
        gateway.write_coils(0, &[true]).unwrap();
        assert_eq!(gateway.read_coils(0, 1).unwrap(), vec![true]);
        // 状态线圈不取实时值
        assert_eq!(gateway.read_coils(2, 4).unwrap(), vec![false; 4]);
    }

    #[test]
    fn test_ready_wait_timeout_proceeds_with_command() {
        let config = GatewayConfig {
            ready: ReadyTiming {
                timeout_ms: 50,
                poll_interval_ms: 5,
            },
            ..GatewayConfig::default()
        };
        let (gateway, _clock) = sim_gateway(config);
        gateway.write_holding_registers(0, &[500, 200, 0]).unwrap();

        // 时钟不推进，引擎一直忙
        gateway.write_holding_registers(3, &[1]).unwrap();
        assert!(!gateway.read_coils(2, 1).unwrap()[0]);

        // 第二个触发等到超时后仍然下发（不中止）
        let start = Instant::now();
        gateway.write_holding_registers(3, &[1]).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(gateway.read_holding_registers(3, 1).unwrap(), vec![0]);
        assert!(!gateway.read_coils(2, 1).unwrap()[0], "restarted motion");
    }

    #[test]
    fn test_custom_partition_sizes() {
        let config = GatewayConfig {
            partitions: PartitionSizes {
                coils: 8,
                discrete_inputs: 4,
                holding_registers: 16,
                input_registers: 16,
            },
            ..GatewayConfig::default()
        };
        let gripper = SimulatedGripper::new(sim_config());
        let gateway = RegisterGateway::new(gripper, config);

        assert!(gateway.read_coils(0, 8).is_ok());
        assert!(gateway.read_coils(0, 9).is_err());
        assert!(gateway.read_holding_registers(0, 16).is_ok());
        assert!(gateway.read_holding_registers(0, 17).is_err());
    }
}
