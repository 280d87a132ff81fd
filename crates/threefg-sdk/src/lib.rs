//! ThreeFG SDK - OnRobot 3FG15 夹爪 Rust SDK
//!
//! 通过寄存器协议远程控制两指/三指平行夹爪，自带确定性仿真引擎
//! 和把夹爪暴露为地址映射设备的寄存器网关。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 寄存器地址、状态位域、命令操作码
//! - **总线层** (`bus`): [`GripperBus`] 能力契约和派生的高层命令，
//!   以及挂在 [`RegisterTransport`] 上的 Modbus 适配器
//! - **仿真层** (`sim`): 带定时运动和阈值检测的仿真引擎，
//!   与真实适配器在 [`GripperBus`] 后面可互换
//! - **网关层** (`gateway`): 面向远程协议客户端的地址空间复用器
//!
//! # 快速开始
//!
//! ```rust
//! use threefg_sdk::prelude::*;
//!
//! let gripper = SimulatedGripper::new(SimConfig::default());
//! let gateway = RegisterGateway::new(gripper, GatewayConfig::default());
//! gateway.connect();
//! ```

pub use threefg_bus as bus;
pub use threefg_gateway as gateway;
pub use threefg_protocol as protocol;
pub use threefg_sim as sim;

pub mod logging;
pub mod prelude;

// --- 用户以此为界 ---
// 以下是通过 Facade Pattern 提供的公共 API

pub use threefg_bus::{
    BusError, GripperBus, GripperCommands, ModbusEndpoint, ModbusGripper, RegisterTransport,
};
pub use threefg_gateway::{GatewayConfig, GatewayError, RegisterGateway};
pub use threefg_protocol::{ControlCommand, GatewayCommand, GripType, GripperStatus, ProtocolError};
pub use threefg_sim::{SimConfig, SimulatedGripper};
