//! Prelude - 常用类型的便捷导入
//!
//! 大多数用户应该使用这个模块来导入常用类型：
//!
//! ```rust
//! use threefg_sdk::prelude::*;
//! ```

// 总线层（能力契约和高层命令）
pub use threefg_bus::{GripperBus, GripperCommands};
pub use threefg_bus::{ModbusEndpoint, ModbusGripper, RegisterTransport};

// 协议层
pub use threefg_protocol::{ControlCommand, GatewayCommand, GripType, GripperStatus};

// 仿真层
pub use threefg_sim::{ManualClock, SimConfig, SimulatedGripper, SystemClock};

// 网关层
pub use threefg_gateway::{AddressMapping, GatewayConfig, RegisterGateway};

// 错误类型
pub use threefg_bus::BusError;
pub use threefg_gateway::GatewayError;
pub use threefg_protocol::ProtocolError;
